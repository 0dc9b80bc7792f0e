use crate::api::*;
use crate::config::DeskConfig;
use crate::seed::Seed;
use crate::snapshot::Snapshot;
use crate::state::{Collection, DeskState};
use chrono::Utc;
use parking_lot::RwLock;
use peach_core::{
    ActivityEntry, ActivityKind, Client, ClientId, ClientPatch, DeskError, DeskResult, Location,
    LocationId, LocationPatch, Record, RecordKind, Role, TaskId, User, UserId, UserPatch,
    WorkflowAction,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Owner of the desk state.
///
/// Readers get immutable `Arc<DeskState>` snapshots. Each mutation clones
/// the current state, applies itself to the clone and swaps the result in
/// only if it succeeded, all under one write lock, so a rejected operation
/// never leaves a trace.
pub struct DeskHandle {
    config: DeskConfig,
    baseline: Arc<DeskState>,
    state: RwLock<Arc<DeskState>>,
    notifier: watch::Sender<Arc<DeskState>>,
}

impl DeskHandle {
    /// Handle over the demo seed with default configuration
    pub fn new() -> Self {
        Self::with_config(DeskConfig::default())
    }

    /// Handle over the demo seed
    pub fn with_config(config: DeskConfig) -> Self {
        Self::with_seed(&Seed::demo(), config)
    }

    pub fn with_seed(seed: &Seed, config: DeskConfig) -> Self {
        Self::from_state(DeskState::from_seed(seed), config)
    }

    /// Resume from a saved snapshot; `reset` returns to this snapshot
    pub fn from_snapshot(snapshot: Snapshot, config: DeskConfig) -> Self {
        Self::from_state(snapshot.into_state(), config)
    }

    fn from_state(state: DeskState, config: DeskConfig) -> Self {
        let baseline = Arc::new(state);
        let (notifier, _) = watch::channel(Arc::clone(&baseline));
        Self {
            config,
            state: RwLock::new(Arc::clone(&baseline)),
            baseline,
            notifier,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<DeskState> {
        Arc::clone(&*self.state.read())
    }

    /// Observe every published state
    pub fn subscribe(&self) -> watch::Receiver<Arc<DeskState>> {
        self.notifier.subscribe()
    }

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.snapshot())
    }

    /// Discard every mutation and return to the baseline state
    pub fn reset(&self) {
        let mut guard = self.state.write();
        *guard = Arc::clone(&self.baseline);
        self.notifier.send_replace(Arc::clone(&*guard));
        tracing::info!(tasks = guard.tasks.len(), "desk reset to baseline");
    }

    fn mutate<T>(
        &self,
        op: &'static str,
        id: &str,
        apply: impl FnOnce(&mut DeskState) -> DeskResult<T>,
    ) -> DeskResult<T> {
        let mut guard = self.state.write();
        let mut next = DeskState::clone(&guard);
        let actor = next.current_user.as_ref().map(|u| u.id.clone());

        match apply(&mut next) {
            Ok(value) => {
                let next = Arc::new(next);
                *guard = Arc::clone(&next);
                self.notifier.send_replace(next);
                tracing::info!(op, id, actor = ?actor, "applied");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(op, id, actor = ?actor, code = err.code(), error = %err, "rejected");
                Err(err)
            }
        }
    }

    /// Run one workflow action against a task under the configured policy
    fn advance(&self, task_id: &TaskId, action: WorkflowAction) -> DeskResult<ActivityEntry> {
        let policy = self.config.transition_policy;
        self.mutate(action.as_str(), task_id.as_str(), |state| {
            let actor = state.current_user.clone();
            let now = Utc::now();
            let task = state
                .task_mut(task_id)
                .ok_or_else(|| DeskError::not_found(RecordKind::Task, task_id))?;

            task.internal_status = policy.apply(task.internal_status, action)?;
            task.external_status = action.external_status();
            let task_id = task_id.clone();
            let kind = match action {
                WorkflowAction::StartWriting => ActivityKind::TaskStarted { task_id },
                WorkflowAction::MarkWritten => {
                    task.written_at = Some(now);
                    ActivityKind::TaskWritten { task_id }
                }
                WorkflowAction::MarkDelivered => {
                    task.delivered_at = Some(now);
                    ActivityKind::TaskDelivered { task_id }
                }
            };

            let entry = ActivityEntry::at(kind, actor.as_ref(), now);
            task.activity.push(entry.clone());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }

    fn add_record<R: Record>(&self, op: &'static str, mut record: R) -> DeskResult<ActivityEntry>
    where
        DeskState: Collection<R>,
    {
        record.normalize();
        let id = record.id().to_string();
        self.mutate(op, &id, |state| {
            record.validate()?;
            if <DeskState as Collection<R>>::find(state, record.id()).is_some() {
                return Err(peach_core::ValidationError::DuplicateId {
                    kind: R::KIND,
                    id: id.clone(),
                }
                .into());
            }

            let kind = ActivityKind::EntityAdded {
                entity: R::KIND,
                id: id.clone(),
                name: record.display_name().to_string(),
            };
            <DeskState as Collection<R>>::records_mut(state).push(record);
            let entry = ActivityEntry::new(kind, state.current_user.as_ref());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }

    fn update_record<R: Record>(
        &self,
        op: &'static str,
        id: &R::Id,
        patch: &R::Patch,
    ) -> DeskResult<ActivityEntry>
    where
        DeskState: Collection<R>,
    {
        self.mutate(op, id.as_ref(), |state| {
            let records = <DeskState as Collection<R>>::records_mut(state);
            let slot = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| DeskError::not_found(R::KIND.into(), id))?;

            let mut merged = slot.clone();
            merged.apply_patch(patch);
            merged.normalize();
            merged.validate()?;
            *slot = merged;

            let kind = ActivityKind::EntityUpdated {
                entity: R::KIND,
                id: id.to_string(),
            };
            let entry = ActivityEntry::new(kind, state.current_user.as_ref());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }

    fn delete_record<R: Record>(&self, op: &'static str, id: &R::Id) -> DeskResult<ActivityEntry>
    where
        DeskState: Collection<R>,
    {
        self.mutate(op, id.as_ref(), |state| {
            let records = <DeskState as Collection<R>>::records_mut(state);
            let index = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| DeskError::not_found(R::KIND.into(), id))?;
            let removed = records.remove(index);

            let kind = ActivityKind::EntityDeleted {
                entity: R::KIND,
                id: id.to_string(),
                name: Some(removed.display_name().to_string()),
            };
            let entry = ActivityEntry::new(kind, state.current_user.as_ref());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }
}

impl Default for DeskHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager for DeskHandle {
    fn login(&self, email: &str, password: &str) -> DeskResult<User> {
        let role = self
            .config
            .credentials
            .authenticate(email, password)
            .map_err(|err| {
                tracing::warn!(email = email.trim(), "login rejected");
                DeskError::from(err)
            })?;
        self.login_role(role)
    }

    fn login_role(&self, role: Role) -> DeskResult<User> {
        self.mutate("login", role.as_str(), |state| {
            let user = state
                .users
                .iter()
                .find(|u| u.role == role)
                .cloned()
                .ok_or_else(|| DeskError::not_found(RecordKind::User, format!("role {role}")))?;
            state.current_user = Some(user.clone());
            Ok(user)
        })
    }

    fn logout(&self) {
        let mut guard = self.state.write();
        let previous = guard.current_user.as_ref().map(|u| u.id.clone());
        let mut next = DeskState::clone(&guard);
        next.current_user = None;
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        self.notifier.send_replace(next);
        tracing::info!(op = "logout", actor = ?previous, "applied");
    }

    fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }
}

impl TaskWorkflow for DeskHandle {
    fn start_writing(&self, task_id: &TaskId) -> DeskResult<ActivityEntry> {
        self.advance(task_id, WorkflowAction::StartWriting)
    }

    fn save_draft(&self, task_id: &TaskId, content: &str) -> DeskResult<ActivityEntry> {
        self.mutate("save draft", task_id.as_str(), |state| {
            let actor = state.current_user.clone();
            let task = state
                .task_mut(task_id)
                .ok_or_else(|| DeskError::not_found(RecordKind::Task, task_id))?;
            task.content_draft = content.to_string();

            let entry = ActivityEntry::new(
                ActivityKind::DraftSaved {
                    task_id: task_id.clone(),
                },
                actor.as_ref(),
            );
            task.activity.push(entry.clone());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }

    fn mark_written(&self, task_id: &TaskId) -> DeskResult<ActivityEntry> {
        self.advance(task_id, WorkflowAction::MarkWritten)
    }

    fn mark_delivered(&self, task_id: &TaskId) -> DeskResult<ActivityEntry> {
        self.advance(task_id, WorkflowAction::MarkDelivered)
    }

    fn reassign_task(&self, task_id: &TaskId, writer_id: &UserId) -> DeskResult<ActivityEntry> {
        self.mutate("reassign", task_id.as_str(), |state| {
            let actor = state.current_user.clone();
            let writer_name = state.user(writer_id).map(|u| u.name.clone());
            let task = state
                .task_mut(task_id)
                .ok_or_else(|| DeskError::not_found(RecordKind::Task, task_id))?;
            task.writer_id = writer_id.clone();

            let entry = ActivityEntry::new(
                ActivityKind::TaskReassigned {
                    task_id: task_id.clone(),
                    writer_id: writer_id.clone(),
                    writer_name,
                },
                actor.as_ref(),
            );
            task.activity.push(entry.clone());
            state.push_global(entry.clone());
            Ok(entry)
        })
    }
}

impl ClientDirectory for DeskHandle {
    fn add_client(&self, client: Client) -> DeskResult<ActivityEntry> {
        self.add_record("add client", client)
    }

    fn update_client(&self, id: &ClientId, patch: ClientPatch) -> DeskResult<ActivityEntry> {
        self.update_record::<Client>("update client", id, &patch)
    }

    fn delete_client(&self, id: &ClientId) -> DeskResult<ActivityEntry> {
        self.delete_record::<Client>("delete client", id)
    }
}

impl LocationDirectory for DeskHandle {
    fn add_location(&self, location: Location) -> DeskResult<ActivityEntry> {
        self.add_record("add location", location)
    }

    fn update_location(
        &self,
        id: &LocationId,
        patch: LocationPatch,
    ) -> DeskResult<ActivityEntry> {
        self.update_record::<Location>("update location", id, &patch)
    }

    fn delete_location(&self, id: &LocationId) -> DeskResult<ActivityEntry> {
        self.delete_record::<Location>("delete location", id)
    }
}

impl UserDirectory for DeskHandle {
    fn add_user(&self, user: User) -> DeskResult<ActivityEntry> {
        self.add_record("add user", user)
    }

    fn update_user(&self, id: &UserId, patch: UserPatch) -> DeskResult<ActivityEntry> {
        self.update_record::<User>("update user", id, &patch)
    }

    fn delete_user(&self, id: &UserId) -> DeskResult<ActivityEntry> {
        self.delete_record::<User>("delete user", id)
    }
}

impl ActivityFeed for DeskHandle {
    fn global_activity(&self) -> Vec<ActivityEntry> {
        self.snapshot().global_activity.clone()
    }

    fn task_activity(&self, task_id: &TaskId) -> DeskResult<Vec<ActivityEntry>> {
        self.snapshot()
            .task(task_id)
            .map(|t| t.activity.clone())
            .ok_or_else(|| DeskError::not_found(RecordKind::Task, task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peach_core::InternalStatus;

    fn handle() -> DeskHandle {
        DeskHandle::with_seed(&Seed::demo(), DeskConfig::default())
    }

    #[test]
    fn failed_mutation_keeps_the_same_snapshot() {
        let desk = handle();
        let before = desk.snapshot();
        let err = desk.mark_delivered(&TaskId::new("t1")).unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
        assert!(Arc::ptr_eq(&before, &desk.snapshot()));
    }

    #[test]
    fn applied_mutation_publishes_to_subscribers() {
        let desk = handle();
        let mut rx = desk.subscribe();
        desk.start_writing(&TaskId::new("t1")).unwrap();
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(
            seen.task(&TaskId::new("t1")).unwrap().internal_status,
            InternalStatus::Writing
        );
    }

    #[test]
    fn reset_returns_to_the_baseline() {
        let desk = handle();
        let baseline = desk.snapshot();
        desk.login_role(Role::Admin).unwrap();
        desk.delete_client(&ClientId::new("c1")).unwrap();
        desk.reset();
        assert_eq!(*desk.snapshot(), *baseline);
        assert!(desk.current_user().is_none());
    }

    #[test]
    fn login_role_failure_keeps_current_user() {
        let desk = DeskHandle::with_seed(&Seed::empty(), DeskConfig::default());
        let err = desk.login_role(Role::Writer).unwrap_err();
        assert!(err.is_not_found());
        assert!(desk.current_user().is_none());
    }
}
