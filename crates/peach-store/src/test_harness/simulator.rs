//! Desk simulator: seeded random operation sequences with invariant checks
//!
//! Every generated operation is classified against the state it will run
//! on, so an outcome that disagrees with the classification is reported
//! alongside broken feed and workflow invariants.

use crate::api::*;
use crate::config::DeskConfig;
use crate::handle::DeskHandle;
use crate::seed::Seed;
use crate::state::{Collection, DeskState};
use chrono::Utc;
use peach_core::workflow::allowed_actions;
use peach_core::{
    ActivityEntry, Client, ClientId, ClientPatch, DeskResult, Location, LocationId, LocationPatch,
    Platform, Record, Role, TaskId, TransitionPolicy, User, UserId, UserPatch, WorkflowAction,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub total_operations: u64,
    pub operation_distribution: OperationDistribution,
    pub transition_policy: TransitionPolicy,
    pub stop_on_first_violation: bool,
    pub stop_on_error_count: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 2_000,
            operation_distribution: OperationDistribution::default(),
            transition_policy: TransitionPolicy::Strict,
            stop_on_first_violation: true,
            stop_on_error_count: None,
        }
    }
}

/// Probability distribution for operation generation
#[derive(Debug, Clone)]
pub struct OperationDistribution {
    /// Operations that fit the current state
    pub valid_ops: f64,
    /// Tolerated oddities: unknown writers, empty drafts, resets
    pub edge_cases: f64,
    /// Unknown ids, out-of-order actions, malformed records
    pub invalid_ops: f64,
}

impl Default for OperationDistribution {
    fn default() -> Self {
        Self {
            valid_ops: 0.70,
            edge_cases: 0.20,
            invalid_ops: 0.10,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SimulatedOperation {
    Login(Role),
    Logout,
    Reset,

    Workflow(TaskId, WorkflowAction),
    SaveDraft(TaskId, String),
    Reassign(TaskId, UserId),

    AddClient(Client),
    UpdateClient(ClientId, ClientPatch),
    DeleteClient(ClientId),

    AddLocation(Location),
    UpdateLocation(LocationId, LocationPatch),
    DeleteLocation(LocationId),

    AddUser(User),
    UpdateUser(UserId, UserPatch),
    DeleteUser(UserId),
}

impl SimulatedOperation {
    pub fn name(&self) -> &'static str {
        match self {
            SimulatedOperation::Login(_) => "login",
            SimulatedOperation::Logout => "logout",
            SimulatedOperation::Reset => "reset",
            SimulatedOperation::Workflow(_, action) => action.as_str(),
            SimulatedOperation::SaveDraft(..) => "save draft",
            SimulatedOperation::Reassign(..) => "reassign",
            SimulatedOperation::AddClient(_) => "add client",
            SimulatedOperation::UpdateClient(..) => "update client",
            SimulatedOperation::DeleteClient(_) => "delete client",
            SimulatedOperation::AddLocation(_) => "add location",
            SimulatedOperation::UpdateLocation(..) => "update location",
            SimulatedOperation::DeleteLocation(_) => "delete location",
            SimulatedOperation::AddUser(_) => "add user",
            SimulatedOperation::UpdateUser(..) => "update user",
            SimulatedOperation::DeleteUser(_) => "delete user",
        }
    }

    /// Whether a successful run appends to the activity feed
    pub fn writes_activity(&self) -> bool {
        !matches!(
            self,
            SimulatedOperation::Login(_) | SimulatedOperation::Logout | SimulatedOperation::Reset
        )
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            SimulatedOperation::Workflow(id, _)
            | SimulatedOperation::SaveDraft(id, _)
            | SimulatedOperation::Reassign(id, _) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedResult {
    ShouldSucceed,
    ShouldFail,
}

#[derive(Debug, Clone)]
pub enum Violation {
    /// Operation outcome didn't match expectation
    UnexpectedOutcome {
        operation_index: u64,
        operation: SimulatedOperation,
        expected: ExpectedResult,
        actual: Result<String, String>,
    },
    Invariant {
        operation_index: u64,
        violation: InvariantViolation,
    },
}

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub check: InvariantCheck,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantCheck {
    FeedLengthMatchesActivityCalls,
    FeedIsNewestFirst,
    FeedHeadIsLatestEntry,
    TaskLogEndsWithLatestEntry,
    StatusNeverRegresses,
    FailureLeavesStateUntouched,
}

#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub operations_by_type: BTreeMap<&'static str, u64>,
}

impl OperationStats {
    pub fn record(&mut self, operation: &SimulatedOperation, result: &Result<String, String>) {
        self.total_operations += 1;
        *self.operations_by_type.entry(operation.name()).or_insert(0) += 1;
        match result {
            Ok(_) => self.successful_operations += 1,
            Err(_) => self.failed_operations += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorReport {
    pub config: SimulatorConfig,
    pub stats: OperationStats,
    pub violations: Vec<Violation>,
    pub final_task_count: usize,
    pub final_feed_length: usize,
}

impl SimulatorReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Desk Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Policy: {:?}\n", self.config.transition_policy));
        report.push_str(&format!("Total Operations: {}\n", self.stats.total_operations));
        report.push_str(&format!("Successful: {}\n", self.stats.successful_operations));
        report.push_str(&format!("Failed: {}\n", self.stats.failed_operations));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));
        report.push_str(&format!("Final Tasks: {}\n", self.final_task_count));
        report.push_str(&format!("Final Feed Length: {}\n", self.final_feed_length));

        report.push_str("\n=== Operations ===\n");
        for (name, count) in &self.stats.operations_by_type {
            report.push_str(&format!("{name}: {count}\n"));
        }

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run the simulator against a fresh demo desk
pub fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let desk = DeskHandle::with_seed(
        &Seed::demo(),
        DeskConfig::default().with_transition_policy(config.transition_policy),
    );
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut fresh = FreshIds::default();
    let mut stats = OperationStats::default();
    let mut violations = Vec::new();

    let baseline_feed = desk.snapshot().global_activity.len();
    let mut expected_feed = baseline_feed;

    for i in 0..config.total_operations {
        let before = desk.snapshot();
        let operation =
            generate_operation(&mut rng, &config.operation_distribution, &before, &mut fresh);
        let expected = classify_expected_result(&before, &operation, config.transition_policy);

        let outcome = execute_operation(&desk, &operation);
        let after = desk.snapshot();

        if outcome.is_ok() && operation.writes_activity() {
            expected_feed += 1;
        }
        if matches!(operation, SimulatedOperation::Reset) {
            expected_feed = baseline_feed;
        }

        let actual: Result<String, String> = match &outcome {
            Ok(Some(entry)) => Ok(entry.action()),
            Ok(None) => Ok("success".to_string()),
            Err(e) => Err(e.to_string()),
        };

        let outcome_matches = matches!(
            (expected, &outcome),
            (ExpectedResult::ShouldSucceed, Ok(_)) | (ExpectedResult::ShouldFail, Err(_))
        );
        if !outcome_matches {
            violations.push(Violation::UnexpectedOutcome {
                operation_index: i,
                operation: operation.clone(),
                expected,
                actual: actual.clone(),
            });
        }

        let step = Step {
            operation: &operation,
            outcome: &outcome,
            before: &before,
            after: &after,
            expected_feed,
            policy: config.transition_policy,
        };
        if let Err(broken) = DeskInvariants::check_all(&step) {
            violations.extend(broken.into_iter().map(|violation| Violation::Invariant {
                operation_index: i,
                violation,
            }));
        }

        stats.record(&operation, &actual);

        if !violations.is_empty() && config.stop_on_first_violation {
            break;
        }
        if let Some(max_errors) = config.stop_on_error_count {
            if violations.len() >= max_errors {
                break;
            }
        }
    }

    let last = desk.snapshot();
    SimulatorReport {
        config,
        stats,
        violations,
        final_task_count: last.tasks.len(),
        final_feed_length: last.global_activity.len(),
    }
}

/// Deterministic ids for generated records
#[derive(Debug, Default)]
struct FreshIds(u64);

impl FreshIds {
    fn next(&mut self, prefix: &str) -> String {
        self.0 += 1;
        format!("sim-{prefix}{}", self.0)
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.random_range(0..items.len())])
    }
}

fn pick_role(rng: &mut StdRng) -> Role {
    Role::ALL[rng.random_range(0..Role::ALL.len())]
}

fn pick_action(rng: &mut StdRng) -> WorkflowAction {
    WorkflowAction::ALL[rng.random_range(0..WorkflowAction::ALL.len())]
}

fn pick_platforms(rng: &mut StdRng) -> Vec<Platform> {
    let count = rng.random_range(1..=3);
    (0..count)
        .map(|_| Platform::ALL[rng.random_range(0..Platform::ALL.len())])
        .collect()
}

fn generate_operation(
    rng: &mut StdRng,
    distribution: &OperationDistribution,
    state: &DeskState,
    fresh: &mut FreshIds,
) -> SimulatedOperation {
    let r: f64 = rng.random();

    if r < distribution.valid_ops {
        generate_valid_operation(rng, state, fresh)
    } else if r < distribution.valid_ops + distribution.edge_cases {
        generate_edge_case_operation(rng, state, fresh)
    } else {
        generate_invalid_operation(rng, state, fresh)
    }
}

fn generate_valid_operation(
    rng: &mut StdRng,
    state: &DeskState,
    fresh: &mut FreshIds,
) -> SimulatedOperation {
    let task = pick(rng, &state.tasks);
    match rng.random_range(0..12) {
        0 => SimulatedOperation::Login(pick_role(rng)),
        1..=3 => {
            let movable: Vec<(TaskId, WorkflowAction)> = state
                .tasks
                .iter()
                .filter_map(|t| {
                    allowed_actions(t.internal_status)
                        .first()
                        .map(|action| (t.id.clone(), *action))
                })
                .collect();
            match pick(rng, &movable) {
                Some((id, action)) => SimulatedOperation::Workflow(id.clone(), *action),
                None => SimulatedOperation::Login(pick_role(rng)),
            }
        }
        4 | 5 => match task {
            Some(task) => SimulatedOperation::SaveDraft(
                task.id.clone(),
                format!("Draft revision {}", rng.random_range(1..1000)),
            ),
            None => SimulatedOperation::Logout,
        },
        6 => {
            let writers: Vec<&User> = state.users.iter().filter(|u| u.role == Role::Writer).collect();
            match (task, pick(rng, &writers)) {
                (Some(task), Some(writer)) => {
                    SimulatedOperation::Reassign(task.id.clone(), writer.id.clone())
                }
                _ => SimulatedOperation::Logout,
            }
        }
        7 => SimulatedOperation::AddClient(
            Client::new(fresh.next("c"), "Simulated Client", Utc::now())
                .with_package("Starter", f64::from(rng.random_range(100..3000u32))),
        ),
        8 => {
            let client_id = pick(rng, &state.clients)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| ClientId::new("c1"));
            SimulatedOperation::AddLocation(
                Location::new(fresh.next("l"), client_id, "Simulated Location")
                    .with_platforms(pick_platforms(rng))
                    .with_sla_hours(rng.random_range(1..=96)),
            )
        }
        9 => match pick(rng, &state.clients) {
            Some(client) => SimulatedOperation::UpdateClient(
                client.id.clone(),
                ClientPatch::new().with_notes(format!("note {}", rng.random_range(0..100))),
            ),
            None => SimulatedOperation::Logout,
        },
        10 => match pick(rng, &state.locations) {
            Some(location) => SimulatedOperation::UpdateLocation(
                location.id.clone(),
                LocationPatch::new().with_active(rng.random_bool(0.5)),
            ),
            None => SimulatedOperation::Logout,
        },
        _ => {
            let id = fresh.next("u");
            let email = format!("{id}@peachreviews.com");
            SimulatedOperation::AddUser(User::new(id, "Simulated User", email, pick_role(rng)))
        }
    }
}

fn generate_edge_case_operation(
    rng: &mut StdRng,
    state: &DeskState,
    fresh: &mut FreshIds,
) -> SimulatedOperation {
    let task_id = pick(rng, &state.tasks).map(|t| t.id.clone());
    match rng.random_range(0..8) {
        0 => match task_id {
            Some(id) => SimulatedOperation::Reassign(id, UserId::new("ghost-writer")),
            None => SimulatedOperation::Logout,
        },
        1 => match task_id {
            Some(id) => SimulatedOperation::SaveDraft(id, String::new()),
            None => SimulatedOperation::Logout,
        },
        2 => {
            let client_id = pick(rng, &state.clients)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| ClientId::new("c1"));
            SimulatedOperation::AddLocation(
                Location::new(fresh.next("l"), client_id, "Doubled Platforms")
                    .with_platforms(vec![Platform::Google, Platform::Yelp, Platform::Google]),
            )
        }
        3 => match pick(rng, &state.users) {
            Some(user) => SimulatedOperation::UpdateUser(user.id.clone(), UserPatch::new()),
            None => SimulatedOperation::Logout,
        },
        4 if rng.random_bool(0.1) => SimulatedOperation::Reset,
        5 => match pick(rng, &state.clients) {
            // Dangling references are tolerated
            Some(client) => SimulatedOperation::DeleteClient(client.id.clone()),
            None => SimulatedOperation::Logout,
        },
        6 => match pick(rng, &state.users) {
            Some(user) => SimulatedOperation::DeleteUser(user.id.clone()),
            None => SimulatedOperation::Logout,
        },
        7 => match pick(rng, &state.locations) {
            Some(location) => SimulatedOperation::DeleteLocation(location.id.clone()),
            None => SimulatedOperation::Logout,
        },
        _ => SimulatedOperation::Logout,
    }
}

fn generate_invalid_operation(
    rng: &mut StdRng,
    state: &DeskState,
    fresh: &mut FreshIds,
) -> SimulatedOperation {
    match rng.random_range(0..8) {
        0 => SimulatedOperation::Workflow(TaskId::new(fresh.next("missing-t")), pick_action(rng)),
        1 => {
            let stuck: Vec<(TaskId, WorkflowAction)> = state
                .tasks
                .iter()
                .flat_map(|t| {
                    let allowed = allowed_actions(t.internal_status);
                    WorkflowAction::ALL
                        .into_iter()
                        .filter(move |a| !allowed.contains(a))
                        .map(move |a| (t.id.clone(), a))
                })
                .collect();
            match pick(rng, &stuck) {
                Some((id, action)) => SimulatedOperation::Workflow(id.clone(), *action),
                None => SimulatedOperation::DeleteClient(ClientId::new(fresh.next("missing-c"))),
            }
        }
        2 => SimulatedOperation::AddClient(Client::new(fresh.next("c"), "   ", Utc::now())),
        3 => match pick(rng, &state.clients) {
            Some(existing) => SimulatedOperation::AddClient(existing.clone()),
            None => SimulatedOperation::AddClient(Client::new("", "Nameless", Utc::now())),
        },
        4 => SimulatedOperation::UpdateLocation(
            LocationId::new(fresh.next("missing-l")),
            LocationPatch::new().with_name("Nowhere"),
        ),
        5 => SimulatedOperation::AddUser(User::new(
            fresh.next("u"),
            "Bad Email",
            "not-an-email",
            Role::Writer,
        )),
        6 => match pick(rng, &state.clients) {
            Some(client) => {
                SimulatedOperation::UpdateClient(client.id.clone(), ClientPatch::new().with_mrr(-5.0))
            }
            None => SimulatedOperation::DeleteClient(ClientId::new(fresh.next("missing-c"))),
        },
        _ => SimulatedOperation::DeleteUser(UserId::new(fresh.next("missing-u"))),
    }
}

fn expect(ok: bool) -> ExpectedResult {
    if ok {
        ExpectedResult::ShouldSucceed
    } else {
        ExpectedResult::ShouldFail
    }
}

fn expect_add<R: Record>(state: &DeskState, record: &R) -> ExpectedResult
where
    DeskState: Collection<R>,
{
    let mut record = record.clone();
    record.normalize();
    expect(record.validate().is_ok() && <DeskState as Collection<R>>::find(state, record.id()).is_none())
}

fn expect_update<R: Record>(state: &DeskState, id: &R::Id, patch: &R::Patch) -> ExpectedResult
where
    DeskState: Collection<R>,
{
    match <DeskState as Collection<R>>::find(state, id) {
        None => ExpectedResult::ShouldFail,
        Some(existing) => {
            let mut merged = existing.clone();
            merged.apply_patch(patch);
            merged.normalize();
            expect(merged.validate().is_ok())
        }
    }
}

fn expect_delete<R: Record>(state: &DeskState, id: &R::Id) -> ExpectedResult
where
    DeskState: Collection<R>,
{
    expect(<DeskState as Collection<R>>::find(state, id).is_some())
}

/// Classify an operation against the state it is about to run on
fn classify_expected_result(
    state: &DeskState,
    operation: &SimulatedOperation,
    policy: TransitionPolicy,
) -> ExpectedResult {
    match operation {
        SimulatedOperation::Login(role) => expect(state.users.iter().any(|u| u.role == *role)),
        SimulatedOperation::Logout | SimulatedOperation::Reset => ExpectedResult::ShouldSucceed,
        SimulatedOperation::Workflow(id, action) => match state.task(id) {
            None => ExpectedResult::ShouldFail,
            Some(task) => expect(policy.apply(task.internal_status, *action).is_ok()),
        },
        SimulatedOperation::SaveDraft(id, _) | SimulatedOperation::Reassign(id, _) => {
            expect(state.task(id).is_some())
        }
        SimulatedOperation::AddClient(client) => expect_add(state, client),
        SimulatedOperation::UpdateClient(id, patch) => expect_update::<Client>(state, id, patch),
        SimulatedOperation::DeleteClient(id) => expect_delete::<Client>(state, id),
        SimulatedOperation::AddLocation(location) => expect_add(state, location),
        SimulatedOperation::UpdateLocation(id, patch) => {
            expect_update::<Location>(state, id, patch)
        }
        SimulatedOperation::DeleteLocation(id) => expect_delete::<Location>(state, id),
        SimulatedOperation::AddUser(user) => expect_add(state, user),
        SimulatedOperation::UpdateUser(id, patch) => expect_update::<User>(state, id, patch),
        SimulatedOperation::DeleteUser(id) => expect_delete::<User>(state, id),
    }
}

fn execute_operation(
    desk: &DeskHandle,
    operation: &SimulatedOperation,
) -> DeskResult<Option<ActivityEntry>> {
    let entry = match operation {
        SimulatedOperation::Login(role) => {
            desk.login_role(*role)?;
            return Ok(None);
        }
        SimulatedOperation::Logout => {
            desk.logout();
            return Ok(None);
        }
        SimulatedOperation::Reset => {
            desk.reset();
            return Ok(None);
        }
        SimulatedOperation::Workflow(id, WorkflowAction::StartWriting) => desk.start_writing(id)?,
        SimulatedOperation::Workflow(id, WorkflowAction::MarkWritten) => desk.mark_written(id)?,
        SimulatedOperation::Workflow(id, WorkflowAction::MarkDelivered) => {
            desk.mark_delivered(id)?
        }
        SimulatedOperation::SaveDraft(id, content) => desk.save_draft(id, content)?,
        SimulatedOperation::Reassign(id, writer) => desk.reassign_task(id, writer)?,
        SimulatedOperation::AddClient(client) => desk.add_client(client.clone())?,
        SimulatedOperation::UpdateClient(id, patch) => desk.update_client(id, patch.clone())?,
        SimulatedOperation::DeleteClient(id) => desk.delete_client(id)?,
        SimulatedOperation::AddLocation(location) => desk.add_location(location.clone())?,
        SimulatedOperation::UpdateLocation(id, patch) => {
            desk.update_location(id, patch.clone())?
        }
        SimulatedOperation::DeleteLocation(id) => desk.delete_location(id)?,
        SimulatedOperation::AddUser(user) => desk.add_user(user.clone())?,
        SimulatedOperation::UpdateUser(id, patch) => desk.update_user(id, patch.clone())?,
        SimulatedOperation::DeleteUser(id) => desk.delete_user(id)?,
    };
    Ok(Some(entry))
}

/// One executed operation with the states around it
pub struct Step<'a> {
    pub operation: &'a SimulatedOperation,
    pub outcome: &'a DeskResult<Option<ActivityEntry>>,
    pub before: &'a Arc<DeskState>,
    pub after: &'a Arc<DeskState>,
    /// Feed length the run should have reached
    pub expected_feed: usize,
    pub policy: TransitionPolicy,
}

pub struct DeskInvariants;

impl DeskInvariants {
    pub fn check_all(step: &Step<'_>) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<InvariantViolation> = [
            Self::check_feed_length(step),
            Self::check_feed_order(step),
            Self::check_latest_entry(step),
            Self::check_no_regression(step),
            Self::check_failure_is_clean(step),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn check_feed_length(step: &Step<'_>) -> Result<(), InvariantViolation> {
        let actual = step.after.global_activity.len();
        if actual == step.expected_feed {
            Ok(())
        } else {
            Err(InvariantViolation {
                check: InvariantCheck::FeedLengthMatchesActivityCalls,
                details: format!("feed has {actual} entries, expected {}", step.expected_feed),
            })
        }
    }

    pub fn check_feed_order(step: &Step<'_>) -> Result<(), InvariantViolation> {
        let feed = &step.after.global_activity;
        match feed.windows(2).position(|w| w[0].timestamp < w[1].timestamp) {
            None => Ok(()),
            Some(index) => Err(InvariantViolation {
                check: InvariantCheck::FeedIsNewestFirst,
                details: format!("entry {} is older than entry {}", index, index + 1),
            }),
        }
    }

    pub fn check_latest_entry(step: &Step<'_>) -> Result<(), InvariantViolation> {
        let Ok(Some(entry)) = step.outcome else {
            return Ok(());
        };
        if step.after.global_activity.first() != Some(entry) {
            return Err(InvariantViolation {
                check: InvariantCheck::FeedHeadIsLatestEntry,
                details: format!("feed head is not '{}'", entry.action()),
            });
        }
        if let Some(task_id) = step.operation.task_id() {
            let last = step.after.task(task_id).and_then(|t| t.activity.last());
            if last != Some(entry) {
                return Err(InvariantViolation {
                    check: InvariantCheck::TaskLogEndsWithLatestEntry,
                    details: format!("task {task_id} log does not end with '{}'", entry.action()),
                });
            }
        }
        Ok(())
    }

    pub fn check_no_regression(step: &Step<'_>) -> Result<(), InvariantViolation> {
        if step.policy == TransitionPolicy::Lenient
            || matches!(step.operation, SimulatedOperation::Reset)
        {
            return Ok(());
        }
        for task in &step.after.tasks {
            if let Some(previous) = step.before.task(&task.id) {
                if task.internal_status.rank() < previous.internal_status.rank() {
                    return Err(InvariantViolation {
                        check: InvariantCheck::StatusNeverRegresses,
                        details: format!(
                            "task {} moved from {} to {}",
                            task.id, previous.internal_status, task.internal_status
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn check_failure_is_clean(step: &Step<'_>) -> Result<(), InvariantViolation> {
        if step.outcome.is_err() && !Arc::ptr_eq(step.before, step.after) {
            return Err(InvariantViolation {
                check: InvariantCheck::FailureLeavesStateUntouched,
                details: format!("failed {} replaced the state", step.operation.name()),
            });
        }
        Ok(())
    }
}
