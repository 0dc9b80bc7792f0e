//! Store state snapshot
//!
//! A `DeskState` is never mutated once published: the handle clones it,
//! applies one operation to the clone and swaps the result in.

use crate::seed::Seed;
use peach_core::{
    ActivityEntry, Client, ClientId, Location, LocationId, Record, Task, TaskId, User, UserId,
    ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskState {
    #[serde(default)]
    pub current_user: Option<User>,
    pub clients: Vec<Client>,
    pub locations: Vec<Location>,
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    /// Every entry across all tasks and entities, newest first
    pub global_activity: Vec<ActivityEntry>,
}

impl DeskState {
    /// Build the initial state: nobody signed in, global feed aggregated
    /// from the seed tasks' own logs and sorted newest first.
    #[must_use]
    pub fn from_seed(seed: &Seed) -> Self {
        let mut global_activity: Vec<ActivityEntry> = seed
            .tasks
            .iter()
            .flat_map(|t| t.activity.iter().cloned())
            .collect();
        global_activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Self {
            current_user: None,
            clients: seed.clients.clone(),
            locations: seed.locations.clone(),
            users: seed.users.clone(),
            tasks: seed.tasks.clone(),
            global_activity,
        }
    }

    #[must_use]
    pub fn client(&self, id: &ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| &l.id == id)
    }

    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Normalize every directory record, then check each one and reject
    /// repeated ids within a collection
    pub fn normalize_and_validate(&mut self) -> Result<(), ValidationError> {
        check_records(&mut self.clients)?;
        check_records(&mut self.locations)?;
        check_records(&mut self.users)
    }

    /// Prepend to the global feed
    pub(crate) fn push_global(&mut self, entry: ActivityEntry) {
        self.global_activity.insert(0, entry);
    }
}

fn check_records<R: Record>(records: &mut [R]) -> Result<(), ValidationError> {
    for i in 0..records.len() {
        records[i].normalize();
        records[i].validate()?;
        let id = records[i].id();
        if records[..i].iter().any(|r| r.id() == id) {
            return Err(ValidationError::DuplicateId {
                kind: R::KIND,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Access to the collection holding records of type `R`
pub trait Collection<R: Record> {
    fn records(&self) -> &[R];
    fn records_mut(&mut self) -> &mut Vec<R>;

    fn find(&self, id: &R::Id) -> Option<&R> {
        self.records().iter().find(|r| r.id() == id)
    }
}

impl Collection<Client> for DeskState {
    fn records(&self) -> &[Client] {
        &self.clients
    }

    fn records_mut(&mut self) -> &mut Vec<Client> {
        &mut self.clients
    }
}

impl Collection<Location> for DeskState {
    fn records(&self) -> &[Location] {
        &self.locations
    }

    fn records_mut(&mut self) -> &mut Vec<Location> {
        &mut self.locations
    }
}

impl Collection<User> for DeskState {
    fn records(&self) -> &[User] {
        &self.users
    }

    fn records_mut(&mut self) -> &mut Vec<User> {
        &mut self.users
    }
}
