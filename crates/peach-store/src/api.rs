//! Operation traits implemented by `DeskHandle`
//!
//! Every mutation that writes an activity entry returns it, so callers can
//! show the exact line that landed in the feed.

use peach_core::{
    ActivityEntry, Client, ClientId, ClientPatch, DeskResult, Location, LocationId, LocationPatch,
    Role, TaskId, User, UserId, UserPatch,
};

pub trait SessionManager {
    /// Sign in with an email/password pair from the credential table
    fn login(&self, email: &str, password: &str) -> DeskResult<User>;

    /// Sign in as the first user holding `role`
    fn login_role(&self, role: Role) -> DeskResult<User>;

    fn logout(&self);

    fn current_user(&self) -> Option<User>;
}

pub trait TaskWorkflow {
    fn start_writing(&self, task_id: &TaskId) -> DeskResult<ActivityEntry>;
    fn save_draft(&self, task_id: &TaskId, content: &str) -> DeskResult<ActivityEntry>;
    fn mark_written(&self, task_id: &TaskId) -> DeskResult<ActivityEntry>;
    fn mark_delivered(&self, task_id: &TaskId) -> DeskResult<ActivityEntry>;

    /// Hand the task to another writer. An unresolved writer id is kept
    /// as-is and named by its raw id in the feed.
    fn reassign_task(&self, task_id: &TaskId, writer_id: &UserId) -> DeskResult<ActivityEntry>;
}

pub trait ClientDirectory {
    fn add_client(&self, client: Client) -> DeskResult<ActivityEntry>;
    fn update_client(&self, id: &ClientId, patch: ClientPatch) -> DeskResult<ActivityEntry>;
    /// Removes only the client; locations and tasks that reference it stay.
    fn delete_client(&self, id: &ClientId) -> DeskResult<ActivityEntry>;
}

pub trait LocationDirectory {
    fn add_location(&self, location: Location) -> DeskResult<ActivityEntry>;
    fn update_location(&self, id: &LocationId, patch: LocationPatch)
        -> DeskResult<ActivityEntry>;
    fn delete_location(&self, id: &LocationId) -> DeskResult<ActivityEntry>;
}

pub trait UserDirectory {
    fn add_user(&self, user: User) -> DeskResult<ActivityEntry>;
    fn update_user(&self, id: &UserId, patch: UserPatch) -> DeskResult<ActivityEntry>;
    fn delete_user(&self, id: &UserId) -> DeskResult<ActivityEntry>;
}

pub trait ActivityFeed {
    /// Global feed, newest first
    fn global_activity(&self) -> Vec<ActivityEntry>;

    /// One task's own log, oldest first
    fn task_activity(&self, task_id: &TaskId) -> DeskResult<Vec<ActivityEntry>>;
}
