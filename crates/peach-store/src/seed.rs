//! Demo seed data
//!
//! Timestamps are laid out relative to a reference instant so the
//! dashboard always has something due soon, something overdue and
//! something delivered this month.

use chrono::{DateTime, Duration, Utc};
use peach_core::{
    ActivityEntry, ActivityKind, Client, ClientId, ClientStatus, ExternalStatus, Location,
    Platform, Priority, Role, Task, User, WorkflowAction,
};
use serde::{Deserialize, Serialize};

/// Fixed initial snapshot of every entity collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub clients: Vec<Client>,
    pub locations: Vec<Location>,
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
}

impl Seed {
    /// Empty seed: no entities, no history
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Demo data anchored at the current time
    #[must_use]
    pub fn demo() -> Self {
        Self::demo_at(Utc::now())
    }

    /// Demo data anchored at `now`
    #[must_use]
    pub fn demo_at(now: DateTime<Utc>) -> Self {
        let users = vec![
            User::new("a1", "Maya Chen", "admin@peachreviews.com", Role::Admin),
            User::new("w1", "Alice Moreno", "writer@peachreviews.com", Role::Writer),
            User::new("w2", "Ben Okafor", "ben@peachreviews.com", Role::Writer),
            User::new("w3", "Chloe Park", "chloe@peachreviews.com", Role::Writer),
            User::new("p1", "Dana Fischer", "provider@peachreviews.com", Role::Provider)
                .with_client_ids(vec![ClientId::new("c1"), ClientId::new("c2")]),
            User::new("p2", "Eli Novak", "eli@peachreviews.com", Role::Provider)
                .with_client_ids(vec![ClientId::new("c3"), ClientId::new("c4")]),
        ];

        let clients = vec![
            Client::new("c1", "Harbor Dental Group", now - Duration::days(210))
                .with_package("Growth", 1800.0)
                .with_notes("Prefers warm, patient-focused tone."),
            Client::new("c2", "Bluebird Bakery", now - Duration::days(120))
                .with_package("Starter", 650.0),
            Client::new("c3", "Summit Auto Care", now - Duration::days(90))
                .with_status(ClientStatus::Paused)
                .with_package("Pro", 2400.0)
                .with_notes("Paused until new ownership signs off."),
            Client::new("c4", "Lumen Yoga Studio", now - Duration::days(300))
                .with_status(ClientStatus::Cancelled)
                .with_package("Starter", 450.0),
        ];

        let locations = vec![
            Location::new("l1", "c1", "Harbor Dental Downtown")
                .with_city("Seattle")
                .with_platforms(vec![Platform::Google, Platform::Yelp])
                .with_external_id("recLOC0001"),
            Location::new("l2", "c1", "Harbor Dental Ballard")
                .with_city("Seattle")
                .with_platforms(vec![Platform::Google])
                .with_sla_hours(72)
                .with_external_id("recLOC0002"),
            Location::new("l3", "c2", "Bluebird Main Street")
                .with_city("Portland")
                .with_platforms(vec![Platform::Google, Platform::Facebook, Platform::Yelp])
                .with_sla_hours(24)
                .with_external_id("recLOC0003"),
            Location::new("l4", "c3", "Summit North")
                .with_city("Denver")
                .with_platforms(vec![Platform::Google, Platform::Trustpilot])
                .with_external_id("recLOC0004"),
            Location::new("l5", "c4", "Lumen Midtown")
                .with_city("Austin")
                .with_platforms(vec![Platform::Google, Platform::TripAdvisor])
                .with_external_id("recLOC0005")
                .inactive(),
        ];

        let (alice, ben, chloe, dana) = (&users[1], &users[2], &users[3], &users[4]);
        let (l1, l2, l3, l4, l5) = (
            &locations[0],
            &locations[1],
            &locations[2],
            &locations[3],
            &locations[4],
        );

        let tasks = vec![
            Task::new(
                "t1",
                l1,
                Platform::Google,
                "w1",
                now + Duration::days(1),
                "Highlight the painless cleaning and the friendly front desk.",
            )
            .with_priority(Priority::High)
            .with_tone("Warm", Some(120)),
            replay(
                Task::new(
                    "t2",
                    l1,
                    Platform::Yelp,
                    "w1",
                    now + Duration::days(2),
                    "Mention same-day emergency appointment.",
                )
                .with_draft("Chipped a tooth on a Saturday and they still fit me in"),
                &[(Step::Start, alice, now - Duration::hours(5))],
            ),
            replay(
                Task::new(
                    "t3",
                    l2,
                    Platform::Google,
                    "w2",
                    now + Duration::days(1),
                    "Kid-friendly hygienist, short wait times.",
                )
                .with_provider("p1")
                .with_draft("Our kids actually look forward to their checkups here."),
                &[
                    (Step::Start, ben, now - Duration::days(2)),
                    (Step::Draft, ben, now - Duration::days(1) - Duration::hours(2)),
                    (Step::Written, ben, now - Duration::days(1)),
                ],
            ),
            replay(
                Task::new(
                    "t4",
                    l3,
                    Platform::Facebook,
                    "w1",
                    now - Duration::days(3),
                    "Sourdough and the weekend pastry case.",
                )
                .with_provider("p1")
                .with_draft("Best sourdough in the neighborhood, hands down."),
                &[
                    (Step::Start, alice, now - Duration::days(6)),
                    (Step::Written, alice, now - Duration::days(5)),
                    (Step::Delivered, dana, now - Duration::days(4)),
                ],
            ),
            Task::new(
                "t5",
                l3,
                Platform::Google,
                "w3",
                now - Duration::days(1),
                "Custom birthday cakes, ordered two days ahead.",
            )
            .with_priority(Priority::Low),
            Task::new(
                "t6",
                l4,
                Platform::Trustpilot,
                "w2",
                now + Duration::days(3),
                "Honest diagnostics, no upsell.",
            ),
            replay(
                Task::new(
                    "t7",
                    l4,
                    Platform::Google,
                    "w2",
                    now - Duration::hours(2),
                    "Fast brake job, transparent pricing.",
                )
                .with_priority(Priority::High),
                &[(Step::Start, ben, now - Duration::days(1))],
            ),
            replay(
                Task::new(
                    "t8",
                    l5,
                    Platform::TripAdvisor,
                    "w3",
                    now + Duration::hours(12),
                    "Sunrise class for visitors staying downtown.",
                )
                .with_provider("p2")
                .with_draft("Dropped in while traveling and felt right at home."),
                &[
                    (Step::Start, chloe, now - Duration::hours(9)),
                    (Step::Written, chloe, now - Duration::hours(3)),
                ],
            ),
            {
                let mut task = replay(
                    Task::new(
                        "t9",
                        l2,
                        Platform::Google,
                        "w1",
                        now - Duration::days(12),
                        "Invisalign consult experience.",
                    )
                    .with_provider("p1")
                    .with_draft("The consult was thorough and nobody rushed me."),
                    &[
                        (Step::Start, alice, now - Duration::days(14)),
                        (Step::Written, alice, now - Duration::days(13)),
                        (Step::Delivered, dana, now - Duration::days(12)),
                    ],
                );
                task.external_status = ExternalStatus::Published;
                task
            },
            Task::new(
                "t10",
                l1,
                Platform::Google,
                "w3",
                now + Duration::days(5),
                "Evening hours for working parents.",
            ),
        ];

        Self {
            clients,
            locations,
            users,
            tasks,
        }
    }
}

#[derive(Clone, Copy)]
enum Step {
    Start,
    Draft,
    Written,
    Delivered,
}

impl Step {
    fn action(self) -> Option<WorkflowAction> {
        match self {
            Step::Start => Some(WorkflowAction::StartWriting),
            Step::Draft => None,
            Step::Written => Some(WorkflowAction::MarkWritten),
            Step::Delivered => Some(WorkflowAction::MarkDelivered),
        }
    }
}

/// Apply a recorded history to a fresh task, stamping its own log
fn replay(mut task: Task, history: &[(Step, &User, DateTime<Utc>)]) -> Task {
    for &(step, actor, at) in history {
        let task_id = task.id.clone();
        let kind = match step.action() {
            None => ActivityKind::DraftSaved { task_id },
            Some(action) => {
                task.internal_status = action.target();
                task.external_status = action.external_status();
                match action {
                    WorkflowAction::StartWriting => ActivityKind::TaskStarted { task_id },
                    WorkflowAction::MarkWritten => {
                        task.written_at = Some(at);
                        ActivityKind::TaskWritten { task_id }
                    }
                    WorkflowAction::MarkDelivered => {
                        task.delivered_at = Some(at);
                        ActivityKind::TaskDelivered { task_id }
                    }
                }
            }
        };
        task.activity.push(ActivityEntry::at(kind, Some(actor), at));
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use peach_core::InternalStatus;

    #[test]
    fn demo_seed_references_resolve() {
        let seed = Seed::demo();
        for task in &seed.tasks {
            assert!(seed.users.iter().any(|u| u.id == task.writer_id && u.role == Role::Writer));
            assert!(seed.locations.iter().any(|l| l.id == task.location_id));
            assert!(seed.clients.iter().any(|c| c.id == task.client_id));
        }
        for location in &seed.locations {
            assert!(seed.clients.iter().any(|c| c.id == location.client_id));
        }
    }

    #[test]
    fn history_drives_status_and_timestamps() {
        let seed = Seed::demo();
        let t4 = seed.tasks.iter().find(|t| t.id == "t4").unwrap();
        assert_eq!(t4.internal_status, InternalStatus::Delivered);
        assert!(t4.written_at.is_some());
        assert!(t4.delivered_at.is_some());
        assert_eq!(t4.activity.len(), 3);

        let t1 = seed.tasks.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.internal_status, InternalStatus::New);
        assert!(t1.activity.is_empty());
    }

    #[test]
    fn every_role_has_a_seeded_user() {
        let seed = Seed::demo();
        for role in Role::ALL {
            assert!(seed.users.iter().any(|u| u.role == role));
        }
    }
}
