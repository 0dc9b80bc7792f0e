//! Stress and property tests for the desk store
//!
//! Run with: cargo test --package peach-store --test stress_test

use peach_core::{InternalStatus, Role, TaskId, TransitionPolicy, UserId};
use peach_store::api::*;
use peach_store::test_harness::TestHarness;
use peach_store::{run_simulator, SimulatorConfig};
use peach_test_utils::{sample_client, seeded_handle};
use proptest::prelude::*;
use std::time::Instant;

const TASK_IDS: [&str; 10] = ["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9", "t10"];

#[test]
fn stress_test_simulator_strict() {
    let start = Instant::now();
    let report = run_simulator(SimulatorConfig {
        seed: 2026,
        total_operations: 5_000,
        ..Default::default()
    });
    println!("{}", report.generate_text());
    println!("  Completed in {:.2}s", start.elapsed().as_secs_f64());

    assert!(report.passed(), "violations: {:?}", report.violations);
    assert_eq!(report.stats.total_operations, 5_000);
}

#[test]
fn stress_test_simulator_lenient() {
    let report = TestHarness::run_stress_test(2_000, 99, TransitionPolicy::Lenient);
    assert!(report.success);
    assert_eq!(report.violations, 0);
}

#[test]
fn certification_over_several_seeds() {
    let report = TestHarness::run_certification(4, 400);
    assert!(report.passed);
    assert_eq!(report.seeds_tested, 4);
}

#[test]
fn concurrent_writers_lose_no_entries() {
    let desk = seeded_handle();
    desk.login_role(Role::Writer).unwrap();
    let initial = desk.global_activity().len();

    std::thread::scope(|s| {
        for worker in 0..4 {
            let desk = &desk;
            s.spawn(move || {
                for round in 0..50 {
                    let id = TaskId::new(TASK_IDS[(worker + round) % TASK_IDS.len()]);
                    desk.save_draft(&id, &format!("draft {worker}-{round}")).unwrap();
                }
                desk.add_client(sample_client(&format!("c-{worker}"))).unwrap();
            });
        }
    });

    let state = desk.snapshot();
    assert_eq!(state.global_activity.len(), initial + 4 * 51);
    assert!(state.global_activity[..4 * 51]
        .windows(2)
        .all(|w| w[0].timestamp >= w[1].timestamp));
    let task_entries: usize = state.tasks.iter().map(|t| t.activity.len()).sum();
    assert_eq!(task_entries, initial + 4 * 50);
}

#[test]
fn concurrent_transitions_apply_once() {
    let desk = seeded_handle();
    let id = TaskId::new("t6");

    let applied: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| desk.start_writing(&id).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum()
    });

    assert_eq!(applied, 1);
    let state = desk.snapshot();
    let t6 = state.task(&id).unwrap();
    assert_eq!(t6.internal_status, InternalStatus::Writing);
    assert_eq!(t6.activity.len(), 1);
}

#[derive(Debug, Clone)]
enum Op {
    Start(usize),
    Written(usize),
    Delivered(usize),
    Draft(usize),
    Reassign(usize, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let task = 0..TASK_IDS.len();
    prop_oneof![
        task.clone().prop_map(Op::Start),
        task.clone().prop_map(Op::Written),
        task.clone().prop_map(Op::Delivered),
        task.clone().prop_map(Op::Draft),
        (task, 1u8..=4).prop_map(|(t, w)| Op::Reassign(t, w)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn feed_grows_by_one_per_applied_operation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let desk = seeded_handle();
        let initial = desk.global_activity().len();
        let mut applied = 0usize;

        for op in &ops {
            let before = desk.snapshot();
            let result = match op {
                Op::Start(t) => desk.start_writing(&TaskId::new(TASK_IDS[*t])),
                Op::Written(t) => desk.mark_written(&TaskId::new(TASK_IDS[*t])),
                Op::Delivered(t) => desk.mark_delivered(&TaskId::new(TASK_IDS[*t])),
                Op::Draft(t) => desk.save_draft(&TaskId::new(TASK_IDS[*t]), "draft"),
                Op::Reassign(t, w) => {
                    desk.reassign_task(&TaskId::new(TASK_IDS[*t]), &UserId::new(format!("w{w}")))
                }
            };
            let after = desk.snapshot();

            match result {
                Ok(entry) => {
                    applied += 1;
                    prop_assert_eq!(&after.global_activity[0], &entry);
                }
                Err(_) => prop_assert!(std::sync::Arc::ptr_eq(&before, &after)),
            }

            for (old, new) in before.tasks.iter().zip(&after.tasks) {
                prop_assert!(new.internal_status.rank() >= old.internal_status.rank());
            }
        }

        prop_assert_eq!(desk.global_activity().len(), initial + applied);
    }
}
