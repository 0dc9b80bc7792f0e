// Randomized operation runs against a live desk

pub mod simulator;

pub use simulator::*;

use peach_core::TransitionPolicy;

/// Entry points for long simulator runs
pub struct TestHarness;

impl TestHarness {
    /// One long run under the given policy
    pub fn run_stress_test(
        operations: u64,
        seed: u64,
        policy: TransitionPolicy,
    ) -> StressTestReport {
        tracing::info!(operations, seed, ?policy, "running stress test");

        let report = run_simulator(SimulatorConfig {
            seed,
            total_operations: operations,
            transition_policy: policy,
            ..Default::default()
        });

        StressTestReport {
            operations,
            violations: report.violations.len(),
            success: report.passed(),
        }
    }

    /// Several seeds under both policies
    pub fn run_certification(seeds: u64, operations: u64) -> CertificationReport {
        tracing::info!(seeds, operations, "running certification");

        let mut all_passed = true;
        let mut total_violations = 0;

        for seed in 0..seeds {
            for policy in [TransitionPolicy::Strict, TransitionPolicy::Lenient] {
                let report = run_simulator(SimulatorConfig {
                    seed,
                    total_operations: operations,
                    transition_policy: policy,
                    ..Default::default()
                });
                if !report.passed() {
                    all_passed = false;
                }
                total_violations += report.violations.len();
            }
        }

        CertificationReport {
            passed: all_passed && total_violations == 0,
            total_violations,
            seeds_tested: seeds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StressTestReport {
    pub operations: u64,
    pub violations: usize,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct CertificationReport {
    pub passed: bool,
    pub total_violations: usize,
    pub seeds_tested: u64,
}
