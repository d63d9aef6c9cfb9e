#![allow(dead_code)]
#![allow(unused_imports)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use detlab::lab::CoopScheduler;
use proptest::prelude::ProptestConfig;
use proptest::test_runner::RngSeed;
use std::sync::{Arc, Mutex};

pub use detlab::test_utils::{assert_sequence, env_lock, init_test_logging, DEFAULT_TEST_SEED};
pub use detlab::{test_complete, test_phase, test_section};

/// Default seed for property tests when running under CI.
pub const DEFAULT_PROPTEST_SEED: u64 = 0x5EED_5EED;

const PROPTEST_SEED_ENV: &str = "DETLAB_PROPTEST_SEED";

/// Build a ProptestConfig with deterministic seed support for CI.
#[must_use]
pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    let mut config = ProptestConfig::with_cases(cases);
    if matches!(config.rng_seed, RngSeed::Random) {
        if let Some(seed) = read_proptest_seed() {
            config.rng_seed = RngSeed::Fixed(seed);
        }
    }
    config
}

fn read_proptest_seed() -> Option<u64> {
    if let Ok(value) = std::env::var(PROPTEST_SEED_ENV) {
        return value.parse::<u64>().ok();
    }
    if std::env::var("CI").is_ok() {
        return Some(DEFAULT_PROPTEST_SEED);
    }
    None
}

/// Shared, ordered event log that task closures append to.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().expect("log lock").push(event.into());
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.events.lock().expect("log lock").clone()
    }

    #[must_use]
    pub fn joined(&self) -> String {
        self.snapshot().join(" ")
    }
}

/// Spawn `tasks` tasks that each log `<name>.<step>` for `steps` steps,
/// yielding between steps.
pub fn spawn_steppers(sched: &CoopScheduler, log: &EventLog, tasks: &[&'static str], steps: usize) {
    for &name in tasks {
        let (s, log) = (sched.clone(), log.clone());
        sched.spawn(move || {
            for step in 0..steps {
                if step > 0 {
                    s.yield_now();
                }
                log.push(format!("{name}.{step}"));
            }
        });
    }
}
