//! Test utilities for detlab.
//!
//! This module provides shared helpers for unit and integration tests:
//! - Consistent tracing-based logging initialization
//! - Phase/section macros for readable test output
//! - A recorder for the sequence of values a test body observes per run
//!
//! # Example
//! ```
//! use detlab::test_utils::init_test_logging;
//!
//! init_test_logging();
//! detlab::test_phase!("example");
//! ```

use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, Once, PoisonError};
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Default seed used by seeded-policy tests.
pub const DEFAULT_TEST_SEED: u64 = 0xDEAD_BEEF;

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .try_init();
    });
}

/// Acquire the global environment lock for tests that mutate `DETLAB_*` variables.
///
/// A test that failed while holding the lock does not block the others.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Compare an observed sequence against the expected one, logging both side by side.
///
/// # Panics
///
/// Panics if the sequences differ, after logging every row.
pub fn assert_sequence<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    let rows = actual.len().max(expected.len());
    let cell = |items: &[T], i: usize| {
        items
            .get(i)
            .map_or_else(|| "<missing>".to_owned(), |item| format!("{item:?}"))
    };
    let mut mismatch = None;
    tracing::debug!("{:<24}{}", "actual", "expected");
    for i in 0..rows {
        let (a, e) = (cell(actual, i), cell(expected, i));
        tracing::debug!("{a:<24}{e}");
        if actual.get(i) != expected.get(i) && mismatch.is_none() {
            mismatch = Some(i);
        }
    }
    if let Some(i) = mismatch {
        panic!(
            "sequences differ at row {i}: actual {}, expected {}",
            cell(actual, i),
            cell(expected, i)
        );
    }
}

/// Log a test phase transition with a visual separator.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "========================================");
        tracing::info!(phase = %$name, "TEST PHASE: {}", $name);
        tracing::info!(phase = %$name, "========================================");
    };
}

/// Log a section within a test phase.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        tracing::debug!(section = %$name, "--- {} ---", $name);
    };
}

/// Log test completion with summary.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = %$name, "test completed successfully: {}", $name);
    };
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            test = %$name,
            $($key = %$value,)*
            "test completed successfully: {}",
            $name
        );
    };
}
