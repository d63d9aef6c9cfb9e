//! Deterministic lab primitives for testing.
//!
//! Test code composes these pieces:
//!
//! - [`CoopScheduler`]: runs tasks on real threads but lets exactly one of
//!   them proceed between driver decisions
//! - [`Decisions`] + [`PermutationExplorer`]: replace coin flips with recorded
//!   answers and re-run a test once per reachable answer sequence
//! - [`policy`]: stock `choose(n)` policies, including one that routes
//!   scheduling through a [`Decisions`] walker

pub mod decisions;
pub mod explorer;
pub mod identity;
pub mod policy;
pub mod scheduler;
pub mod script;
pub mod signal;

pub use decisions::Decisions;
pub use explorer::{replay_command, run_all_permutations, PermutationExplorer, PermutationReport};
pub use identity::{current_thread_task_id, TaskIdentity, ThreadIdentity};
pub use scheduler::{CoopScheduler, RunSummary};
pub use script::{Script, ScriptDecodeError};
pub use signal::WakeSignal;
