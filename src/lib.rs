//! detlab: primitives that make concurrent and branchy code deterministically testable.
//!
//! # Overview
//!
//! Code whose behavior depends on thread scheduling or on random choices is
//! hard to test: a failure may show up once in a thousand runs and never
//! again. detlab takes both sources of nondeterminism away from the runtime
//! and hands them to the test author:
//!
//! - **Cooperative scheduling**: [`lab::CoopScheduler`] runs tasks on real
//!   threads but resumes exactly one at a time, picked by a `choose(n)` policy.
//! - **Decision scripts**: [`lab::Decisions`] stands in for coin flips and
//!   n-way picks; [`lab::run_all_permutations`] re-runs a test once per
//!   reachable answer sequence.
//! - **Replay**: any failing answer sequence is printed as a short hex string
//!   that `DETLAB_REPLAY` feeds back in to re-run just that scenario.
//!
//! Coverage is only as complete as the decisions routed through these
//! primitives; nothing is discovered automatically.
//!
//! # Example
//!
//! ```
//! use detlab::lab::run_all_permutations;
//!
//! let mut seen = Vec::new();
//! run_all_permutations(|d| seen.push((d.either(), d.choose(3))));
//! assert_eq!(seen.len(), 6);
//! ```
//!
//! # Module Structure
//!
//! - [`lab`]: scheduler, decision walker, explorer and policies
//! - [`config`]: explorer configuration and `DETLAB_*` overrides
//! - [`error`]: error types
//! - [`util`]: deterministic RNG
//! - [`test_utils`]: tracing setup and logging macros for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod error;
pub mod lab;
pub mod test_utils;
pub mod util;

pub use config::ExploreConfig;
pub use error::{Error, ErrorCategory, ErrorKind, Result};
pub use lab::{
    run_all_permutations, CoopScheduler, Decisions, PermutationExplorer, PermutationReport,
    RunSummary, Script,
};
