//! Exhaustive enumeration of decision scripts.
//!
//! The explorer re-runs a test body once per distinct [`Script`] until the
//! decision space the body actually reaches is exhausted.
//!
//! # Algorithm
//!
//! 1. Run the body against the current script with the cursor at 0.
//!    Decisions past the end of the script are recorded as `false`.
//! 2. Fail if the body left recorded decisions unread: it is not a pure
//!    function of its decisions.
//! 3. Advance the script as a binary counter (earliest decision most
//!    significant): drop trailing `true`s, flip the last `false` to `true`.
//! 4. Stop when nothing is left to flip.
//!
//! Every finite decision sequence the body can request is visited exactly
//! once, in increasing counter order. For a body calling `either()` then
//! `choose(5)` the observed pairs are `(false, 0) .. (false, 4)` followed by
//! `(true, 0) .. (true, 4)`.
//!
//! # Replay
//!
//! When the configuration carries a replay script (usually from
//! `DETLAB_REPLAY`), the body runs exactly once against it. Any failing run
//! logs the text form of its script together with the command to replay it.

use crate::config::{ExploreConfig, ENV_REPLAY};
use crate::error::{Error, Result};
use crate::lab::decisions::Decisions;
use crate::lab::script::Script;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Summary of a completed exploration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationReport {
    /// Number of times the test body ran.
    pub runs: u64,
    /// Whether the whole decision space was enumerated.
    pub exhausted: bool,
    /// The script replayed instead of enumerating, if any.
    pub replayed: Option<Script>,
    /// Length of the longest script any run needed.
    pub longest_script: usize,
}

/// Drives a test body through every decision script it can reach.
#[derive(Debug, Clone, Default)]
pub struct PermutationExplorer {
    config: ExploreConfig,
}

impl PermutationExplorer {
    /// Create an explorer with the given configuration.
    #[must_use]
    pub const fn new(config: ExploreConfig) -> Self {
        Self { config }
    }

    /// Create an explorer configured from `DETLAB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ExploreConfig::from_env().map(Self::new)
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExploreConfig {
        &self.config
    }

    /// Run `test` once per reachable decision script.
    ///
    /// Returns an error if a run leaves recorded decisions unread. A panic in
    /// `test` is resumed after the replay command for the failing script has
    /// been logged.
    pub fn run<F>(&self, mut test: F) -> Result<PermutationReport>
    where
        F: FnMut(&mut Decisions),
    {
        if let Some(script) = &self.config.replay {
            tracing::info!(script = %script, "replaying single scenario");
            let mut decisions = Decisions::with_script(script.clone());
            run_one(&mut decisions, &mut test)?;
            return Ok(PermutationReport {
                runs: 1,
                exhausted: false,
                replayed: Some(script.clone()),
                longest_script: decisions.script().len(),
            });
        }

        let mut decisions = Decisions::new();
        let mut runs = 0u64;
        let mut longest_script = 0;
        let mut last_report = Instant::now();
        let exhausted = loop {
            run_one(&mut decisions, &mut test)?;
            runs += 1;
            longest_script = longest_script.max(decisions.script().len());

            if !decisions.advance() {
                break true;
            }
            if self.config.max_runs.is_some_and(|max| runs >= max) {
                tracing::warn!(
                    runs,
                    next = %decisions.script(),
                    "run budget reached before the decision space was exhausted"
                );
                break false;
            }
            if last_report.elapsed() >= self.config.progress_interval {
                tracing::info!(runs, "ran {runs} permutations");
                last_report = Instant::now();
            }
        };
        tracing::info!(runs, exhausted, longest_script, "ran {runs} permutations");

        Ok(PermutationReport {
            runs,
            exhausted,
            replayed: None,
            longest_script,
        })
    }
}

fn run_one<F>(decisions: &mut Decisions, test: &mut F) -> Result<()>
where
    F: FnMut(&mut Decisions),
{
    decisions.rewind();
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| test(decisions))) {
        log_replay_hint(decisions.script());
        resume_unwind(payload);
    }

    if !decisions.fully_consumed() {
        let text = decisions.script().to_text();
        log_replay_hint(decisions.script());
        return Err(Error::non_deterministic(
            decisions.cursor(),
            decisions.script().len(),
            &text,
        ));
    }
    Ok(())
}

/// Command line that re-runs just `script` for the current test.
#[must_use]
pub fn replay_command(script: &Script) -> String {
    let text = script.to_text();
    match std::thread::current().name() {
        Some(test) if test != "main" => {
            format!("{ENV_REPLAY}={text} cargo test {test} -- --exact")
        }
        _ => format!("{ENV_REPLAY}={text}"),
    }
}

fn log_replay_hint(script: &Script) {
    tracing::error!(
        script = %script,
        "rerun just this scenario with: {}",
        replay_command(script)
    );
    tracing::error!(
        "changing the control flow of calls into the walker makes this replay a different scenario"
    );
}

/// Enumerate every decision script `test` can reach.
///
/// Configuration comes from the environment, so `DETLAB_REPLAY` narrows the
/// run to one recorded scenario.
///
/// # Panics
///
/// Panics if the environment configuration is invalid (before any run), if
/// the body turns out not to be deterministic, or if the body itself panics.
pub fn run_all_permutations<F>(test: F) -> PermutationReport
where
    F: FnMut(&mut Decisions),
{
    let explorer = PermutationExplorer::from_env().unwrap_or_else(|err| panic!("{err}"));
    explorer.run(test).unwrap_or_else(|err| panic!("{err}"))
}
