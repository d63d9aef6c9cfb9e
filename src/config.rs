//! Configuration for the permutation explorer.
//!
//! # Configuration Precedence
//!
//! 1. **Programmatic**: builder methods on [`ExploreConfig`]
//! 2. **Environment variables**: `DETLAB_*`, applied by [`ExploreConfig::from_env`]
//! 3. **Defaults**: [`ExploreConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `DETLAB_REPLAY` | hex script | `replay` |
//! | `DETLAB_MAX_RUNS` | `u64`, at least 1 | `max_runs` |
//! | `DETLAB_PROGRESS_MS` | `u64` | `progress_interval` |
//!
//! `DETLAB_REPLAY` is how an operator re-runs one failing scenario: the
//! failure log prints the exact value to use.

use crate::error::{Error, Result};
use crate::lab::script::Script;
use std::time::Duration;

/// Environment variable holding a single script to replay.
pub const ENV_REPLAY: &str = "DETLAB_REPLAY";
/// Environment variable capping the number of enumerated runs.
pub const ENV_MAX_RUNS: &str = "DETLAB_MAX_RUNS";
/// Environment variable for the progress log interval in milliseconds.
pub const ENV_PROGRESS_MS: &str = "DETLAB_PROGRESS_MS";

const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for [`PermutationExplorer`](crate::lab::PermutationExplorer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreConfig {
    /// Run exactly this script once instead of enumerating.
    pub replay: Option<Script>,
    /// Stop after this many runs even if scripts remain. The first run always happens.
    pub max_runs: Option<u64>,
    /// Minimum time between progress log lines.
    pub progress_interval: Duration,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            replay: None,
            max_runs: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ExploreConfig {
    /// Default configuration: full enumeration, no run cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any `DETLAB_*` variables that are set.
    ///
    /// Fails before any run if a variable holds an unparseable value.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Replays `script` once instead of enumerating.
    #[must_use]
    pub fn replay(mut self, script: Script) -> Self {
        self.replay = Some(script);
        self
    }

    /// Replays the script encoded as `text`.
    pub fn replay_text(self, text: &str) -> Result<Self> {
        let script = Script::from_text(text)?;
        Ok(self.replay(script))
    }

    /// Caps the number of enumerated runs.
    ///
    /// The first run always happens, so a cap of 0 is stored as 1.
    #[must_use]
    pub const fn max_runs(mut self, runs: u64) -> Self {
        self.max_runs = Some(if runs == 0 { 1 } else { runs });
        self
    }

    /// Sets the progress log interval.
    #[must_use]
    pub const fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Apply environment variable overrides to an [`ExploreConfig`].
///
/// Only variables that are set (and non-empty) are applied.
pub fn apply_env_overrides(config: &mut ExploreConfig) -> Result<()> {
    if let Some(val) = read_env(ENV_REPLAY) {
        let script = Script::from_text(&val).map_err(|e| {
            Error::from(e).with_message(format!(
                "{ENV_REPLAY} provided but does not parse as a script: {val:?}"
            ))
        })?;
        config.replay = Some(script);
    }
    if let Some(val) = read_env(ENV_MAX_RUNS) {
        let runs = parse_u64(ENV_MAX_RUNS, &val)?;
        if runs == 0 {
            return Err(Error::invalid_config(format!(
                "invalid value for {ENV_MAX_RUNS}: the run budget must be at least 1"
            )));
        }
        config.max_runs = Some(runs);
    }
    if let Some(val) = read_env(ENV_PROGRESS_MS) {
        config.progress_interval = Duration::from_millis(parse_u64(ENV_PROGRESS_MS, &val)?);
    }
    Ok(())
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_u64(var_name: &str, val: &str) -> Result<u64> {
    val.trim().parse::<u64>().map_err(|e| {
        Error::invalid_config(format!(
            "invalid value for {var_name}: expected unsigned integer, got {val:?} ({e})"
        ))
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults() {
        let config = ExploreConfig::default();
        assert!(config.replay.is_none());
        assert!(config.max_runs.is_none());
        assert_eq!(config.progress_interval, Duration::from_secs(1));
    }

    #[test]
    fn builder_methods() {
        let config = ExploreConfig::new()
            .max_runs(10)
            .progress_interval(Duration::from_millis(5))
            .replay_text("05")
            .expect("valid hex");
        assert_eq!(config.max_runs, Some(10));
        assert_eq!(
            config.replay.as_ref().map(Script::as_slice),
            Some(&[true, false, true][..])
        );
    }

    #[test]
    fn zero_run_budget_is_one_run() {
        assert_eq!(ExploreConfig::new().max_runs(0).max_runs, Some(1));
    }

    #[test]
    fn replay_text_rejects_garbage() {
        let err = ExploreConfig::new().replay_text("not-hex").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidReplayScript);
    }

    #[test]
    fn parse_u64_reports_variable() {
        let err = parse_u64(ENV_MAX_RUNS, "ten").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.to_string().contains(ENV_MAX_RUNS));
        assert_eq!(parse_u64(ENV_MAX_RUNS, " 42 ").ok(), Some(42));
    }
}
