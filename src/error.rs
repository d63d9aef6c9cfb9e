//! Error types for detlab.
//!
//! Error handling follows these principles:
//!
//! - Errors are explicit and typed (no stringly-typed errors)
//! - Configuration problems surface before any run starts
//! - Determinism violations carry the replay text of the script that exposed them
//!
//! # Error Categories
//!
//! - **Config**: bad `DETLAB_*` overrides or malformed replay scripts
//! - **Determinism**: the program under test did not consume its recorded decisions
//!
//! Caller contract breaches (an out-of-range `choose` result handed to the
//! scheduler, `choose(0)` on the walker) are programming errors and panic
//! instead of producing an [`Error`].

use core::fmt;
use std::sync::Arc;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // === Config ===
    /// Replay text did not decode into a script.
    InvalidReplayScript,
    /// A configuration value could not be parsed.
    InvalidConfig,

    // === Determinism ===
    /// A run finished without consuming every recorded decision.
    NonDeterministic,
}

impl ErrorKind {
    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidReplayScript | Self::InvalidConfig => ErrorCategory::Config,
            Self::NonDeterministic => ErrorCategory::Determinism,
        }
    }

    /// Short stable name used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidReplayScript => "invalid_replay_script",
            Self::InvalidConfig => "invalid_config",
            Self::NonDeterministic => "non_deterministic",
        }
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Operator-supplied configuration was rejected.
    Config,
    /// The program under test is not a pure function of its decisions.
    Determinism,
}

/// The main error type for detlab operations.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if this error reports a determinism violation.
    #[must_use]
    pub const fn is_non_deterministic(&self) -> bool {
        matches!(self.kind, ErrorKind::NonDeterministic)
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Adds a source error to the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// A run left recorded decisions unread.
    #[must_use]
    pub fn non_deterministic(consumed: usize, recorded: usize, replay: &str) -> Self {
        Self::new(ErrorKind::NonDeterministic).with_message(format!(
            "test is not deterministic: consumed {consumed} of {recorded} recorded decisions \
             (replay with DETLAB_REPLAY={replay})"
        ))
    }

    /// A configuration value failed to parse.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig).with_message(msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<crate::lab::script::ScriptDecodeError> for Error {
    fn from(err: crate::lab::script::ScriptDecodeError) -> Self {
        Self::new(ErrorKind::InvalidReplayScript)
            .with_message(err.to_string())
            .with_source(err)
    }
}

/// A specialized Result type for detlab operations.
pub type Result<T> = std::result::Result<T, Error>;
