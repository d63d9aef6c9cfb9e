//! Decision primitives that replace real nondeterminism in a program under test.
//!
//! Code under test asks [`Decisions::either`] or [`Decisions::choose`] instead
//! of flipping a coin. Answers come from the current [`Script`]; once the
//! script runs out it is extended with `false`, which is what makes the
//! enumeration driver able to discover how many decisions a path needs.

use crate::lab::script::Script;

/// Walker over a decision script for a single run.
#[derive(Debug, Clone, Default)]
pub struct Decisions {
    script: Script,
    cursor: usize,
}

impl Decisions {
    /// Creates a walker over an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a walker that replays `script` from the start.
    #[must_use]
    pub const fn with_script(script: Script) -> Self {
        Self { script, cursor: 0 }
    }

    /// Returns the next recorded decision, recording `false` if none is left.
    pub fn either(&mut self) -> bool {
        if self.cursor == self.script.len() {
            self.script.push(false);
        }
        let decision = self.script.get(self.cursor).unwrap_or(false);
        self.cursor += 1;
        decision
    }

    /// Picks an index in `[0, n)` by binary search over binary decisions.
    ///
    /// Consumes at most `ceil(log2 n)` decisions and none at all for `n == 1`.
    /// `n == 0` is a caller bug.
    pub fn choose(&mut self, n: usize) -> usize {
        assert!(n > 0, "choose requires at least one option");
        let mut min = 0;
        let mut max = n - 1;
        while min < max {
            let mid = min + (max - min) / 2;
            if self.either() {
                min = mid + 1;
            } else {
                max = mid;
            }
        }
        min
    }

    /// Position of the next unread decision.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The script as recorded so far.
    #[must_use]
    pub const fn script(&self) -> &Script {
        &self.script
    }

    /// Whether every recorded decision was consumed by this run.
    #[must_use]
    pub fn fully_consumed(&self) -> bool {
        self.cursor == self.script.len()
    }

    /// Rewinds to the start of the script for another run.
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Moves to the next script in enumeration order; `false` when exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        let more = self.script.advance();
        self.cursor = 0;
        more
    }
}
