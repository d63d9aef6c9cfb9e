//! Decision scripts: recorded answers for every binary choice of one run.
//!
//! A [`Script`] is a growable bit vector. The enumeration driver treats it as
//! a binary counter (earliest decision most significant) and steps it with
//! [`Script::advance`]; the text form lets an operator pin one scenario and
//! replay it outside the full enumeration.
//!
//! # Text format
//!
//! Bit `i` of the script lands in byte `i / 8` at bit position `i % 8`
//! (least significant first), and the bytes are written as lowercase hex.
//! Trailing `false` entries are dropped before encoding and implicitly
//! restored on decode: the walker answers `false` past the end of a script
//! anyway, so both forms drive a program down the same path.

use std::fmt;
use std::str::FromStr;

/// Failure to decode the text form of a script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptDecodeError {
    /// The text is not valid hex.
    #[error("replay script {text:?} is not valid hex: {source}")]
    InvalidHex {
        /// The rejected input.
        text: String,
        /// Underlying decoder error.
        #[source]
        source: hex::FromHexError,
    },
}

/// Ordered sequence of recorded binary decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    bits: Vec<bool>,
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Number of recorded decisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no decisions are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Decision at `index`, if recorded.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Appends a decision.
    pub fn push(&mut self, decision: bool) {
        self.bits.push(decision);
    }

    /// Recorded decisions in order.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Drops trailing entries equal to `value`.
    pub fn trim_trailing(&mut self, value: bool) {
        while self.bits.last() == Some(&value) {
            self.bits.pop();
        }
    }

    /// Steps the counter to the next script in enumeration order.
    ///
    /// Trailing `true` entries are dropped and the new last entry (now
    /// `false`) is flipped to `true`. Returns `false` once nothing is left to
    /// flip, i.e. the whole decision space has been visited.
    pub fn advance(&mut self) -> bool {
        self.trim_trailing(true);
        match self.bits.last_mut() {
            Some(last) => {
                debug_assert!(!*last);
                *last = true;
                true
            }
            None => false,
        }
    }

    /// Encodes the script as packed lowercase hex.
    #[must_use]
    pub fn to_text(&self) -> String {
        let used = self
            .bits
            .iter()
            .rposition(|&bit| bit)
            .map_or(0, |last| last + 1);
        let mut bytes = vec![0u8; used.div_ceil(8)];
        for (i, &bit) in self.bits[..used].iter().enumerate() {
            if bit {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        hex::encode(bytes)
    }

    /// Decodes the packed hex form produced by [`Script::to_text`].
    ///
    /// Surrounding whitespace is ignored; upper-case digits are accepted.
    pub fn from_text(text: &str) -> Result<Self, ScriptDecodeError> {
        let bytes = hex::decode(text.trim()).map_err(|source| ScriptDecodeError::InvalidHex {
            text: text.to_owned(),
            source,
        })?;
        let mut script = Self {
            bits: (0..bytes.len() * 8)
                .map(|i| (bytes[i / 8] >> (i % 8)) & 1 == 1)
                .collect(),
        };
        script.trim_trailing(false);
        Ok(script)
    }
}

impl From<Vec<bool>> for Script {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<&[bool]> for Script {
    fn from(bits: &[bool]) -> Self {
        Self {
            bits: bits.to_vec(),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Script {
    type Err = ScriptDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
