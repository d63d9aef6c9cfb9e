//! Deterministic pseudo-random number generator.
//!
//! Backs the seeded scheduling policy: the same seed always yields the same
//! sequence of `choose(n)` answers, so a seeded interleaving can be re-run
//! exactly. Uses xorshift64; not cryptographically secure.

/// A deterministic pseudo-random number generator using xorshift64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetRng {
    state: u64,
}

impl DetRng {
    /// Creates a new PRNG with the given seed.
    ///
    /// Xorshift never leaves the all-zero state, so a zero seed is remapped to 1.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generates the next pseudo-random u64 value.
    #[allow(clippy::missing_const_for_fn)]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Picks an ordinal in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_index(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be non-zero");
        (self.next_u64() % bound as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_indices() {
        let mut a = DetRng::new(7);
        let mut b = DetRng::new(7);
        for bound in 1..64 {
            assert_eq!(a.next_index(bound), b.next_index(bound));
        }
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut rng = DetRng::new(0xDEAD_BEEF);
        for bound in 1..200 {
            assert!(rng.next_index(bound) < bound);
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        assert_eq!(DetRng::new(0), DetRng::new(1));
        let mut rng = DetRng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    #[should_panic(expected = "bound must be non-zero")]
    fn zero_bound_panics() {
        let _ = DetRng::new(3).next_index(0);
    }
}
