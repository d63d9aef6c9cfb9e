//! Stock `choose(n)` policies for [`CoopScheduler::run`](crate::lab::CoopScheduler::run).
//!
//! Each policy returns an ordinal into the live tasks ordered by spawn index.
//! [`scripted`] hands the choice to a [`Decisions`] walker, which turns the
//! permutation driver into an exhaustive interleaving explorer:
//!
//! ```
//! use detlab::lab::{policy, run_all_permutations, CoopScheduler};
//! use std::sync::{Arc, Mutex};
//!
//! let mut orders = Vec::new();
//! run_all_permutations(|decisions| {
//!     let sched = CoopScheduler::new();
//!     let log = Arc::new(Mutex::new(String::new()));
//!     for name in ['a', 'b'] {
//!         let log = Arc::clone(&log);
//!         sched.spawn(move || log.lock().unwrap().push(name));
//!     }
//!     sched.run(policy::scripted(decisions));
//!     orders.push(log.lock().unwrap().clone());
//! });
//! assert_eq!(orders, ["ab", "ba"]);
//! ```

use crate::lab::decisions::Decisions;
use crate::util::DetRng;

/// Always resumes the live task with the lowest spawn index.
pub fn first() -> impl FnMut(usize) -> usize {
    |_| 0
}

/// Always resumes the live task with the highest spawn index.
pub fn last() -> impl FnMut(usize) -> usize {
    |n| n - 1
}

/// Cycles through ordinals, wrapping at the current live count.
pub fn round_robin() -> impl FnMut(usize) -> usize {
    let mut turn = 0usize;
    move |n| {
        let pick = turn % n;
        turn = turn.wrapping_add(1);
        pick
    }
}

/// Uniform pseudo-random picks; the same seed reproduces the same schedule.
pub fn seeded(seed: u64) -> impl FnMut(usize) -> usize {
    let mut rng = DetRng::new(seed);
    move |n| rng.next_index(n)
}

/// Delegates every pick to [`Decisions::choose`].
pub fn scripted(decisions: &mut Decisions) -> impl FnMut(usize) -> usize + '_ {
    move |n| decisions.choose(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policies() {
        assert_eq!(first()(5), 0);
        assert_eq!(last()(5), 4);
    }

    #[test]
    fn round_robin_wraps() {
        let mut rr = round_robin();
        let picks: Vec<usize> = (0..5).map(|_| rr(3)).collect();
        assert_eq!(picks, [0, 1, 2, 0, 1]);
        assert_eq!(rr(1), 0);
    }

    #[test]
    fn seeded_is_reproducible_and_in_range() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for n in 1..50 {
            let pick = a(n);
            assert!(pick < n);
            assert_eq!(pick, b(n));
        }
    }

    #[test]
    fn scripted_consumes_decisions() {
        let mut decisions = Decisions::new();
        {
            let mut choose = scripted(&mut decisions);
            assert_eq!(choose(4), 0);
            assert_eq!(choose(1), 0);
        }
        assert_eq!(decisions.cursor(), 2);
    }
}
