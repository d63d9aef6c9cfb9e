//! Cooperative scheduler that decides which task runs next.
//!
//! Every task spawned through a [`CoopScheduler`] runs on its own thread but
//! only makes progress when the driver ([`CoopScheduler::run`]) resumes it.
//! Tasks hand control back by calling [`CoopScheduler::yield_now`] or by
//! finishing. The driver waits for a quiescent point (every live task parked),
//! asks a `choose(n)` policy for an ordinal, and resumes the task at that
//! position in spawn order. Exactly one task runs between two decisions, so a
//! policy that enumerates its answers enumerates interleavings.
//!
//! # Task lifecycle
//!
//! ```text
//! spawn ─► Registered (parked) ─► Running ⇄ Parked ─► Finished
//! ```
//!
//! # Invariants
//!
//! - `live` equals the number of spawned, unfinished tasks (under the lock).
//! - `waiters` only holds live tasks that parked themselves.
//! - Every change to `live` or `waiters` notifies the driver.
//! - Ordinals index live tasks by ascending spawn index.
//!
//! A task that neither yields nor finishes stalls the driver forever; there is
//! no timeout.

use crate::lab::identity::{TaskIdentity, ThreadIdentity};
use crate::lab::signal::WakeSignal;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Outcome of a completed [`CoopScheduler::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Number of resume decisions the driver made.
    pub decisions: u64,
    /// Tasks spawned over the scheduler's lifetime.
    pub spawned: usize,
}

#[derive(Default)]
struct State {
    /// Spawned, unfinished tasks.
    live: usize,
    next_spawn_index: usize,
    spawn_index: HashMap<u64, usize>,
    /// Live task ids by ascending spawn index; `None` when stale.
    order: Option<Vec<u64>>,
    waiters: HashMap<u64, WakeSignal>,
    handles: Vec<JoinHandle<()>>,
}

impl State {
    fn order(&mut self) -> &[u64] {
        let spawn_index = &self.spawn_index;
        self.order.get_or_insert_with(|| {
            let mut by_index: Vec<(usize, u64)> =
                spawn_index.iter().map(|(&id, &idx)| (idx, id)).collect();
            by_index.sort_unstable();
            by_index.into_iter().map(|(_, id)| id).collect()
        })
    }
}

struct Shared<I> {
    identity: I,
    state: Mutex<State>,
    /// Signalled whenever `live` or `waiters` changes.
    changed: Condvar,
}

impl<I: TaskIdentity> Shared<I> {
    fn register(&self, task_id: u64, spawn_index: usize) {
        let mut state = self.state.lock();
        state.spawn_index.insert(task_id, spawn_index);
        state.order = None;
        drop(state);
        tracing::trace!(task_id, spawn_index, "task registered");
    }

    fn park(&self, task_id: u64) {
        let signal = WakeSignal::new();
        {
            let mut state = self.state.lock();
            state.waiters.insert(task_id, signal.clone());
            self.changed.notify_all();
        }
        tracing::trace!(task_id, "task parked");
        signal.wait();
        tracing::trace!(task_id, "task resumed");
    }

    fn finish(&self, task_id: u64) {
        let mut state = self.state.lock();
        state.live -= 1;
        let spawn_index = state.spawn_index.remove(&task_id);
        state.waiters.remove(&task_id);
        state.order = None;
        let live = state.live;
        self.changed.notify_all();
        drop(state);
        tracing::debug!(task_id, ?spawn_index, live, "task finished");
    }
}

/// Runs the completion bookkeeping even when the task body unwinds.
struct FinishGuard<'a, I: TaskIdentity> {
    shared: &'a Shared<I>,
    task_id: u64,
}

impl<I: TaskIdentity> Drop for FinishGuard<'_, I> {
    fn drop(&mut self) {
        self.shared.finish(self.task_id);
    }
}

/// Cooperative scheduler handle.
///
/// Cloning is cheap; clones share the same task pool. Task closures capture
/// a clone to call [`yield_now`](Self::yield_now) or spawn further tasks.
///
/// # Example
///
/// ```
/// use detlab::lab::CoopScheduler;
/// use std::sync::{Arc, Mutex};
///
/// let sched = CoopScheduler::new();
/// let log = Arc::new(Mutex::new(Vec::new()));
/// for name in ["a", "b"] {
///     let (s, log) = (sched.clone(), Arc::clone(&log));
///     sched.spawn(move || {
///         log.lock().unwrap().push(format!("{name}1"));
///         s.yield_now();
///         log.lock().unwrap().push(format!("{name}2"));
///     });
/// }
/// // Always resume the most recently spawned live task.
/// sched.run(|n| n - 1);
/// assert_eq!(*log.lock().unwrap(), ["b1", "b2", "a1", "a2"]);
/// ```
pub struct CoopScheduler<I: TaskIdentity = ThreadIdentity> {
    shared: Arc<Shared<I>>,
}

impl CoopScheduler<ThreadIdentity> {
    /// Creates an empty scheduler keyed by thread identity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_identity(ThreadIdentity)
    }
}

impl Default for CoopScheduler<ThreadIdentity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: TaskIdentity> Clone for CoopScheduler<I> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I: TaskIdentity> fmt::Debug for CoopScheduler<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("CoopScheduler")
            .field("live", &state.live)
            .field("parked", &state.waiters.len())
            .field("next_spawn_index", &state.next_spawn_index)
            .finish()
    }
}

impl<I: TaskIdentity> CoopScheduler<I> {
    /// Creates an empty scheduler that looks up task ids through `identity`.
    #[must_use]
    pub fn with_identity(identity: I) -> Self {
        Self {
            shared: Arc::new(Shared {
                identity,
                state: Mutex::new(State::default()),
                changed: Condvar::new(),
            }),
        }
    }

    /// Starts `f` as a new task.
    ///
    /// The task is counted live immediately, then parks on its own thread
    /// before running any of `f`; the driver decides when it first runs.
    /// Returns without waiting for the task thread to start.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the task thread.
    pub fn spawn<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let spawn_index = {
            let mut state = self.shared.state.lock();
            let spawn_index = state.next_spawn_index;
            state.next_spawn_index += 1;
            state.live += 1;
            self.shared.changed.notify_all();
            spawn_index
        };
        tracing::debug!(spawn_index, "spawning task");

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name(format!("detlab-task-{spawn_index}"))
            .spawn(move || {
                let task_id = shared.identity.current_task_id();
                shared.register(task_id, spawn_index);
                let _finish = FinishGuard {
                    shared: shared.as_ref(),
                    task_id,
                };
                shared.park(task_id);
                f();
            });

        match spawned {
            Ok(handle) => self.shared.state.lock().handles.push(handle),
            Err(err) => {
                let mut state = self.shared.state.lock();
                state.live -= 1;
                self.shared.changed.notify_all();
                drop(state);
                panic!("failed to start task thread {spawn_index}: {err}");
            }
        }
    }

    /// Parks the calling task until the driver resumes it.
    ///
    /// Must be called from a task spawned on this scheduler.
    pub fn yield_now(&self) {
        let task_id = self.shared.identity.current_task_id();
        self.shared.park(task_id);
    }

    /// Number of spawned, unfinished tasks.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.shared.state.lock().live
    }

    /// Number of tasks currently parked.
    #[must_use]
    pub fn parked_count(&self) -> usize {
        self.shared.state.lock().waiters.len()
    }

    /// Blocks until every live task is parked; returns the live count.
    pub fn wait_quiescent(&self) -> usize {
        let mut state = self.shared.state.lock();
        while state.live != state.waiters.len() {
            self.shared.changed.wait(&mut state);
        }
        state.live
    }

    /// Resumes the live task at ordinal `index` in spawn order.
    ///
    /// Only meaningful at a quiescent point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the live count, or if the selected task
    /// is not parked.
    pub fn wake(&self, index: usize) {
        let mut state = self.shared.state.lock();
        let live = state.live;
        let Some(&task_id) = state.order().get(index) else {
            panic!("choose returned {index} but only {live} tasks are live");
        };
        let Some(signal) = state.waiters.remove(&task_id) else {
            panic!("task {task_id} at ordinal {index} is not parked");
        };
        self.shared.changed.notify_all();
        drop(state);
        tracing::trace!(task_id, index, live, "waking task");
        signal.fire();
    }

    /// Drives tasks until all of them have finished.
    ///
    /// At each quiescent point `choose(n)` receives the live task count and
    /// must return an ordinal in `[0, n)`. Once no task is left the task
    /// threads are joined; if any task panicked, the first panic is resumed on
    /// the calling thread.
    pub fn run<C>(&self, mut choose: C) -> RunSummary
    where
        C: FnMut(usize) -> usize,
    {
        let mut decisions = 0u64;
        loop {
            let live = self.wait_quiescent();
            if live == 0 {
                break;
            }
            let index = choose(live);
            self.wake(index);
            decisions += 1;
        }

        let (handles, spawned) = {
            let mut state = self.shared.state.lock();
            (std::mem::take(&mut state.handles), state.next_spawn_index)
        };
        tracing::debug!(decisions, spawned, "scheduler drained");

        let mut first_panic = None;
        for handle in handles {
            if let Err(payload) = handle.join() {
                first_panic.get_or_insert(payload);
            }
        }
        if let Some(payload) = first_panic {
            std::panic::resume_unwind(payload);
        }

        RunSummary { decisions, spawned }
    }

    /// Spawns `main` as the next task and drives the pool to completion.
    ///
    /// On a fresh scheduler `main` gets spawn index 0, so it is ordinal 0
    /// until it finishes; it takes part in the park/resume protocol like any
    /// other task.
    pub fn run_main<F, C>(&self, main: F, choose: C) -> RunSummary
    where
        F: FnOnce() + Send + 'static,
        C: FnMut(usize) -> usize,
    {
        self.spawn(main);
        self.run(choose)
    }
}
