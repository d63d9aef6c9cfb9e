//! Identity of the currently executing task.
//!
//! The scheduler keys its bookkeeping by an opaque `u64` obtained from a
//! [`TaskIdentity`]. The default [`ThreadIdentity`] gives every OS thread a
//! process-unique nonzero id on first use; tests of the scheduler itself can
//! substitute their own mapping.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the `current_task_id()` capability.
///
/// Ids must be unique among live tasks and stable for the lifetime of one
/// task. The scheduler makes no other assumption about their values.
pub trait TaskIdentity: Send + Sync + 'static {
    /// Id of the task calling this method.
    fn current_task_id(&self) -> u64;
}

static NEXT_THREAD_TASK_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TASK_ID: Cell<u64> = const { Cell::new(0) };
}

/// Identity backed by a thread-local id slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadIdentity;

impl TaskIdentity for ThreadIdentity {
    fn current_task_id(&self) -> u64 {
        current_thread_task_id()
    }
}

/// Thread-local task id, allocated on first call from each thread.
#[must_use]
pub fn current_thread_task_id() -> u64 {
    THREAD_TASK_ID.with(|slot| {
        let id = slot.get();
        if id != 0 {
            return id;
        }
        let id = NEXT_THREAD_TASK_ID.fetch_add(1, Ordering::Relaxed);
        slot.set(id);
        id
    })
}
