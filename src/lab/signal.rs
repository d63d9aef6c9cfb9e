//! One-shot wake signal used to park a task until the driver picks it.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// A one-shot signal: once [`fire`](Self::fire) has been called, every
/// [`wait`](Self::wait) returns, whether it starts before or after the fire.
#[derive(Debug, Clone, Default)]
pub struct WakeSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl WakeSignal {
    /// Creates an unfired signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks the current thread until the signal fires.
    pub fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut fired = lock.lock();
        while !*fired {
            cvar.wait(&mut fired);
        }
    }

    /// Fires the signal.
    pub fn fire(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock() = true;
        cvar.notify_one();
    }
}
