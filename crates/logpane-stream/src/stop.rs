//! Stop signaling for reader threads.
//!
//! A condvar-backed flag pair: the owner keeps the [`StopTrigger`], the
//! reader thread holds the [`StopSignal`]. Sources that pace themselves
//! block on [`StopSignal::wait_timeout`] instead of sleeping so that a
//! close request wakes them immediately.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Reader-side view of the stop flag.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a fresh (signal, trigger) pair.
    #[must_use]
    pub fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            StopTrigger { inner },
        )
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().expect("stop flag poisoned")
    }

    /// Block until stopped or until `duration` elapses.
    ///
    /// Returns `true` when stopped, `false` on timeout. Loops around
    /// spurious condvar wakeups.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().expect("stop flag poisoned");
        if *stopped {
            return true;
        }

        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .expect("stop flag poisoned");
            stopped = guard;
            if *stopped {
                return true;
            }
        }
    }
}

/// Owner-side trigger. Firing it is idempotent.
pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    /// Request a stop and wake any waiting reader.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().expect("stop flag poisoned") = true;
        cvar.notify_all();
    }
}
