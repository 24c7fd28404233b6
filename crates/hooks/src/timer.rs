//! One-shot timers on the current `LocalSet`.
//!
//! Scheduling never runs the callback inline, even for a zero delay: the
//! callback always runs from its own local task once the scheduler gets to it.

use std::{cell::Cell, rc::Rc, time::Duration};

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Rc<Cell<bool>>,
    fired: Rc<Cell<bool>>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancels the timer. Once this returns the callback will not run.
    /// Cancelling a fired or already cancelled timer does nothing.
    pub fn cancel(&self) {
        if self.cancelled.replace(true) || self.fired.get() {
            return;
        }
        self.task.abort();
    }

    pub fn is_pending(&self) -> bool {
        !self.cancelled.get() && !self.fired.get()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

/// Runs `callback` after `delay`.
///
/// Must be called from within a `tokio::task::LocalSet`.
pub fn schedule(delay: Duration, callback: impl FnOnce() + 'static) -> TimerHandle {
    let cancelled = Rc::new(Cell::new(false));
    let fired = Rc::new(Cell::new(false));

    let task = tokio::task::spawn_local({
        let cancelled = Rc::clone(&cancelled);
        let fired = Rc::clone(&fired);
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // Abort only takes effect at the next await point.
            if cancelled.get() {
                return;
            }
            fired.set(true);
            callback();
        }
    });

    TimerHandle {
        cancelled,
        fired,
        task,
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
