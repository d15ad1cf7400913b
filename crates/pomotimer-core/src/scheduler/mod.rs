//! Tick scheduling capability.
//!
//! The engine never touches a clock. A [`Scheduler`] is the host service that
//! fires a recurring tick for one running session and can cancel it again.
//! Each session is identified by a [`TickHandle`]; the controller only accepts
//! ticks carrying the handle of the session that is currently running.

mod manual;
mod runtime;

use std::time::Duration;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Interval between two ticks of a running timer.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one scheduled recurring tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Host capability to run a callback every `period` and to cancel it.
pub trait Scheduler {
    /// Start a recurring tick. Every call returns a fresh handle.
    fn schedule_every(&mut self, period: Duration) -> TickHandle;

    /// Stop the recurring tick behind `handle`. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule_every(&mut self, period: Duration) -> TickHandle {
        (**self).schedule_every(period)
    }

    fn cancel(&mut self, handle: TickHandle) {
        (**self).cancel(handle)
    }
}
