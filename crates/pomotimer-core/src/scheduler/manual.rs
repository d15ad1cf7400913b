use std::time::Duration;

use super::{Scheduler, TickHandle};

/// In-process scheduler that never fires on its own.
///
/// Ticks are delivered by whoever owns it (tests, the `simulate` command),
/// which makes every run deterministic.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<(TickHandle, Duration)>,
    cancelled_count: u64,
    last_cancelled: Option<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently scheduled handle that is still live.
    pub fn active_handle(&self) -> Option<TickHandle> {
        self.active.last().map(|(handle, _)| *handle)
    }

    pub fn active_handles(&self) -> Vec<TickHandle> {
        self.active.iter().map(|(handle, _)| *handle).collect()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.active.iter().any(|(h, _)| *h == handle)
    }

    pub fn period_of(&self, handle: TickHandle) -> Option<Duration> {
        self.active
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, period)| *period)
    }

    /// Number of live sessions cancelled so far.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled_count
    }

    pub fn last_cancelled(&self) -> Option<TickHandle> {
        self.last_cancelled
    }

    /// Total number of sessions ever scheduled.
    pub fn scheduled_count(&self) -> u64 {
        self.next_id
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.active.push((handle, period));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.active.len();
        self.active.retain(|(h, _)| *h != handle);
        if self.active.len() != before {
            self.cancelled_count += 1;
            self.last_cancelled = Some(handle);
        }
    }
}
