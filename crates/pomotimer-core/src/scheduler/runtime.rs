use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::{Scheduler, TickHandle};
use crate::error::{CoreError, Result};

/// Scheduler backed by the tokio timer.
///
/// Every session gets its own task that sends its [`TickHandle`] down a
/// channel once per period. A single consumer drains the receiver, so ticks
/// are handled strictly one at a time. Cancelling aborts the task; a tick that
/// was already queued still arrives, carrying its stale handle.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    tx: mpsc::UnboundedSender<TickHandle>,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Create a scheduler bound to the current tokio runtime, together with
    /// the receiving end of its tick channel.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoRuntime`] when called outside a tokio runtime.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<TickHandle>)> {
        let runtime = Handle::try_current().map_err(|e| CoreError::NoRuntime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                runtime,
                tx,
                tasks: HashMap::new(),
                next_id: 0,
            },
            rx,
        ))
    }

    /// Number of sessions whose tick task is still alive.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let tx = self.tx.clone();

        let task = self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        debug!(%handle, ?period, "tick scheduled");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!(%handle, "tick cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TICK_PERIOD;

    #[test]
    fn new_outside_runtime_fails() {
        assert!(matches!(TokioScheduler::new(), Err(CoreError::NoRuntime(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let (mut scheduler, mut rx) = TokioScheduler::new().unwrap();
        let start = Instant::now();
        let handle = scheduler.schedule_every(TICK_PERIOD);

        for expected in 1..=3u64 {
            assert_eq!(rx.recv().await, Some(handle));
            assert_eq!(start.elapsed(), Duration::from_secs(expected));
        }
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_session_stops_firing() {
        let (mut scheduler, mut rx) = TokioScheduler::new().unwrap();
        let handle = scheduler.schedule_every(TICK_PERIOD);
        assert_eq!(rx.recv().await, Some(handle));

        scheduler.cancel(handle);
        assert_eq!(scheduler.active_count(), 0);

        let late = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(late.is_err(), "tick delivered after cancel: {late:?}");
    }
}
