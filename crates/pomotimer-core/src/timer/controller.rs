//! Couples a [`TimerEngine`] with a [`Scheduler`].
//!
//! The controller is the only writer of the engine. It keeps exactly one tick
//! session alive while the engine runs and none while it is stopped:
//!
//! - toggle to running: cancel any old session, then schedule a new one
//! - toggle to stopped, reset, mode switch, drop: cancel the session
//!
//! Ticks are accepted only when they carry the current session's handle, so a
//! tick that was already in flight when the user paused can never move the
//! clock.

use tracing::debug;

use super::engine::{TimerEngine, TimerState};
use crate::events::Event;
use crate::scheduler::{ManualScheduler, Scheduler, TickHandle, TICK_PERIOD};

#[derive(Debug)]
pub struct TimerController<S: Scheduler> {
    engine: TimerEngine,
    scheduler: S,
    session: Option<TickHandle>,
}

impl<S: Scheduler> TimerController<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_engine(TimerEngine::new(), scheduler)
    }

    /// Take over an existing engine. A running engine gets a tick session
    /// straight away.
    pub fn with_engine(engine: TimerEngine, scheduler: S) -> Self {
        let mut controller = Self {
            engine,
            scheduler,
            session: None,
        };
        controller.sync_session();
        controller
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Handle of the live tick session, if the timer is running.
    pub fn session(&self) -> Option<TickHandle> {
        self.session
    }

    pub fn toggle(&mut self) -> Event {
        let event = self.engine.toggle();
        self.sync_session();
        event
    }

    /// Apply a tick delivered by the scheduler.
    ///
    /// Returns `None` for ticks from a cancelled session.
    pub fn on_tick(&mut self, handle: TickHandle) -> Option<Event> {
        if self.session != Some(handle) {
            debug!(%handle, "dropping stale tick");
            return None;
        }
        let event = self.engine.tick();
        if !self.engine.is_running() {
            self.cancel_session();
        }
        event
    }

    pub fn reset(&mut self) -> Event {
        self.cancel_session();
        self.engine.reset()
    }

    fn sync_session(&mut self) {
        self.cancel_session();
        if self.engine.is_running() {
            self.session = Some(self.scheduler.schedule_every(TICK_PERIOD));
        }
    }

    fn cancel_session(&mut self) {
        if let Some(handle) = self.session.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl TimerController<ManualScheduler> {
    /// Deliver up to `count` ticks to the live session.
    ///
    /// Stops early once the timer is no longer running.
    pub fn advance(&mut self, count: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..count {
            let Some(handle) = self.session else {
                break;
            };
            events.extend(self.on_tick(handle));
        }
        events
    }
}

impl<S: Scheduler> Drop for TimerController<S> {
    fn drop(&mut self) {
        self.cancel_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Mode;

    fn controller() -> TimerController<ManualScheduler> {
        TimerController::new(ManualScheduler::new())
    }

    #[test]
    fn toggle_schedules_one_second_session() {
        let mut c = controller();
        assert!(c.session().is_none());

        c.toggle();
        let handle = c.session().unwrap();
        assert!(c.scheduler().is_active(handle));
        assert_eq!(c.scheduler().period_of(handle), Some(TICK_PERIOD));
    }

    #[test]
    fn pause_cancels_session() {
        let mut c = controller();
        c.toggle();
        let handle = c.session().unwrap();

        c.toggle();
        assert!(c.session().is_none());
        assert_eq!(c.scheduler().cancelled_count(), 1);
        assert_eq!(c.scheduler().last_cancelled(), Some(handle));
        assert!(c.scheduler().active_handles().is_empty());
    }

    #[test]
    fn stale_tick_after_pause_is_ignored() {
        let mut c = controller();
        c.toggle();
        let handle = c.session().unwrap();
        c.advance(3);
        c.toggle();
        let paused = c.state();

        assert!(c.on_tick(handle).is_none());
        assert_eq!(c.state(), paused);
        assert_eq!(c.engine().display(), "24:57");
    }

    #[test]
    fn restart_uses_fresh_handle() {
        let mut c = controller();
        c.toggle();
        let first = c.session().unwrap();
        c.toggle();
        c.toggle();
        let second = c.session().unwrap();

        assert_ne!(first, second);
        assert!(c.on_tick(first).is_none());
        assert!(c.on_tick(second).is_some());
        assert_eq!(c.scheduler().active_handles(), vec![second]);
    }

    #[test]
    fn boundary_tick_stops_session() {
        let engine = TimerEngine::with_state(TimerState {
            minutes: 0,
            seconds: 1,
            is_running: true,
            mode: Mode::Work,
        });
        let mut c = TimerController::with_engine(engine, ManualScheduler::new());
        let handle = c.session().unwrap();

        let events = c.advance(10);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Event::ModeSwitched { to: Mode::Break, .. }));
        assert_eq!(c.state(), TimerState::fresh(Mode::Break));
        assert!(c.session().is_none());
        assert!(!c.scheduler().is_active(handle));
    }

    #[test]
    fn reset_cancels_and_restores_initial_state() {
        let mut c = controller();
        c.toggle();
        c.advance(90);
        let handle = c.session().unwrap();

        c.reset();
        assert_eq!(c.state(), TimerState::initial());
        assert!(c.session().is_none());
        assert!(!c.scheduler().is_active(handle));
    }

    #[test]
    fn advance_while_stopped_does_nothing() {
        let mut c = controller();
        assert!(c.advance(5).is_empty());
        assert_eq!(c.state(), TimerState::initial());
    }
}
