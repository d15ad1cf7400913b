//! Timer engine implementation.
//!
//! The timer engine is a pure countdown state machine. It owns no clock and
//! no threads - whoever drives it calls `tick()` once per elapsed second while
//! it is running (see [`crate::timer::TimerController`]).
//!
//! ## State Transitions
//!
//! ```text
//! (Work, 25:00, stopped) --toggle--> running --tick*--> 00:00 --tick--> (Break, 05:00, stopped)
//! (Break, 05:00, stopped) --toggle--> running --tick*--> 00:00 --tick--> (Work, 25:00, stopped)
//! any --reset--> (Work, 25:00, stopped)
//! ```
//!
//! ## Usage
//!
//! ```
//! use pomotimer_core::TimerEngine;
//!
//! let mut engine = TimerEngine::new();
//! engine.toggle();
//! engine.tick();
//! assert_eq!(engine.display(), "24:59");
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mode::Mode;
use crate::events::Event;

/// Zero-pad minutes and seconds into an `MM:SS` clock face.
pub fn format_clock(minutes: u32, seconds: u32) -> String {
    format!("{minutes:02}:{seconds:02}")
}

/// The complete countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub minutes: u32,
    /// Always in `0..=59`.
    pub seconds: u32,
    pub is_running: bool,
    pub mode: Mode,
}

impl TimerState {
    /// A stopped, full-length session in `mode`.
    pub const fn fresh(mode: Mode) -> Self {
        Self {
            minutes: mode.duration_min(),
            seconds: 0,
            is_running: false,
            mode,
        }
    }

    /// Stopped work session at 25:00.
    pub const fn initial() -> Self {
        Self::fresh(Mode::Work)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn display(&self) -> String {
        format_clock(self.minutes, self.seconds)
    }

    /// Carry whole minutes out of `seconds` so it stays within `0..=59`.
    fn normalized(mut self) -> Self {
        self.minutes = self.minutes.saturating_add(self.seconds / 60);
        self.seconds %= 60;
        self
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Core timer engine.
///
/// Mutated only through [`toggle`](Self::toggle), [`tick`](Self::tick) and
/// [`reset`](Self::reset). None of them can fail.
///
/// Serializes as its [`TimerState`]; deserializing goes through
/// [`with_state`](Self::with_state), so seconds are carried into minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TimerState", into = "TimerState")]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an arbitrary state. Seconds past 59 are carried into minutes.
    pub fn with_state(state: TimerState) -> Self {
        Self {
            state: state.normalized(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs()
    }

    pub fn display(&self) -> String {
        self.state.display()
    }

    /// Label of the start/pause control.
    pub fn primary_label(&self) -> &'static str {
        if self.state.is_running {
            "Pause"
        } else {
            "Start"
        }
    }

    /// Label of the reset control.
    pub fn secondary_label(&self) -> &'static str {
        "Reset"
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            display: self.display(),
            primary_label: self.primary_label().to_string(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and stopped.
    pub fn toggle(&mut self) -> Event {
        self.state.is_running = !self.state.is_running;
        let remaining_secs = self.remaining_secs();
        if self.state.is_running {
            info!(mode = %self.state.mode, clock = %self.display(), "timer started");
            Event::TimerStarted {
                mode: self.state.mode,
                remaining_secs,
                at: Utc::now(),
            }
        } else {
            info!(mode = %self.state.mode, clock = %self.display(), "timer paused");
            Event::TimerPaused {
                mode: self.state.mode,
                remaining_secs,
                at: Utc::now(),
            }
        }
    }

    /// Advance the clock by one second.
    ///
    /// Returns `None` while stopped. At 00:00 the engine switches mode,
    /// refills the clock and stops itself instead of going negative.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }

        let state = &mut self.state;
        if state.seconds > 0 {
            state.seconds -= 1;
        } else if state.minutes > 0 {
            state.minutes -= 1;
            state.seconds = 59;
        } else {
            return Some(self.switch_mode());
        }

        debug!(clock = %self.display(), "tick");
        Some(Event::Ticked {
            mode: self.state.mode,
            minutes: self.state.minutes,
            seconds: self.state.seconds,
            at: Utc::now(),
        })
    }

    /// Back to a stopped 25:00 work session, whatever the current state.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::initial();
        info!("timer reset");
        Event::TimerReset { at: Utc::now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_mode(&mut self) -> Event {
        let from = self.state.mode;
        self.state = TimerState::fresh(from.next());
        info!(%from, to = %self.state.mode, "session finished, switching mode");
        Event::ModeSwitched {
            from,
            to: self.state.mode,
            duration_secs: self.state.mode.duration_secs(),
            at: Utc::now(),
        }
    }
}

impl From<TimerState> for TimerEngine {
    fn from(state: TimerState) -> Self {
        Self::with_state(state)
    }
}

impl From<TimerEngine> for TimerState {
    fn from(engine: TimerEngine) -> Self {
        engine.state
    }
}
