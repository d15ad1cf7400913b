use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, TimerState};

/// Every state change in the timer produces an Event.
/// The terminal front end renders from them; the simulate command prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// One second elapsed without reaching the boundary.
    Ticked {
        mode: Mode,
        minutes: u32,
        seconds: u32,
        at: DateTime<Utc>,
    },
    /// The clock hit 00:00 while running; the timer stopped in the next mode.
    ModeSwitched {
        from: Mode,
        to: Mode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        display: String,
        primary_label: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::Ticked { at, .. }
            | Event::ModeSwitched { at, .. }
            | Event::TimerReset { at }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
