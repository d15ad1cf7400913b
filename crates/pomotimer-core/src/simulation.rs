//! Deterministic replay of user intents and ticks.
//!
//! A script is a whitespace- or comma-separated list of steps:
//!
//! - `toggle` (alias `t`): press Start/Pause
//! - `reset` (alias `r`): press Reset
//! - `tick` or `tick*N`: deliver one or `N` ticks to the live session
//!
//! Scripts run on a [`ManualScheduler`], so ticks only land while a session is
//! live, exactly as they would from a real clock.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::scheduler::ManualScheduler;
use crate::timer::{TimerController, TimerState};

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Toggle,
    Reset,
    Tick(u32),
}

impl FromStr for Step {
    type Err = CoreError;

    fn from_str(token: &str) -> Result<Self> {
        let bad = |message: &str| CoreError::Script {
            token: token.to_string(),
            message: message.to_string(),
        };

        match token.to_ascii_lowercase().as_str() {
            "toggle" | "t" | "start" | "pause" => Ok(Step::Toggle),
            "reset" | "r" => Ok(Step::Reset),
            "tick" => Ok(Step::Tick(1)),
            other => {
                let count = other
                    .strip_prefix("tick*")
                    .ok_or_else(|| bad("expected toggle, reset, tick or tick*N"))?;
                count
                    .parse::<u32>()
                    .map(Step::Tick)
                    .map_err(|_| bad("tick repeat count must be a non-negative integer"))
            }
        }
    }
}

/// Parsed script ready to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl FromStr for Script {
    type Err = CoreError;

    fn from_str(source: &str) -> Result<Self> {
        let steps = source
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Step>>>()?;
        Ok(Self { steps })
    }
}

/// Outcome of a scripted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub events: Vec<Event>,
    pub final_state: TimerState,
    /// Ticks that arrived while no session was live.
    pub dropped_ticks: u64,
}

impl Script {
    /// Run from the initial stopped work session.
    pub fn run(&self) -> SimulationResult {
        self.run_on(TimerController::new(ManualScheduler::new()))
    }

    /// Run on an existing controller.
    pub fn run_on(&self, mut controller: TimerController<ManualScheduler>) -> SimulationResult {
        let mut events = Vec::new();
        let mut dropped_ticks: u64 = 0;

        for step in &self.steps {
            match *step {
                Step::Toggle => events.push(controller.toggle()),
                Step::Reset => events.push(controller.reset()),
                Step::Tick(count) => {
                    let before = events.len();
                    events.extend(controller.advance(count));
                    let delivered = (events.len() - before) as u64;
                    dropped_ticks =
                        dropped_ticks.saturating_add(u64::from(count).saturating_sub(delivered));
                }
            }
        }

        SimulationResult {
            events,
            final_state: controller.state(),
            dropped_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Mode;

    #[test]
    fn parses_tokens_and_repeats() {
        let script: Script = "toggle tick*3, pause reset tick".parse().unwrap();
        assert_eq!(
            script.steps,
            vec![
                Step::Toggle,
                Step::Tick(3),
                Step::Toggle,
                Step::Reset,
                Step::Tick(1)
            ]
        );
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(matches!(
            "toggle jump".parse::<Script>(),
            Err(CoreError::Script { token, .. }) if token == "jump"
        ));
        assert!("tick*-1".parse::<Script>().is_err());
        assert!("tick*".parse::<Script>().is_err());
    }

    #[test]
    fn empty_script_keeps_initial_state() {
        let result = Script::default().run();
        assert!(result.events.is_empty());
        assert_eq!(result.final_state, TimerState::initial());
    }

    #[test]
    fn full_work_session_ends_in_stopped_break() {
        let script: Script = "toggle tick*1501".parse().unwrap();
        let result = script.run();
        assert_eq!(result.final_state, TimerState::fresh(Mode::Break));
        assert_eq!(result.dropped_ticks, 0);
        assert!(matches!(
            result.events.last(),
            Some(Event::ModeSwitched { to: Mode::Break, .. })
        ));
    }

    #[test]
    fn ticks_after_boundary_are_dropped() {
        let script: Script = "toggle tick*1510".parse().unwrap();
        let result = script.run();
        assert_eq!(result.final_state, TimerState::fresh(Mode::Break));
        assert_eq!(result.dropped_ticks, 9);
    }

    #[test]
    fn ticks_while_paused_are_dropped() {
        let script: Script = "toggle tick*5 pause tick*60".parse().unwrap();
        let result = script.run();
        assert_eq!(result.final_state.display(), "24:55");
        assert!(!result.final_state.is_running);
        assert_eq!(result.dropped_ticks, 60);
    }

    #[test]
    fn dropped_ticks_accumulate_past_u32() {
        let script: Script = "tick*4294967295 tick*1 tick*4294967295".parse().unwrap();
        let result = script.run();
        assert_eq!(result.dropped_ticks, 2 * u64::from(u32::MAX) + 1);
        assert_eq!(result.final_state, TimerState::initial());
    }
}
