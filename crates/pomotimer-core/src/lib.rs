//! # pomotimer Core Library
//!
//! Business logic for a single Pomodoro work/break countdown timer. The
//! terminal front end in `pomotimer-cli` is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine (toggle / tick / reset) with
//!   fixed 25:00 work and 05:00 break sessions
//! - **Scheduler**: the injected capability that fires a recurring
//!   one-second tick and cancels it again
//! - **Controller**: couples both and keeps exactly one tick session alive
//!   while running
//! - **Storage**: TOML-based front-end configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerController`]: Engine plus tick scheduling discipline
//! - [`Scheduler`]: Trait for tick sources ([`TokioScheduler`], [`ManualScheduler`])
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod scheduler;
pub mod simulation;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use scheduler::{ManualScheduler, Scheduler, TickHandle, TokioScheduler, TICK_PERIOD};
pub use simulation::{Script, SimulationResult, Step};
pub use storage::Config;
pub use timer::{format_clock, Mode, TimerController, TimerEngine, TimerState};
