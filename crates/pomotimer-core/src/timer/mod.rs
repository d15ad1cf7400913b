mod controller;
mod engine;
mod mode;

pub use controller::TimerController;
pub use engine::{format_clock, TimerEngine, TimerState};
pub use mode::Mode;
