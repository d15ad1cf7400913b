//! Terminal presentation of the timer and parsing of typed commands.

use pomotimer_core::storage::{KeysConfig, UiConfig};
use pomotimer_core::TimerEngine;

/// What a line typed by the user asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Toggle,
    Reset,
    Quit,
}

impl Intent {
    /// Map one input line to an intent. An empty line presses Start/Pause.
    ///
    /// Bindings are checked for collisions when the config is loaded or set,
    /// so at most one intent matches any word.
    pub fn parse(line: &str, keys: &KeysConfig) -> Option<Intent> {
        let word = line.trim().to_ascii_lowercase();
        let bound = |key: &str, builtin: &[&str]| {
            word == key.trim().to_ascii_lowercase() || builtin.iter().any(|w| *w == word)
        };

        if word.is_empty() || bound(&keys.toggle, KeysConfig::TOGGLE_WORDS) {
            Some(Intent::Toggle)
        } else if bound(&keys.reset, KeysConfig::RESET_WORDS) {
            Some(Intent::Reset)
        } else if bound(&keys.quit, KeysConfig::QUIT_WORDS) {
            Some(Intent::Quit)
        } else {
            None
        }
    }
}

/// One-line rendering, e.g. `WORK  24:59  [Pause] [Reset]`.
pub fn render_line(engine: &TimerEngine, ui: &UiConfig) -> String {
    let mut parts = Vec::with_capacity(3);
    if ui.show_mode {
        parts.push(engine.mode().label().to_uppercase());
    }
    parts.push(engine.display());
    if ui.show_controls {
        parts.push(format!(
            "[{}] [{}]",
            engine.primary_label(),
            engine.secondary_label()
        ));
    }
    parts.join("  ")
}

/// Help line listing the configured keys.
pub fn usage(keys: &KeysConfig) -> String {
    format!(
        "{} or enter: start/pause   {}: reset   {}: quit",
        keys.toggle, keys.reset, keys.quit
    )
}
