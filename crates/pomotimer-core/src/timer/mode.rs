use serde::{Deserialize, Serialize};

/// Which half of the work/break cycle the timer is counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    /// Full duration of a session in this mode, in minutes.
    pub const fn duration_min(self) -> u32 {
        match self {
            Mode::Work => 25,
            Mode::Break => 5,
        }
    }

    /// Full duration of a session in this mode, in seconds.
    pub const fn duration_secs(self) -> u32 {
        self.duration_min() * 60
    }

    /// The mode entered when a session of this mode runs out.
    pub const fn next(self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::Break => "Break",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
