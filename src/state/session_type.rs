//! Session type and its user-facing wording

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The three kinds of timed interval the timer alternates between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    /// Stable wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::ShortBreak => "short-break",
            SessionType::LongBreak => "long-break",
        }
    }

    /// Short heading shown while the session is current
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Focus => "Focus Time",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SessionType::Focus => "Time to concentrate and be productive!",
            SessionType::ShortBreak => "Take a quick breather and relax.",
            SessionType::LongBreak => "Enjoy a longer break. You've earned it!",
        }
    }

    /// Message delivered when a session of this type finishes on its own
    pub fn completion_message(&self) -> &'static str {
        match self {
            SessionType::Focus => "Great job! You completed a focus session. Time for a break!",
            SessionType::ShortBreak => "Break time's over! Ready to focus again?",
            SessionType::LongBreak => "Long break complete! You're doing amazing!",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Focus)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(SessionType::Focus),
            "short-break" => Ok(SessionType::ShortBreak),
            "long-break" => Ok(SessionType::LongBreak),
            other => Err(format!("Unknown session type: {}", other)),
        }
    }
}
