//! Validated timer settings

use serde::Serialize;

use super::SessionType;
use crate::error::ConfigError;

const SECONDS_PER_MINUTE: u32 = 60;

/// Immutable session lengths and long break cadence.
///
/// Only obtainable through [`Settings::new`] (or the constructors built on
/// it), so every duration and the interval are guaranteed non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    focus_seconds: u32,
    short_break_seconds: u32,
    long_break_seconds: u32,
    long_break_interval: u32,
}

impl Settings {
    /// Build settings from durations in seconds
    pub fn new(
        focus_seconds: u32,
        short_break_seconds: u32,
        long_break_seconds: u32,
        long_break_interval: u32,
    ) -> Result<Self, ConfigError> {
        let checks = [
            (SessionType::Focus, focus_seconds),
            (SessionType::ShortBreak, short_break_seconds),
            (SessionType::LongBreak, long_break_seconds),
        ];
        if let Some((session, _)) = checks.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::ZeroDuration { session: *session });
        }
        if long_break_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(Self {
            focus_seconds,
            short_break_seconds,
            long_break_seconds,
            long_break_interval,
        })
    }

    /// Build settings from durations in minutes
    pub fn from_minutes(
        focus: u32,
        short_break: u32,
        long_break: u32,
        long_break_interval: u32,
    ) -> Result<Self, ConfigError> {
        Self::new(
            focus.saturating_mul(SECONDS_PER_MINUTE),
            short_break.saturating_mul(SECONDS_PER_MINUTE),
            long_break.saturating_mul(SECONDS_PER_MINUTE),
            long_break_interval,
        )
    }

    /// Length in seconds of the given session type
    pub fn duration(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Focus => self.focus_seconds,
            SessionType::ShortBreak => self.short_break_seconds,
            SessionType::LongBreak => self.long_break_seconds,
        }
    }

    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }
}

impl Default for Settings {
    /// 25 minute focus, 5 minute short break, 15 minute long break every 4th
    fn default() -> Self {
        Self {
            focus_seconds: 25 * SECONDS_PER_MINUTE,
            short_break_seconds: 5 * SECONDS_PER_MINUTE,
            long_break_seconds: 15 * SECONDS_PER_MINUTE,
            long_break_interval: 4,
        }
    }
}
