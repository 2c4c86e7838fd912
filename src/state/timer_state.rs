//! Timer state record and its observable snapshot

use serde::{Deserialize, Serialize};

use super::{SessionType, Settings};

/// Mutable timing state of one session timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub running: bool,
    pub current_session: SessionType,
    /// Completed (or skipped) focus sessions, drives the long break cadence
    pub completed_focus_sessions: u32,
    /// Completed (or skipped) long breaks
    pub completed_cycles: u32,
    /// Sessions that ran down to zero on their own
    pub total_completed_sessions: u32,
}

impl TimerState {
    /// Create a paused state at the start of a full focus session
    pub fn new(settings: &Settings) -> Self {
        Self {
            remaining_seconds: settings.duration(SessionType::Focus),
            running: false,
            current_session: SessionType::Focus,
            completed_focus_sessions: 0,
            completed_cycles: 0,
            total_completed_sessions: 0,
        }
    }
}

/// Point-in-time view of the timer handed to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining_seconds: u32,
    pub running: bool,
    pub current_session: SessionType,
    pub label: String,
    pub description: String,
    pub formatted_time: String,
    pub progress_percent: f64,
    pub session_count: u32,
    pub cycle_count: u32,
    pub total_sessions: u32,
}

/// Render seconds as zero-padded `MM:SS`; minutes grow past two digits
/// when needed.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
