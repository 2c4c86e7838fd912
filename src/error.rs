//! Error types for the session timer

use thiserror::Error;

use crate::state::SessionType;

/// Rejected settings, detected before a timer is ever constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A session was configured with no length at all
    #[error("{session} duration must be greater than zero")]
    ZeroDuration { session: SessionType },

    /// The long break would never (or always) come around
    #[error("long break interval must be greater than zero")]
    ZeroInterval,
}

/// Errors surfaced by the session timer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal state broke one of its invariants. This is a bug, not a
    /// recoverable condition.
    #[error("Timer invariant violated: {0}")]
    InvariantViolation(String),
}
