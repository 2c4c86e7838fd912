//! Pomodoro Server - a Pomodoro session timer served over a local HTTP API
//!
//! This library provides the session timer state machine (focus, short
//! break and long break sessions with automatic progression), the host
//! state owning one timer, the background tasks that tick it and deliver
//! completion notifications, and the HTTP surface controlling it.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, TimerError};
pub use state::{AppState, SessionTimer, SessionType, Settings};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
