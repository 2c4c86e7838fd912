//! State management module
//!
//! This module contains the session timer, its settings and state, and the
//! application state that hosts a single timer instance.

pub mod app_state;
pub mod session_timer;
pub mod session_type;
pub mod settings;
pub mod ticker;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, HostTimer, SessionCompleted};
pub use session_timer::{Completion, CompletionListener, SessionTimer};
pub use session_type::SessionType;
pub use settings::Settings;
pub use ticker::{ChannelTicker, ManualTicker, Ticker};
pub use timer_state::{format_time, TimerSnapshot, TimerState};
