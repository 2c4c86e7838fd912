//! Configuration and CLI argument handling

use clap::Parser;

use crate::{error::ConfigError, state::Settings};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-server")]
#[command(about = "A Pomodoro session timer served over a local HTTP API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus session length in minutes
    #[arg(long, default_value = "25")]
    pub focus: u32,

    /// Short break length in minutes
    #[arg(long, default_value = "5")]
    pub short_break: u32,

    /// Long break length in minutes
    #[arg(long, default_value = "15")]
    pub long_break: u32,

    /// Number of focus sessions before a long break
    #[arg(long, default_value = "4")]
    pub long_break_interval: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validated timer settings
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::from_minutes(self.focus, self.short_break, self.long_break, self.long_break_interval)
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
