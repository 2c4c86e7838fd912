//! Pomodoro Server - a Pomodoro session timer served over a local HTTP API
//!
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{error, info};

use pomodoro_server::{
    config::Config,
    error::TimerError,
    state::AppState,
    api::create_router,
    tasks::{notifier_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(TimerError::from(e).into());
        }
    };
    info!("Configuration: host={}, port={}, focus={}min, short_break={}min, long_break={}min, long_break_interval={}",
          config.host, config.port, config.focus, config.short_break, config.long_break, config.long_break_interval);

    // Completion events flow from the timer to the notifier
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();
    tokio::spawn(notifier_task(completion_rx));

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), settings, completion_tx));

    // Start the tick driver background task
    tokio::spawn(tick_driver_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start            - Start or resume the current session");
    info!("  POST /pause            - Pause the countdown");
    info!("  POST /reset            - Rewind the current session");
    info!("  POST /skip             - Skip to the next session");
    info!("  POST /switch/:session  - Jump to focus, short-break or long-break");
    info!("  GET  /status           - Current timer status");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to listen for shutdown signals: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
