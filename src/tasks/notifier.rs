//! Session completion notifier task

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::state::{SessionCompleted, SessionType};

/// User-facing message for a finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_completion(session: SessionType) -> Self {
        Self {
            title: "Session Complete!".to_string(),
            body: session.completion_message().to_string(),
        }
    }
}

/// Background task consuming completion events, the single handler for
/// the timer's completion listener
pub async fn notifier_task(mut completions: mpsc::UnboundedReceiver<SessionCompleted>) {
    info!("Starting notifier task");

    while let Some(event) = completions.recv().await {
        let notification = Notification::for_completion(event.session);
        info!(
            session = %event.session,
            at = %event.at.to_rfc3339(),
            "{} {}",
            notification.title,
            notification.body
        );
    }

    info!("Completion channel closed, stopping notifier");
}
