//! Main application state management
//!
//! Every timer change is published as a [`TimerSnapshot`] on a broadcast
//! channel, in order. A natural completion publishes two snapshots: the
//! finished session at zero (100% progress), then the next session. The
//! channel is an observer hook for embedders; the server itself reads
//! state on demand through [`AppState::get_snapshot`].

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{error, warn};

use super::{ChannelTicker, SessionTimer, SessionType, Settings, TimerSnapshot};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 100;

/// The timer flavour hosted by the server
pub type HostTimer = SessionTimer<ChannelTicker>;

/// One natural session completion, as delivered to the notifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCompleted {
    pub session: SessionType,
    pub at: DateTime<Utc>,
}

/// Application state owning the one session timer of this process
#[derive(Debug)]
pub struct AppState {
    /// The timer and everything it mutates, behind a single lock
    pub timer: Arc<Mutex<HostTimer>>,
    pub settings: Settings,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer snapshots after every change
    pub snapshot_tx: broadcast::Sender<TimerSnapshot>,
    /// Ticker activation flag, consumed by the tick driver
    ticker_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create the application state. Every natural completion is forwarded
    /// to `completion_tx`.
    pub fn new(
        port: u16,
        host: String,
        settings: Settings,
        completion_tx: mpsc::UnboundedSender<SessionCompleted>,
    ) -> Self {
        let ticker = ChannelTicker::new();
        let ticker_rx = ticker.subscribe();

        let mut timer = SessionTimer::new(settings, ticker);
        timer.register_completion_listener(move |session| {
            let event = SessionCompleted { session, at: Utc::now() };
            if let Err(e) = completion_tx.send(event) {
                warn!("Failed to deliver completion of {} session: {}", session, e);
            }
        });

        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            timer: Arc::new(Mutex::new(timer)),
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            snapshot_tx,
            ticker_rx,
        }
    }

    /// Apply a control operation to the timer under the lock, record it as
    /// the last action and publish the resulting snapshot
    pub fn control<F>(&self, action: &str, operation: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut HostTimer),
    {
        let snapshot = self.mutate(operation)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    pub fn start(&self) -> Result<TimerSnapshot, String> {
        self.control("start", |timer| timer.start())
    }

    pub fn pause(&self) -> Result<TimerSnapshot, String> {
        self.control("pause", |timer| timer.pause())
    }

    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        self.control("reset", |timer| timer.reset())
    }

    pub fn skip_session(&self) -> Result<TimerSnapshot, String> {
        self.control("skip", |timer| timer.skip_session())
    }

    pub fn switch_to_session(&self, target: SessionType) -> Result<TimerSnapshot, String> {
        self.control(&format!("switch:{}", target), |timer| timer.switch_to_session(target))
    }

    /// Deliver one elapsed second to the timer. Returns the finished session
    /// type when the tick completed a session.
    pub fn tick(&self) -> Result<Option<SessionType>, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let completion = timer.tick();
        if let Err(e) = timer.check_invariants() {
            error!("{}", e);
        }

        // Observers see the finished session at zero before the next one.
        // Published under the lock so snapshots keep mutation order.
        if let Some(completion) = &completion {
            self.publish(completion.final_snapshot.clone());
        }
        self.publish(timer.snapshot());
        drop(timer);

        Ok(completion.map(|c| c.finished))
    }

    /// Get the current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer.lock()
            .map(|timer| timer.snapshot())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Receiver for snapshots published after every change
    pub fn subscribe_snapshots(&self) -> broadcast::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Receiver for the ticker activation flag
    pub fn ticker_activity(&self) -> watch::Receiver<bool> {
        self.ticker_rx.clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn mutate<F>(&self, operation: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut HostTimer),
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        operation(&mut *timer);
        if let Err(e) = timer.check_invariants() {
            error!("{}", e);
        }
        let snapshot = timer.snapshot();
        self.publish(snapshot.clone());
        drop(timer); // Release the lock early

        Ok(snapshot)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        // Sending only fails when nobody is subscribed
        if self.snapshot_tx.receiver_count() > 0 {
            if let Err(e) = self.snapshot_tx.send(snapshot) {
                warn!("Failed to publish timer snapshot: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(settings: Settings) -> (AppState, mpsc::UnboundedReceiver<SessionCompleted>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppState::new(20554, "127.0.0.1".to_string(), settings, tx), rx)
    }

    #[test]
    fn control_operations_record_last_action() {
        let (state, _rx) = app(Settings::default());
        assert_eq!(state.get_last_action(), (None, None));

        let snapshot = state.start().unwrap();
        assert!(snapshot.running);
        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(at.is_some());

        state.switch_to_session(SessionType::LongBreak).unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("switch:long-break"));
    }

    #[test]
    fn ticker_flag_follows_running() {
        let (state, _rx) = app(Settings::default());
        let mut activity = state.ticker_activity();

        state.start().unwrap();
        assert!(*activity.borrow_and_update());
        state.pause().unwrap();
        assert!(!*activity.borrow_and_update());
        state.start().unwrap();
        state.reset().unwrap();
        assert!(!*activity.borrow_and_update());
    }

    #[test]
    fn completion_is_forwarded_to_channel() {
        let (state, mut rx) = app(Settings::new(2, 1, 1, 4).unwrap());
        state.start().unwrap();
        assert_eq!(state.tick().unwrap(), None);
        assert!(rx.try_recv().is_err());

        assert_eq!(state.tick().unwrap(), Some(SessionType::Focus));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.session, SessionType::Focus);

        let snapshot = state.get_snapshot().unwrap();
        assert_eq!(snapshot.current_session, SessionType::ShortBreak);
        assert_eq!(snapshot.total_sessions, 1);
        assert!(!snapshot.running);
    }

    #[test]
    fn ticks_do_not_count_as_actions() {
        let (state, _rx) = app(Settings::default());
        state.start().unwrap();
        state.tick().unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }

    #[test]
    fn skip_does_not_notify() {
        let (state, mut rx) = app(Settings::default());
        let snapshot = state.skip_session().unwrap();
        assert_eq!(snapshot.current_session, SessionType::ShortBreak);
        assert_eq!(snapshot.total_sessions, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn snapshots_are_published() {
        let (state, _rx) = app(Settings::default());
        let mut snapshots = state.subscribe_snapshots();
        state.start().unwrap();
        state.tick().unwrap();
        assert!(snapshots.try_recv().unwrap().running);
        assert_eq!(snapshots.try_recv().unwrap().remaining_seconds, 1499);
        assert!(snapshots.try_recv().is_err());
    }

    #[test]
    fn completion_publishes_zero_state_before_next_session() {
        let (state, _rx) = app(Settings::new(2, 1, 1, 4).unwrap());
        state.start().unwrap();
        let mut snapshots = state.subscribe_snapshots();
        state.tick().unwrap();
        state.tick().unwrap();

        let published: Vec<TimerSnapshot> = std::iter::from_fn(|| snapshots.try_recv().ok()).collect();
        let seen: Vec<(u32, f64, SessionType)> = published
            .iter()
            .map(|s| (s.remaining_seconds, s.progress_percent, s.current_session))
            .collect();
        assert_eq!(
            seen,
            vec![
                (1, 50.0, SessionType::Focus),
                (0, 100.0, SessionType::Focus),
                (1, 0.0, SessionType::ShortBreak),
            ]
        );
        assert!(!published[1].running);
        assert_eq!(published[1].total_sessions, 0);
        assert_eq!(published[2].total_sessions, 1);
    }
}
