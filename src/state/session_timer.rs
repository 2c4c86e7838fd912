//! Pomodoro session timer
//!
//! Owns the [`TimerState`] and every rule that mutates it: the control
//! operations, the per-second tick and the transition from one session to
//! the next. Time itself comes from outside through a [`Ticker`], so the
//! state machine never blocks and can be driven deterministically.
//!
//! ```text
//! Focus --(n % interval != 0)--> ShortBreak --> Focus
//! Focus --(n % interval == 0)--> LongBreak  --> Focus  (cycle += 1)
//! ```

use std::fmt;

use tracing::{debug, info};

use super::{
    timer_state::format_time, SessionType, Settings, Ticker, TimerSnapshot, TimerState,
};
use crate::error::TimerError;

/// Single-slot callback invoked with the session type that just finished
pub type CompletionListener = Box<dyn FnMut(SessionType) + Send>;

/// Outcome of a tick that ran the countdown down to zero
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub finished: SessionType,
    /// The timer as it stood at zero, before the next session was installed
    pub final_snapshot: TimerSnapshot,
}

pub struct SessionTimer<T: Ticker> {
    settings: Settings,
    state: TimerState,
    ticker: T,
    listener: Option<CompletionListener>,
}

impl<T: Ticker> SessionTimer<T> {
    /// Create a paused timer at the start of a focus session
    pub fn new(settings: Settings, ticker: T) -> Self {
        Self {
            state: TimerState::new(&settings),
            settings,
            ticker,
            listener: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn current_session(&self) -> SessionType {
        self.state.current_session
    }

    pub fn session_count(&self) -> u32 {
        self.state.completed_focus_sessions
    }

    pub fn cycle_count(&self) -> u32 {
        self.state.completed_cycles
    }

    pub fn total_sessions(&self) -> u32 {
        self.state.total_completed_sessions
    }

    /// Length of the current session, always read from settings
    pub fn current_duration(&self) -> u32 {
        self.settings.duration(self.state.current_session)
    }

    /// Remaining time as `MM:SS`
    pub fn formatted_time(&self) -> String {
        format_time(self.state.remaining_seconds)
    }

    /// Elapsed share of the current session, 0.0 ..= 100.0
    pub fn progress_percent(&self) -> f64 {
        // Settings guarantee a non-zero duration
        let total = f64::from(self.current_duration());
        let remaining = f64::from(self.state.remaining_seconds.min(self.current_duration()));
        (total - remaining) / total * 100.0
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let session = self.state.current_session;
        TimerSnapshot {
            remaining_seconds: self.state.remaining_seconds,
            running: self.state.running,
            current_session: session,
            label: session.label().to_string(),
            description: session.description().to_string(),
            formatted_time: self.formatted_time(),
            progress_percent: self.progress_percent(),
            session_count: self.state.completed_focus_sessions,
            cycle_count: self.state.completed_cycles,
            total_sessions: self.state.total_completed_sessions,
        }
    }

    /// Verify the state invariants. A failure here is a bug in this module.
    pub fn check_invariants(&self) -> Result<(), TimerError> {
        let duration = self.current_duration();
        if self.state.remaining_seconds > duration {
            return Err(TimerError::InvariantViolation(format!(
                "{} seconds remaining in a {} second {} session",
                self.state.remaining_seconds, duration, self.state.current_session
            )));
        }
        if self.state.running && self.state.remaining_seconds == 0 {
            return Err(TimerError::InvariantViolation(
                "timer running with no time remaining".to_string(),
            ));
        }
        if self.state.running != self.ticker.is_active() {
            return Err(TimerError::InvariantViolation(format!(
                "running={} but ticker active={}",
                self.state.running,
                self.ticker.is_active()
            )));
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down. No-op if already running or if the session has
    /// no time left.
    pub fn start(&mut self) {
        if self.state.running || self.state.remaining_seconds == 0 {
            return;
        }
        self.state.running = true;
        self.ticker.start();
        info!("Started {} session with {} remaining", self.state.current_session, self.formatted_time());
    }

    pub fn pause(&mut self) {
        if self.state.running {
            info!("Paused {} session at {}", self.state.current_session, self.formatted_time());
        }
        self.halt();
    }

    /// Rewind the current session to its full length. Counters are kept.
    pub fn reset(&mut self) {
        self.halt();
        self.state.remaining_seconds = self.current_duration();
        info!("Reset {} session", self.state.current_session);
    }

    /// Move to the next session as if the current one had finished, without
    /// notifying the listener or counting it as completed.
    pub fn skip_session(&mut self) {
        self.halt();
        let skipped = self.state.current_session;
        self.advance();
        info!("Skipped {} session, now in {}", skipped, self.state.current_session);
    }

    /// Jump straight to `target` with a full duration. Counters are kept.
    pub fn switch_to_session(&mut self, target: SessionType) {
        self.halt();
        self.state.current_session = target;
        self.state.remaining_seconds = self.current_duration();
        info!("Switched to {} session", target);
    }

    /// Install the completion listener, replacing any previous one
    pub fn register_completion_listener<F>(&mut self, listener: F)
    where
        F: FnMut(SessionType) + Send + 'static,
    {
        if self.listener.replace(Box::new(listener)).is_some() {
            debug!("Replaced existing completion listener");
        }
    }

    /// Advance by one elapsed second.
    ///
    /// Ignored unless running. Returns the completion, including the state
    /// at zero, when this tick brought the countdown to zero.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.state.running || self.state.remaining_seconds == 0 {
            return None;
        }

        self.state.remaining_seconds -= 1;
        debug!("Tick: {} remaining in {}", self.formatted_time(), self.state.current_session);

        if self.state.remaining_seconds > 0 {
            return None;
        }

        self.halt();
        let finished = self.state.current_session;
        let final_snapshot = self.snapshot();
        info!("{} session completed", finished);

        // Listener must observe the finished session before the transition
        if let Some(listener) = self.listener.as_mut() {
            listener(finished);
        }
        self.state.total_completed_sessions += 1;
        self.advance();

        Some(Completion { finished, final_snapshot })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn halt(&mut self) {
        self.state.running = false;
        self.ticker.stop();
    }

    /// Apply the transition rule shared by natural completion and skip
    fn advance(&mut self) {
        let next = match self.state.current_session {
            SessionType::Focus => {
                let count = self.state.completed_focus_sessions + 1;
                self.state.completed_focus_sessions = count;
                if count % self.settings.long_break_interval() == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak => SessionType::Focus,
            SessionType::LongBreak => {
                self.state.completed_cycles += 1;
                SessionType::Focus
            }
        };

        self.state.current_session = next;
        self.state.remaining_seconds = self.settings.duration(next);
        self.state.running = false;
    }
}

impl<T: Ticker + fmt::Debug> fmt::Debug for SessionTimer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("ticker", &self.ticker)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::state::ManualTicker;

    fn timer(settings: Settings) -> SessionTimer<ManualTicker> {
        SessionTimer::new(settings, ManualTicker::new())
    }

    fn one_second(interval: u32) -> SessionTimer<ManualTicker> {
        timer(Settings::new(1, 1, 1, interval).unwrap())
    }

    fn record_completions(timer: &mut SessionTimer<ManualTicker>) -> Arc<Mutex<Vec<SessionType>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        timer.register_completion_listener(move |session| sink.lock().unwrap().push(session));
        seen
    }

    /// Start and tick until the current session completes naturally
    fn run_out(timer: &mut SessionTimer<ManualTicker>) -> SessionType {
        timer.start();
        loop {
            if let Some(done) = timer.tick() {
                return done.finished;
            }
        }
    }

    #[test]
    fn fresh_timer_is_paused_at_full_focus() {
        let t = timer(Settings::default());
        assert_eq!(t.current_session(), SessionType::Focus);
        assert_eq!(t.remaining_seconds(), 1500);
        assert!(!t.is_running());
        assert_eq!((t.session_count(), t.cycle_count(), t.total_sessions()), (0, 0, 0));
        assert!(t.check_invariants().is_ok());
    }

    #[test]
    fn start_activates_ticker_once() {
        let mut t = timer(Settings::default());
        t.start();
        t.start();
        assert!(t.is_running());
        assert!(t.ticker().is_active());
        assert_eq!(t.ticker().starts(), 1);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut t = timer(Settings::default());
        t.start();
        t.tick();
        t.pause();
        let once = t.state().clone();
        t.pause();
        assert_eq!(t.state(), &once);
        assert!(!t.ticker().is_active());
        assert_eq!(t.ticker().stops(), 1);
    }

    #[test]
    fn ticks_only_count_while_running() {
        let mut t = timer(Settings::default());
        assert_eq!(t.tick(), None);
        assert_eq!(t.remaining_seconds(), 1500);

        t.start();
        for expected in (1495..1500).rev() {
            t.tick();
            assert_eq!(t.remaining_seconds(), expected);
        }

        t.pause();
        t.tick();
        assert_eq!(t.remaining_seconds(), 1495);
    }

    #[test]
    fn reset_restores_duration_and_keeps_counters() {
        let mut t = timer(Settings::default());
        t.skip_session();
        t.start();
        t.tick();
        t.tick();
        t.reset();
        assert_eq!(t.remaining_seconds(), 300);
        assert!(!t.is_running());
        assert!(!t.ticker().is_active());
        assert_eq!(t.session_count(), 1);
        assert_eq!(t.progress_percent(), 0.0);
    }

    #[test]
    fn focus_completions_follow_long_break_interval() {
        let mut t = timer(Settings::default());
        let seen = record_completions(&mut t);

        for round in 1..=4 {
            assert_eq!(run_out(&mut t), SessionType::Focus);
            let expected = if round == 4 { SessionType::LongBreak } else { SessionType::ShortBreak };
            assert_eq!(t.current_session(), expected);
            assert_eq!(t.session_count(), round);

            assert!(run_out(&mut t).is_break());
            assert_eq!(t.current_session(), SessionType::Focus);
        }

        assert_eq!(t.cycle_count(), 1);
        assert_eq!(t.total_sessions(), 8);
        assert_eq!(seen.lock().unwrap().len(), 8);
    }

    #[test]
    fn one_second_scenario_with_interval_two() {
        let mut t = one_second(2);
        let seen = record_completions(&mut t);

        t.start();
        assert_eq!(t.tick().map(|c| c.finished), Some(SessionType::Focus));
        assert_eq!(*seen.lock().unwrap(), vec![SessionType::Focus]);
        assert_eq!(t.current_session(), SessionType::ShortBreak);
        assert_eq!(t.total_sessions(), 1);
        assert_eq!(t.session_count(), 1);
        assert!(!t.is_running());

        assert_eq!(run_out(&mut t), SessionType::ShortBreak);
        assert_eq!(t.current_session(), SessionType::Focus);
        assert_eq!(t.session_count(), 1);

        assert_eq!(run_out(&mut t), SessionType::Focus);
        assert_eq!(t.session_count(), 2);
        assert_eq!(t.current_session(), SessionType::LongBreak);

        assert_eq!(run_out(&mut t), SessionType::LongBreak);
        assert_eq!(t.current_session(), SessionType::Focus);
        assert_eq!(t.cycle_count(), 1);
        assert_eq!(t.total_sessions(), 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionType::Focus,
                SessionType::ShortBreak,
                SessionType::Focus,
                SessionType::LongBreak
            ]
        );
    }

    #[test]
    fn listener_receives_finished_session_not_next_one() {
        let mut t = one_second(1);
        let seen = record_completions(&mut t);
        t.start();
        t.tick();
        assert_eq!(*seen.lock().unwrap(), vec![SessionType::Focus]);
        assert_eq!(t.current_session(), SessionType::LongBreak);
    }

    #[test]
    fn replacing_listener_drops_the_old_one() {
        let mut t = one_second(4);
        let first = record_completions(&mut t);
        let second = record_completions(&mut t);

        run_out(&mut t);
        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), vec![SessionType::Focus]);
    }

    #[test]
    fn skip_applies_transition_silently() {
        let mut t = timer(Settings::default());
        let seen = record_completions(&mut t);
        t.start();
        t.tick();

        t.skip_session();
        assert_eq!(t.current_session(), SessionType::ShortBreak);
        assert_eq!(t.remaining_seconds(), 300);
        assert_eq!(t.session_count(), 1);
        assert_eq!(t.total_sessions(), 0);
        assert!(!t.is_running());
        assert!(!t.ticker().is_active());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn skipping_through_a_full_cycle() {
        let mut t = timer(Settings::default());
        for _ in 0..3 {
            t.skip_session();
            assert_eq!(t.current_session(), SessionType::ShortBreak);
            t.skip_session();
        }
        t.skip_session();
        assert_eq!(t.current_session(), SessionType::LongBreak);
        t.skip_session();
        assert_eq!(t.current_session(), SessionType::Focus);
        assert_eq!(t.session_count(), 4);
        assert_eq!(t.cycle_count(), 1);
        assert_eq!(t.total_sessions(), 0);
    }

    #[test]
    fn skip_after_switch_counts_the_session_being_left() {
        let mut t = timer(Settings::default());
        t.switch_to_session(SessionType::LongBreak);
        t.skip_session();
        assert_eq!(t.current_session(), SessionType::Focus);
        assert_eq!(t.cycle_count(), 1);
        assert_eq!(t.session_count(), 0);
    }

    #[test]
    fn switch_to_long_break_keeps_counters() {
        let mut t = timer(Settings::default());
        t.skip_session();
        t.start();
        t.tick();

        t.switch_to_session(SessionType::LongBreak);
        assert_eq!(t.current_session(), SessionType::LongBreak);
        assert_eq!(t.remaining_seconds(), 900);
        assert!(!t.is_running());
        assert_eq!((t.session_count(), t.cycle_count(), t.total_sessions()), (1, 0, 0));
        assert_eq!(t.progress_percent(), 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let mut t = timer(Settings::new(4, 1, 1, 4).unwrap());
        t.start();
        t.tick();
        assert_eq!(t.progress_percent(), 25.0);
        t.tick();
        assert_eq!(t.progress_percent(), 50.0);
        assert_eq!(t.formatted_time(), "00:02");
    }

    #[test]
    fn progress_reaches_hundred_at_zero() {
        let mut t = timer(Settings::new(2, 1, 1, 4).unwrap());
        t.start();
        assert_eq!(t.tick(), None);
        assert_eq!(t.progress_percent(), 50.0);

        let completion = t.tick().unwrap();
        assert_eq!(completion.finished, SessionType::Focus);
        let at_zero = completion.final_snapshot;
        assert_eq!(at_zero.current_session, SessionType::Focus);
        assert_eq!(at_zero.remaining_seconds, 0);
        assert_eq!(at_zero.progress_percent, 100.0);
        assert_eq!(at_zero.formatted_time, "00:00");
        assert!(!at_zero.running);

        // Next session is installed afterwards, starting from zero progress
        assert_eq!(t.current_session(), SessionType::ShortBreak);
        assert_eq!(t.progress_percent(), 0.0);
    }

    #[test]
    fn start_is_ignored_with_nothing_remaining() {
        let mut t = timer(Settings::default());
        t.state.remaining_seconds = 0;
        t.start();
        assert!(!t.is_running());
        assert!(!t.ticker().is_active());
    }

    #[test]
    fn completion_stops_the_ticker() {
        let mut t = one_second(4);
        t.start();
        assert!(t.ticker().is_active());
        t.tick();
        assert!(!t.ticker().is_active());
        assert!(t.check_invariants().is_ok());
    }

    #[test]
    fn invariant_check_flags_corrupted_state() {
        let mut t = timer(Settings::default());
        t.state.remaining_seconds = 5000;
        assert!(matches!(t.check_invariants(), Err(TimerError::InvariantViolation(_))));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut t = timer(Settings::default());
        t.switch_to_session(SessionType::ShortBreak);
        let snap = t.snapshot();
        assert_eq!(snap.current_session, SessionType::ShortBreak);
        assert_eq!(snap.formatted_time, "05:00");
        assert_eq!(snap.label, "Short Break");
        assert_eq!(snap.progress_percent, 0.0);
    }
}
