//! Tick source abstraction
//!
//! The session timer never sleeps or spawns anything itself. It only tells
//! its ticker when ticks should start and stop flowing; whoever owns the
//! ticker is responsible for calling `SessionTimer::tick` once per second
//! while it is active.

use tokio::sync::watch;

/// A periodic one-second tick source that can be switched on and off
pub trait Ticker: Send {
    /// Begin delivering ticks. Calling it while active is harmless.
    fn start(&mut self);

    /// Stop delivering ticks. Calling it while stopped is harmless.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Ticker that publishes its activation flag on a watch channel.
///
/// The tick driver task subscribes to the channel and runs a one-second
/// interval only while the flag is `true`.
#[derive(Debug)]
pub struct ChannelTicker {
    active_tx: watch::Sender<bool>,
}

impl ChannelTicker {
    pub fn new() -> Self {
        let (active_tx, _) = watch::channel(false);
        Self { active_tx }
    }

    /// Receiver for the activation flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active_tx.subscribe()
    }

    fn set_active(&self, active: bool) {
        // send_if_modified keeps working with zero receivers and avoids
        // waking the driver for a no-op
        self.active_tx.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
    }
}

impl Default for ChannelTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for ChannelTicker {
    fn start(&mut self) {
        self.set_active(true);
    }

    fn stop(&mut self) {
        self.set_active(false);
    }

    fn is_active(&self) -> bool {
        *self.active_tx.borrow()
    }
}

/// Ticker with no time source behind it; tests call `tick` by hand and
/// inspect how often the timer switched it.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    active: bool,
    starts: u32,
    stops: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of inactive -> active transitions
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of active -> inactive transitions
    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.starts += 1;
        }
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.stops += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
