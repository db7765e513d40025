//! Countdown gate: locks pointer interaction for a number of seconds.
//!
//! Time is simulated. The owner feeds frame deltas through
//! [`CountdownGate::advance`] and a one-second [`Ticker`] decides when the
//! remaining time is re-checked.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::InterfaceError;
use crate::interaction::InteractionEngine;

/// Shared cancel flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Repeating timer over simulated time. Fires at every multiple of
/// `interval` until its token is cancelled.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: f64,
    elapsed: f64,
    fired: u64,
    token: CancellationToken,
}

impl Ticker {
    /// Slack when comparing accumulated frame deltas to a scheduled time.
    pub const TOLERANCE: f64 = 1e-4;
    /// Most firings reported by one [`Self::advance`]; older ones are skipped.
    pub const MAX_FIRINGS: u64 = 64;

    pub fn new(interval: f32, token: CancellationToken) -> Self {
        Self {
            interval: f64::from(interval.max(f32::EPSILON)),
            elapsed: 0.0,
            fired: 0,
            token,
        }
    }

    /// Advance by `dt` seconds and return the scheduled times of the
    /// firings that became due, at most [`Self::MAX_FIRINGS`] of them.
    pub fn advance(&mut self, dt: f32) -> Vec<f64> {
        if self.token.is_cancelled() {
            return Vec::new();
        }
        self.elapsed += f64::from(dt.max(0.0));
        let due = ((self.elapsed + Self::TOLERANCE) / self.interval).floor() as u64;
        if due <= self.fired {
            return Vec::new();
        }
        let skipped = (due - self.fired).saturating_sub(Self::MAX_FIRINGS);
        if skipped > 0 {
            debug!(skipped, "ticker fell behind; skipping firings");
        }
        let first = self.fired + skipped + 1;
        self.fired = due;
        (first..=due).map(|k| k as f64 * self.interval).collect()
    }

    /// Simulated seconds since the ticker was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// What a countdown check produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Still running with `remaining` whole seconds left.
    Tick { remaining: i64 },
    /// Finished; interaction is back on and the callback ran.
    Completed,
    /// Stopped early; the callback was dropped.
    Cancelled,
}

/// At most one countdown at a time.
#[derive(Default)]
pub struct CountdownGate {
    duration: u32,
    remaining: i64,
    ticker: Option<Ticker>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for CountdownGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownGate")
            .field("duration", &self.duration)
            .field("remaining", &self.remaining)
            .field("running", &self.is_running())
            .finish()
    }
}

impl CountdownGate {
    /// Seconds between checks.
    pub const INTERVAL: f32 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down `duration` seconds.
    ///
    /// Interaction is disabled immediately and the first check runs before
    /// returning. A countdown already in progress is left untouched.
    pub fn start(
        &mut self,
        engine: &mut InteractionEngine,
        duration: u32,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<CountdownEvent, InterfaceError> {
        if self.is_running() {
            warn!(
                remaining = self.remaining,
                "a countdown is already in progress; ignoring the new one"
            );
            return Err(InterfaceError::CountdownAlreadyRunning);
        }
        info!(duration, "countdown started");
        engine.set_interactive(false);
        self.duration = duration;
        self.remaining = i64::from(duration);
        self.on_complete = Some(Box::new(on_complete));
        self.ticker = Some(Ticker::new(Self::INTERVAL, CancellationToken::new()));
        Ok(self.check(engine, 0.0))
    }

    /// Feed `dt` simulated seconds. Returns one event per check that ran.
    pub fn advance(&mut self, engine: &mut InteractionEngine, dt: f32) -> Vec<CountdownEvent> {
        let Some(ticker) = self.ticker.as_mut() else {
            return Vec::new();
        };
        if ticker.token().is_cancelled() {
            return vec![self.finish_cancelled(engine)];
        }
        let mut events = Vec::new();
        for at in ticker.advance(dt) {
            let event = self.check(engine, at);
            events.push(event);
            if event == CountdownEvent::Completed {
                break;
            }
        }
        events
    }

    /// Stop the countdown without running its callback.
    pub fn cancel(&mut self, engine: &mut InteractionEngine) -> Option<CountdownEvent> {
        self.is_running().then(|| self.finish_cancelled(engine))
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Whole seconds left at the last check.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Token of the running countdown; cancelling it stops the countdown at
    /// the next [`Self::advance`].
    pub fn token(&self) -> Option<CancellationToken> {
        self.ticker.as_ref().map(|t| t.token().clone())
    }

    fn check(&mut self, engine: &mut InteractionEngine, elapsed: f64) -> CountdownEvent {
        self.remaining = i64::from(self.duration) - elapsed.round() as i64;
        if self.remaining > 0 {
            debug!(remaining = self.remaining, "countdown tick");
            return CountdownEvent::Tick {
                remaining: self.remaining,
            };
        }
        self.ticker = None;
        engine.set_interactive(true);
        info!("countdown completed");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
        CountdownEvent::Completed
    }

    fn finish_cancelled(&mut self, engine: &mut InteractionEngine) -> CountdownEvent {
        if let Some(ticker) = self.ticker.take() {
            ticker.token().cancel();
        }
        self.on_complete = None;
        engine.set_interactive(true);
        info!(remaining = self.remaining, "countdown cancelled");
        CountdownEvent::Cancelled
    }
}
