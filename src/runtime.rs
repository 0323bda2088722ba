use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Countdown resolution: the timer advances one second per tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum MatchEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait MatchEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<MatchEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<MatchEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses are input.
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => MatchEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => MatchEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<MatchEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<MatchEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<MatchEvent>) -> Self {
        Self { rx }
    }
}

impl MatchEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<MatchEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Single-threaded event pump. Ticks are scheduled against a deadline, so a
/// burst of key presses never postpones the next tick.
pub struct Runner<E: MatchEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: MatchEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Restarts the tick phase so the next tick lands one full interval from now.
    /// Call when a countdown starts or resumes.
    pub fn rearm(&mut self) {
        self.next_tick = Instant::now() + self.ticker.interval();
    }

    /// Blocks until the next event or the tick deadline, whichever comes first
    pub fn step(&mut self) -> MatchEvent {
        let wait = self.next_tick.saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                let now = Instant::now();
                self.next_tick += self.ticker.interval();
                if self.next_tick <= now {
                    // Fell behind (suspended terminal, slow draw); skip missed ticks.
                    self.next_tick = now + self.ticker.interval();
                }
                MatchEvent::Tick
            }
        }
    }
}
