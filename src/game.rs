//! One playable session: a [`MatchEngine`] and a [`Countdown`] owned together,
//! with expiry wired to validation and change notifications for the host.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::info;

use crate::engine::{MatchEngine, Score, SessionStatus, ValidationReport};
use crate::error::{MatchError, TimerError};
use crate::session::{Pair, SessionState};
use crate::timer::{Countdown, TickOutcome, TimerSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StateChanged,
    TimerExpired,
    Validated(Score),
}

#[derive(Debug, Default)]
pub struct Game {
    engine: MatchEngine,
    countdown: Countdown,
    subscribers: Vec<Sender<GameEvent>>,
}

impl Game {
    pub fn new(pairs: Vec<Pair>, countdown: Countdown) -> Self {
        Self {
            engine: MatchEngine::new(pairs),
            countdown,
            subscribers: Vec::new(),
        }
    }

    /// Registers a listener. Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: GameEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn status(&self) -> SessionStatus {
        self.engine.status()
    }

    pub fn score(&self) -> Score {
        self.engine.score()
    }

    pub fn timer(&self) -> TimerSnapshot {
        self.countdown.snapshot()
    }

    /// New deck. The countdown goes back to idle so the next round starts fresh.
    pub fn load_pairs(&mut self, pairs: Vec<Pair>) {
        self.engine.load_pairs(pairs);
        self.countdown.reset();
        self.emit(GameEvent::StateChanged);
    }

    pub fn reshuffle(&mut self) {
        self.engine.reshuffle();
        self.emit(GameEvent::StateChanged);
    }

    pub fn assign(&mut self, q: usize, a: usize) -> Result<(), MatchError> {
        self.engine.assign(q, a)?;
        self.emit(GameEvent::StateChanged);
        Ok(())
    }

    pub fn unassign(&mut self, q: usize) -> Result<(), MatchError> {
        self.engine.unassign(q)?;
        self.emit(GameEvent::StateChanged);
        Ok(())
    }

    pub fn validate(&mut self) -> Result<ValidationReport, MatchError> {
        let report = self.engine.validate()?;
        self.emit(GameEvent::Validated(report.summary()));
        self.emit(GameEvent::StateChanged);
        Ok(report)
    }

    /// Clears progress and rewinds the countdown. With `reshuffle` the
    /// answers are also dealt in a new order.
    pub fn reset(&mut self, reshuffle: bool) {
        if reshuffle {
            self.engine.reset_and_reshuffle();
        } else {
            self.engine.reset();
        }
        self.countdown.reset();
        self.emit(GameEvent::StateChanged);
    }

    pub fn configure_timer(&mut self, total_secs: u32, enabled: bool) -> Result<(), TimerError> {
        self.countdown.configure(total_secs, enabled)?;
        self.emit(GameEvent::StateChanged);
        Ok(())
    }

    /// Starts a fresh countdown for a new round.
    pub fn begin_countdown(&mut self) {
        self.countdown.restart();
        self.emit(GameEvent::StateChanged);
    }

    pub fn start_timer(&mut self) {
        self.countdown.start();
        self.emit(GameEvent::StateChanged);
    }

    pub fn pause_timer(&mut self) {
        self.countdown.pause();
        self.emit(GameEvent::StateChanged);
    }

    pub fn resume_timer(&mut self) {
        self.countdown.resume();
        self.emit(GameEvent::StateChanged);
    }

    pub fn toggle_timer(&mut self) {
        self.countdown.toggle();
        self.emit(GameEvent::StateChanged);
    }

    pub fn reset_timer(&mut self) {
        self.countdown.reset();
        self.emit(GameEvent::StateChanged);
    }

    /// Advances the countdown by one second. On expiry the assignment is
    /// validated exactly as if the player had asked for it, and that outcome
    /// is returned. Incomplete assignments are not filled in.
    pub fn tick(&mut self) -> Option<Result<ValidationReport, MatchError>> {
        match self.countdown.tick() {
            TickOutcome::Ignored => None,
            TickOutcome::Counting(_) => {
                self.emit(GameEvent::StateChanged);
                None
            }
            TickOutcome::Expired => {
                self.emit(GameEvent::TimerExpired);
                let outcome = self.validate();
                if let Err(ref err) = outcome {
                    info!(%err, "validation on expiry did not complete");
                    self.emit(GameEvent::StateChanged);
                }
                Some(outcome)
            }
        }
    }
}
