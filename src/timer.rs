//! Countdown state machine. Time only advances through [`Countdown::tick`];
//! the host owns the real one-second schedule.

use crate::error::TimerError;
use clap::ValueEnum;
use tracing::{debug, info};

pub const DEFAULT_TOTAL_SECS: u32 = 120;
pub const MIN_CUSTOM_MINUTES: u32 = 1;
pub const MAX_CUSTOM_MINUTES: u32 = 120;

const WARNING_FRACTION: f64 = 0.30;
const DANGER_FRACTION: f64 = 0.10;

/// Fixed durations offered by the timer settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum TimerPreset {
    #[value(name = "1m")]
    #[strum(serialize = "1m")]
    OneMinute,
    #[value(name = "2m")]
    #[strum(serialize = "2m")]
    TwoMinutes,
    #[value(name = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[value(name = "10m")]
    #[strum(serialize = "10m")]
    TenMinutes,
}

impl TimerPreset {
    pub const ALL: [TimerPreset; 4] = [
        TimerPreset::OneMinute,
        TimerPreset::TwoMinutes,
        TimerPreset::FiveMinutes,
        TimerPreset::TenMinutes,
    ];

    pub fn secs(self) -> u32 {
        match self {
            TimerPreset::OneMinute => 60,
            TimerPreset::TwoMinutes => 120,
            TimerPreset::FiveMinutes => 300,
            TimerPreset::TenMinutes => 600,
        }
    }

    /// The preset after the one matching `secs`, wrapping around. Durations
    /// that match no preset start the cycle over.
    pub fn next_after(secs: u32) -> TimerPreset {
        match Self::ALL.iter().position(|p| p.secs() == secs) {
            Some(i) => Self::ALL[(i + 1) % Self::ALL.len()],
            None => Self::ALL[0],
        }
    }
}

/// Custom minute input, clamped to the supported range.
pub fn minutes_to_secs(minutes: u32) -> u32 {
    minutes.clamp(MIN_CUSTOM_MINUTES, MAX_CUSTOM_MINUTES) * 60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Threshold {
    Normal,
    Warning,
    Danger,
    Done,
}

/// Presentation bucket for a remaining/total pair.
pub fn threshold(remaining_secs: u32, total_secs: u32) -> Threshold {
    let remaining = remaining_secs as f64;
    let total = total_secs as f64;
    if remaining_secs == 0 {
        Threshold::Done
    } else if remaining <= total * DANGER_FRACTION {
        Threshold::Danger
    } else if remaining <= total * WARNING_FRACTION {
        Threshold::Warning
    } else {
        Threshold::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running; nothing changed.
    Ignored,
    Counting(u32),
    /// Reported once per cycle, on the tick that reaches zero.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub enabled: bool,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub running: bool,
    pub expired: bool,
}

impl TimerSnapshot {
    pub fn threshold(&self) -> Threshold {
        threshold(self.remaining_secs, self.total_secs)
    }
}

#[derive(Debug, Clone)]
pub struct Countdown {
    enabled: bool,
    total_secs: u32,
    remaining_secs: u32,
    phase: Phase,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            enabled: false,
            total_secs: DEFAULT_TOTAL_SECS,
            remaining_secs: DEFAULT_TOTAL_SECS,
            phase: Phase::Idle,
        }
    }
}

impl Countdown {
    pub fn new(total_secs: u32, enabled: bool) -> Result<Self, TimerError> {
        let mut countdown = Self::default();
        countdown.configure(total_secs, enabled)?;
        Ok(countdown)
    }

    pub fn configure(&mut self, total_secs: u32, enabled: bool) -> Result<(), TimerError> {
        if self.phase == Phase::Running {
            return Err(TimerError::Running);
        }
        if total_secs == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.enabled = enabled;
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.phase = Phase::Idle;
        debug!(total_secs, enabled, "countdown configured");
        Ok(())
    }

    /// Begins (or continues from a pause) the countdown.
    pub fn start(&mut self) {
        match self.phase {
            _ if !self.enabled => debug!("start ignored: countdown disabled"),
            Phase::Running | Phase::Expired => debug!(phase = %self.phase, "start ignored"),
            Phase::Idle | Phase::Paused => {
                self.phase = Phase::Running;
                debug!(remaining = self.remaining_secs, "countdown running");
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            debug!(remaining = self.remaining_secs, "countdown paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            debug!(remaining = self.remaining_secs, "countdown resumed");
        }
    }

    /// Play/pause control: pauses while running, otherwise starts.
    pub fn toggle(&mut self) {
        if self.phase == Phase::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.total_secs;
        self.phase = Phase::Idle;
        debug!("countdown reset");
    }

    /// Reset followed by start.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = Phase::Expired;
            info!(total_secs = self.total_secs, "countdown expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining_secs)
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == Phase::Expired
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn threshold(&self) -> Threshold {
        threshold(self.remaining_secs, self.total_secs)
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.total_secs == 0 {
            0.0
        } else {
            self.remaining_secs as f64 / self.total_secs as f64
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            enabled: self.enabled,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            running: self.is_running(),
            expired: self.is_expired(),
        }
    }
}
