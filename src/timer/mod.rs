//! Work/break countdown. [IntervalTimer] is a plain state machine: it doesn't schedule anything
//! by itself, the owner calls [IntervalTimer::tick] once per elapsed second while the timer is
//! running and reacts to the returned [TimerEvent]s.

use std::fmt::Display;

use tracing::{debug, trace};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn duration_in(self, config: &TimerConfig) -> u32 {
        match self {
            Phase::Work => config.work_seconds,
            Phase::Break => config.break_seconds,
        }
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// Only work time is attributed to the active project.
    pub fn accrues_time(self) -> bool {
        matches!(self, Phase::Work)
    }

    /// Message shown to the user once this phase runs out.
    pub fn completion_message(self) -> &'static str {
        match self {
            Phase::Work => "Time for a break",
            Phase::Break => "Break is over",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Work => write!(f, "work"),
            Phase::Break => write!(f, "break"),
        }
    }
}

/// Phase lengths in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_seconds: u32,
    pub break_seconds: u32,
}

impl TimerConfig {
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_seconds: work_minutes.saturating_mul(60),
            break_seconds: break_minutes.saturating_mul(60),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

/// Read-only copy of the timer, handed to displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub running: bool,
}

impl TimerState {
    pub fn display(&self) -> String {
        format_countdown(self.remaining_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A second was taken off the countdown.
    Tick { phase: Phase, remaining: u32 },
    /// `finished` ran out. The timer is stopped and already holds `next` at its full length.
    SessionComplete { finished: Phase, next: Phase },
}

#[derive(Debug)]
pub struct IntervalTimer {
    config: TimerConfig,
    phase: Phase,
    remaining: u32,
    running: bool,
    last_pause: u32,
}

impl IntervalTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Work,
            remaining: config.work_seconds,
            running: false,
            last_pause: config.work_seconds,
        }
    }

    /// Returns `false` if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        debug!("Starting {} countdown at {}", self.phase, self.display());
        self.running = true;
        true
    }

    /// Returns `false` if the timer wasn't running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.last_pause = self.remaining;
        self.running = false;
        debug!("Paused {} countdown at {}", self.phase, self.display());
        true
    }

    /// Stops the countdown and rewinds the current phase. The phase itself is kept.
    pub fn reset(&mut self) {
        self.pause();
        self.remaining = self.phase.duration_in(&self.config);
        debug!("Reset {} countdown to {}", self.phase, self.display());
    }

    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.running {
            trace!("Ignoring tick of a stopped timer");
            return vec![];
        }

        let mut events = Vec::with_capacity(2);
        if self.remaining > 0 {
            self.remaining -= 1;
            events.push(TimerEvent::Tick {
                phase: self.phase,
                remaining: self.remaining,
            });
        }

        if self.remaining == 0 {
            let finished = self.phase;
            self.pause();
            self.phase = finished.next();
            self.remaining = self.phase.duration_in(&self.config);
            self.last_pause = self.remaining;
            debug!("{finished} session complete, {} is next", self.phase);
            events.push(TimerEvent::SessionComplete {
                finished,
                next: self.phase,
            });
        }

        events
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining,
            running: self.running,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining seconds at the moment of the last pause.
    pub fn last_pause(&self) -> u32 {
        self.last_pause
    }

    pub fn display(&self) -> String {
        format_countdown(self.remaining)
    }
}

/// Formats seconds as `MM:SS`. Minutes aren't wrapped into hours.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
