/// Lifecycle of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Expired,
    Stopped,
}

/// Result of advancing the countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Counting { remaining: u64 },
    /// Fired once, on the tick that reaches zero.
    Expired,
    /// The timer has already expired or was stopped.
    Inactive,
}

/// Whole-second countdown with a single terminal expiry.
///
/// There is no pause. A running timer only ends by expiring or by `stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: u64,
    state: TimerState,
}

impl CountdownTimer {
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_seconds(u64::from(minutes) * 60)
    }

    #[must_use]
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            remaining: seconds,
            state: TimerState::Running,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Advance by one second.
    ///
    /// A timer started at zero expires on its first tick.
    pub fn tick(&mut self) -> TimerTick {
        if self.state != TimerState::Running {
            return TimerTick::Inactive;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return TimerTick::Expired;
        }
        TimerTick::Counting {
            remaining: self.remaining,
        }
    }

    /// Cancel the countdown; later ticks are inert.
    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }
}
