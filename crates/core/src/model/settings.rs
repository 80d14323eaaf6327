use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("tick interval must be > 0")]
    InvalidTickInterval,

    #[error("low time warning must be > 0 seconds")]
    InvalidLowTimeWarning,
}

/// Tunables for a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    tick_interval: Duration,
    low_time_warning_secs: u64,
    redirect_delay: Duration,
}

impl SessionSettings {
    pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
    pub const DEFAULT_LOW_TIME_WARNING_SECS: u64 = 300;
    pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(3);

    /// # Errors
    ///
    /// Returns `SettingsError` for a zero tick interval or zero warning threshold.
    pub fn new(
        tick_interval: Duration,
        low_time_warning_secs: u64,
        redirect_delay: Duration,
    ) -> Result<Self, SettingsError> {
        if tick_interval.is_zero() {
            return Err(SettingsError::InvalidTickInterval);
        }
        if low_time_warning_secs == 0 {
            return Err(SettingsError::InvalidLowTimeWarning);
        }
        Ok(Self {
            tick_interval,
            low_time_warning_secs,
            redirect_delay,
        })
    }

    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn low_time_warning_secs(&self) -> u64 {
        self.low_time_warning_secs
    }

    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    #[must_use]
    pub fn is_low_time(&self, remaining_secs: u64) -> bool {
        remaining_secs < self.low_time_warning_secs
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK,
            low_time_warning_secs: Self::DEFAULT_LOW_TIME_WARNING_SECS,
            redirect_delay: Self::DEFAULT_REDIRECT_DELAY,
        }
    }
}
