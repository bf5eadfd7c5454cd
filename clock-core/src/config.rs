//! Clock configuration
//!
//! The firmware bakes a `ClockConfig` in at compile time and validates it
//! during init.

use crate::time::ClockTime;

/// Highest MAX7219 intensity register value
pub const MAX_INTENSITY: u8 = 0x0F;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period must be non-zero
    ZeroTickPeriod,
    /// Button repeat interval must be non-zero
    ZeroRepeatInterval,
    /// Alarm window must last at least one second
    ZeroAlarmWindow,
    /// Display intensity above `MAX_INTENSITY`
    IntensityOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Time shown at boot
    pub start_time: ClockTime,
    /// How long the alarm output stays asserted after a match, in seconds
    pub alarm_window_secs: u32,
    /// Period of the tick source in microseconds
    pub tick_period_us: u32,
    /// How long button B must be held before minute steps start
    pub hold_delay_us: u32,
    /// Sampling period of button B while down; past the hold delay each
    /// sample adds a minute
    pub repeat_interval_us: u32,
    /// Display brightness, 0-15
    pub intensity: u8,
}

impl ClockConfig {
    pub const DEFAULT: Self = Self {
        start_time: ClockTime::ZERO,
        alarm_window_secs: 30,
        tick_period_us: 1_000_000,
        hold_delay_us: 2_000_000,
        repeat_interval_us: 100_000,
        intensity: 0x00,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.repeat_interval_us == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        if self.alarm_window_secs == 0 {
            return Err(ConfigError::ZeroAlarmWindow);
        }
        if self.intensity > MAX_INTENSITY {
            return Err(ConfigError::IntensityOutOfRange(self.intensity));
        }
        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
