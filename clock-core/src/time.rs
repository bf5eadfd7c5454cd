//! Wall clock time as seconds since an epoch

use core::fmt::Write;

use heapless::String;

pub const SECS_PER_MINUTE: u32 = 60;
pub const SECS_PER_HOUR: u32 = 60 * SECS_PER_MINUTE;
pub const SECS_PER_DAY: u32 = 24 * SECS_PER_HOUR;

/// Length of the `HH:MM:SS` text
pub const TEXT_LEN: usize = 8;

/// Seconds since the epoch (midnight of day zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime(u32);

impl ClockTime {
    pub const ZERO: Self = Self(0);

    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_hms(hours: u32, mins: u32, secs: u32) -> Self {
        Self(hours * SECS_PER_HOUR + mins * SECS_PER_MINUTE + secs)
    }

    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// Advances by `secs`, saturating at the end of the representable range.
    pub fn advance(&mut self, secs: u32) {
        self.0 = self.0.saturating_add(secs);
    }

    pub const fn plus(self, secs: u32) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Hour of day, 0-23
    pub const fn hours(self) -> u8 {
        ((self.0 % SECS_PER_DAY) / SECS_PER_HOUR) as u8
    }

    pub const fn mins(self) -> u8 {
        ((self.0 % SECS_PER_HOUR) / SECS_PER_MINUTE) as u8
    }

    pub const fn secs(self) -> u8 {
        (self.0 % SECS_PER_MINUTE) as u8
    }

    /// Formats the time of day as `HH:MM:SS`.
    pub fn text(self) -> String<TEXT_LEN> {
        let mut out = String::new();
        // Two digits per field always fits the buffer
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.mins(),
            self.secs()
        );
        out
    }
}
