//! Sampling of the advance button while it is down
//!
//! After a press the firmware samples the pin once per repeat interval and
//! feeds the level to [`HoldPoller::poll`]. A release is reported on the
//! first sample that reads it, so a short tap leaves fast-forward within one
//! interval. Minute steps only start once the hold delay has elapsed.

use crate::config::ClockConfig;
use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldPoller {
    /// Time the button has been seen held since the press
    held_us: u32,
    hold_delay_us: u32,
    interval_us: u32,
}

impl HoldPoller {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            held_us: 0,
            hold_delay_us: config.hold_delay_us,
            interval_us: config.repeat_interval_us,
        }
    }

    /// Time between two samples
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Restarts the hold timer for a fresh press.
    pub fn press(&mut self) {
        self.held_us = 0;
    }

    /// Takes one sample taken `interval_us` after the previous one.
    ///
    /// Returns the event to dispatch, if any. `None` means the button is
    /// still inside its hold delay.
    pub fn poll(&mut self, held: bool) -> Option<Event> {
        if !held {
            return Some(Event::ButtonBReleased);
        }
        self.held_us = self.held_us.saturating_add(self.interval_us);
        if self.held_us >= self.hold_delay_us {
            Some(Event::ButtonBHeld)
        } else {
            None
        }
    }
}
