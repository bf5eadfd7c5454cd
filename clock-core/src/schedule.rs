//! Alarm schedule table and the alarm output window

use crate::time::ClockTime;

/// Number of user-settable alarm slots
pub const SLOT_COUNT: usize = 10;

/// Fixed table of alarm times, all zero at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleTable {
    slots: [ClockTime; SLOT_COUNT],
}

impl ScheduleTable {
    pub const fn new() -> Self {
        Self {
            slots: [ClockTime::ZERO; SLOT_COUNT],
        }
    }

    /// Returns the slot value, or `None` if `index` is out of range.
    pub fn get(&self, index: usize) -> Option<ClockTime> {
        self.slots.get(index).copied()
    }

    /// Sets a slot. Out of range indices are ignored.
    pub fn set(&mut self, index: usize, time: ClockTime) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = time;
        }
    }

    /// Advances one slot by `secs`. Out of range indices are ignored.
    pub fn advance(&mut self, index: usize, secs: u32) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.advance(secs);
        }
    }

    /// True if any slot equals `now` exactly.
    pub fn matches(&self, now: ClockTime) -> bool {
        self.slots.iter().any(|&slot| slot == now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClockTime> {
        self.slots.iter()
    }
}

/// The window during which the alarm output stays asserted after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmWindow {
    opened_at: Option<ClockTime>,
}

impl AlarmWindow {
    pub const fn new() -> Self {
        Self { opened_at: None }
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn opened_at(&self) -> Option<ClockTime> {
        self.opened_at
    }

    /// Opens the window at `now`. An already open window restarts from `now`.
    pub fn open(&mut self, now: ClockTime) {
        self.opened_at = Some(now);
    }

    /// Closes the window once `now` has reached `opened_at + length_secs`.
    ///
    /// Returns true if this call closed it.
    pub fn expire(&mut self, now: ClockTime, length_secs: u32) -> bool {
        match self.opened_at {
            Some(start) if now >= start.plus(length_secs) => {
                self.opened_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.opened_at = None;
    }
}
