//! Events delivered to the clock controller

/// Inputs from the tick source and the two buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// One second of real time elapsed
    Tick,
    /// Button A pressed: step through the schedule slots
    ButtonA,
    /// Button B pressed: advance the clock or the selected slot
    ButtonB,
    /// Button B still held after one polling unit
    ButtonBHeld,
    /// Button B released
    ButtonBReleased,
}

impl Event {
    /// Check if this event comes from a button
    pub fn is_button_event(&self) -> bool {
        !matches!(self, Event::Tick)
    }
}
