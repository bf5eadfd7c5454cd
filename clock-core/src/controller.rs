//! Clock state machine
//!
//! `ClockState` owns the live time, the schedule table and the alarm window.
//! Every input arrives as an [`Event`] through [`ClockState::handle`], which
//! mutates the state and reports what the caller has to do next as
//! [`Effects`]. Nothing here blocks: fast-forward is a mode, and the repeat
//! cadence comes from `Event::ButtonBHeld` deliveries.

use crate::config::ClockConfig;
use crate::event::Event;
use crate::schedule::{AlarmWindow, ScheduleTable, SLOT_COUNT};
use crate::time::{ClockTime, SECS_PER_MINUTE};

/// Highest value of the schedule counter
pub const MAX_COUNTER: u8 = SLOT_COUNT as u8;

/// Controller modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Live clock ticking and shown
    Normal,
    /// Button B held; ticks are suspended and each polling unit adds a minute
    FastForwarding,
    /// A schedule slot is selected for editing
    SchedulingEntry,
}

/// What the display should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Render {
    /// Leave the display alone
    Skip,
    /// Refresh what changed
    Update,
    /// Redraw the whole face
    Redraw,
}

/// Change of the alarm output caused by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmEdge {
    None,
    Rising,
    Falling,
}

/// Side effects requested by [`ClockState::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    pub render: Render,
    pub alarm: AlarmEdge,
}

impl Effects {
    const NONE: Self = Self {
        render: Render::Skip,
        alarm: AlarmEdge::None,
    };

    const fn redraw() -> Self {
        Self {
            render: Render::Redraw,
            alarm: AlarmEdge::None,
        }
    }
}

/// What the display should currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    /// The live clock
    Clock { time: ClockTime, alarm: bool },
    /// A schedule slot being edited; `index` is zero based
    Slot { index: u8, time: ClockTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    now: ClockTime,
    mode: Mode,
    /// 0 in normal mode, otherwise selects slot `counter - 1`
    counter: u8,
    schedule: ScheduleTable,
    alarm: AlarmWindow,
    alarm_window_secs: u32,
}

impl ClockState {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            now: config.start_time,
            mode: Mode::Normal,
            counter: 0,
            schedule: ScheduleTable::new(),
            alarm: AlarmWindow::new(),
            alarm_window_secs: config.alarm_window_secs,
        }
    }

    pub fn now(&self) -> ClockTime {
        self.now
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn is_scheduling(&self) -> bool {
        self.counter != 0
    }

    pub fn is_fast_forwarding(&self) -> bool {
        self.mode == Mode::FastForwarding
    }

    pub fn alarm_asserted(&self) -> bool {
        self.alarm.is_open()
    }

    pub fn schedule(&self) -> &ScheduleTable {
        &self.schedule
    }

    pub fn slot(&self, index: usize) -> Option<ClockTime> {
        self.schedule.get(index)
    }

    pub fn set_slot(&mut self, index: usize, time: ClockTime) {
        self.schedule.set(index, time);
    }

    /// Index of the slot selected by the counter, if any
    pub fn selected_slot(&self) -> Option<usize> {
        self.counter.checked_sub(1).map(usize::from)
    }

    /// Sets the live clock back to zero and drops any open alarm window.
    ///
    /// Returns `AlarmEdge::Falling` if the alarm output was asserted.
    pub fn reset_time(&mut self) -> AlarmEdge {
        self.now = ClockTime::ZERO;
        if self.alarm.is_open() {
            self.alarm.close();
            AlarmEdge::Falling
        } else {
            AlarmEdge::None
        }
    }

    pub fn view(&self) -> View {
        match self.selected_slot() {
            Some(index) => View::Slot {
                index: index as u8,
                time: self.schedule.get(index).unwrap_or_default(),
            },
            None => View::Clock {
                time: self.now,
                alarm: self.alarm.is_open(),
            },
        }
    }

    /// Applies one event and reports the resulting side effects.
    pub fn handle(&mut self, event: Event) -> Effects {
        match event {
            Event::Tick => self.on_tick(),
            Event::ButtonA => self.on_mode_button(),
            Event::ButtonB => self.on_advance_press(),
            Event::ButtonBHeld => self.on_advance_held(),
            Event::ButtonBReleased => self.on_advance_release(),
        }
    }

    fn on_tick(&mut self) -> Effects {
        let mut alarm = AlarmEdge::None;

        if !self.is_fast_forwarding() {
            self.now.advance(1);

            let was_open = self.alarm.is_open();
            if self.schedule.matches(self.now) {
                self.alarm.open(self.now);
                if !was_open {
                    alarm = AlarmEdge::Rising;
                }
            } else if self.alarm.expire(self.now, self.alarm_window_secs) {
                alarm = AlarmEdge::Falling;
            }
        }

        let render = if self.is_scheduling() {
            Render::Skip
        } else {
            Render::Update
        };
        Effects { render, alarm }
    }

    fn on_mode_button(&mut self) -> Effects {
        self.counter += 1;
        if self.counter > MAX_COUNTER {
            self.counter = 0;
        }
        if !self.is_fast_forwarding() {
            self.mode = self.resting_mode();
        }
        Effects::redraw()
    }

    fn on_advance_press(&mut self) -> Effects {
        if self.is_fast_forwarding() {
            // Contact bounce while already held
            return Effects::NONE;
        }
        self.advance_target(1);
        self.mode = Mode::FastForwarding;
        Effects::redraw()
    }

    fn on_advance_held(&mut self) -> Effects {
        if !self.is_fast_forwarding() {
            return Effects::NONE;
        }
        self.advance_target(SECS_PER_MINUTE);
        Effects::redraw()
    }

    fn on_advance_release(&mut self) -> Effects {
        if !self.is_fast_forwarding() {
            return Effects::NONE;
        }
        self.mode = self.resting_mode();
        Effects::redraw()
    }

    /// Advances the selected slot in schedule mode, the live clock otherwise.
    fn advance_target(&mut self, secs: u32) {
        match self.selected_slot() {
            Some(index) => self.schedule.advance(index, secs),
            None => self.now.advance(secs),
        }
    }

    fn resting_mode(&self) -> Mode {
        if self.is_scheduling() {
            Mode::SchedulingEntry
        } else {
            Mode::Normal
        }
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new(&ClockConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ticks(state: &mut ClockState, n: u32) -> Effects {
        let mut last = Effects::NONE;
        for _ in 0..n {
            last = state.handle(Event::Tick);
        }
        last
    }

    #[test]
    fn test_boots_at_start_time() {
        let config = ClockConfig {
            start_time: ClockTime::from_hms(12, 34, 56),
            ..ClockConfig::DEFAULT
        };
        let state = ClockState::new(&config);
        assert_eq!(state.now(), ClockTime::from_hms(12, 34, 56));
        assert_eq!(state.mode(), Mode::Normal);
        assert_eq!(state.counter(), 0);
        assert!(!state.alarm_asserted());
    }

    #[test]
    fn test_tick_advances_and_updates() {
        let mut state = ClockState::default();
        let effects = state.handle(Event::Tick);
        assert_eq!(state.now().as_secs(), 1);
        assert_eq!(effects.render, Render::Update);
        assert_eq!(effects.alarm, AlarmEdge::None);
    }

    #[test]
    fn test_alarm_window_scenario() {
        let mut state = ClockState::default();
        state.set_slot(0, ClockTime::from_secs(5));

        let effects = ticks(&mut state, 4);
        assert_eq!(effects.alarm, AlarmEdge::None);
        assert!(!state.alarm_asserted());

        let effects = state.handle(Event::Tick);
        assert_eq!(state.now().as_secs(), 5);
        assert_eq!(effects.alarm, AlarmEdge::Rising);
        assert!(state.alarm_asserted());

        ticks(&mut state, 25);
        assert_eq!(state.now().as_secs(), 30);
        assert!(state.alarm_asserted());

        let effects = ticks(&mut state, 4);
        assert_eq!(state.now().as_secs(), 34);
        assert_eq!(effects.alarm, AlarmEdge::None);
        assert!(state.alarm_asserted());

        let effects = state.handle(Event::Tick);
        assert_eq!(state.now().as_secs(), 35);
        assert_eq!(effects.alarm, AlarmEdge::Falling);
        assert!(!state.alarm_asserted());
    }

    #[test]
    fn test_second_match_extends_window() {
        let mut state = ClockState::default();
        state.set_slot(0, ClockTime::from_secs(5));
        state.set_slot(1, ClockTime::from_secs(20));

        ticks(&mut state, 5);
        let effects = ticks(&mut state, 15);
        // Already asserted, so no second rising edge
        assert_eq!(effects.alarm, AlarmEdge::None);

        ticks(&mut state, 29);
        assert_eq!(state.now().as_secs(), 49);
        assert!(state.alarm_asserted());

        let effects = state.handle(Event::Tick);
        assert_eq!(effects.alarm, AlarmEdge::Falling);
    }

    #[test]
    fn test_custom_alarm_window() {
        let config = ClockConfig {
            alarm_window_secs: 3,
            ..ClockConfig::DEFAULT
        };
        let mut state = ClockState::new(&config);
        state.set_slot(4, ClockTime::from_secs(2));
        ticks(&mut state, 4);
        assert!(state.alarm_asserted());
        ticks(&mut state, 1);
        assert!(!state.alarm_asserted());
    }

    #[test]
    fn test_mode_button_cycles_counter() {
        let mut state = ClockState::default();
        for expected in 1..=10 {
            let effects = state.handle(Event::ButtonA);
            assert_eq!(effects.render, Render::Redraw);
            assert_eq!(state.counter(), expected);
            assert_eq!(state.mode(), Mode::SchedulingEntry);
        }

        state.handle(Event::ButtonA);
        assert_eq!(state.counter(), 0);
        assert!(!state.is_scheduling());
        assert_eq!(state.mode(), Mode::Normal);
    }

    #[test]
    fn test_scheduling_view_and_quiet_ticks() {
        let mut state = ClockState::default();
        state.set_slot(2, ClockTime::from_hms(7, 30, 0));
        state.handle(Event::ButtonA);
        state.handle(Event::ButtonA);
        state.handle(Event::ButtonA);

        assert_eq!(
            state.view(),
            View::Slot {
                index: 2,
                time: ClockTime::from_hms(7, 30, 0)
            }
        );

        // The live clock keeps running but the display is left alone
        let effects = state.handle(Event::Tick);
        assert_eq!(effects.render, Render::Skip);
        assert_eq!(state.now().as_secs(), 1);
    }

    #[test]
    fn test_fast_forward_scenario() {
        let mut state = ClockState::default();

        let effects = state.handle(Event::ButtonB);
        assert_eq!(effects.render, Render::Redraw);
        assert_eq!(state.mode(), Mode::FastForwarding);
        assert_eq!(state.now().as_secs(), 1);

        for _ in 0..3 {
            state.handle(Event::ButtonBHeld);
        }
        assert_eq!(state.now().as_secs(), 181);

        let effects = state.handle(Event::ButtonBReleased);
        assert_eq!(effects.render, Render::Redraw);
        assert_eq!(state.mode(), Mode::Normal);

        // A stale repeat after release adds nothing
        let effects = state.handle(Event::ButtonBHeld);
        assert_eq!(effects, Effects::NONE);
        assert_eq!(state.now().as_secs(), 181);
    }

    #[test]
    fn test_ticks_suspended_while_fast_forwarding() {
        let mut state = ClockState::default();
        state.set_slot(0, ClockTime::from_secs(1));
        state.handle(Event::ButtonB);

        let effects = state.handle(Event::Tick);
        assert_eq!(state.now().as_secs(), 1);
        assert_eq!(effects.render, Render::Update);
        // The slot matches the live time but no scan runs while held
        assert_eq!(effects.alarm, AlarmEdge::None);
    }

    #[test]
    fn test_bounced_press_is_ignored() {
        let mut state = ClockState::default();
        state.handle(Event::ButtonB);
        let effects = state.handle(Event::ButtonB);
        assert_eq!(effects, Effects::NONE);
        assert_eq!(state.now().as_secs(), 1);
    }

    #[test]
    fn test_fast_forward_sets_selected_slot() {
        let mut state = ClockState::default();
        state.handle(Event::ButtonA);
        state.handle(Event::ButtonA);

        state.handle(Event::ButtonB);
        state.handle(Event::ButtonBHeld);
        state.handle(Event::ButtonBHeld);
        state.handle(Event::ButtonBReleased);

        assert_eq!(state.slot(1), Some(ClockTime::from_secs(121)));
        assert_eq!(state.slot(0), Some(ClockTime::ZERO));
        assert_eq!(state.now(), ClockTime::ZERO);
        assert_eq!(state.mode(), Mode::SchedulingEntry);
    }

    #[test]
    fn test_mode_button_while_fast_forwarding() {
        let mut state = ClockState::default();
        state.handle(Event::ButtonB);
        state.handle(Event::ButtonA);
        assert_eq!(state.mode(), Mode::FastForwarding);

        state.handle(Event::ButtonBHeld);
        assert_eq!(state.slot(0), Some(ClockTime::from_secs(60)));
        assert_eq!(state.now().as_secs(), 1);

        state.handle(Event::ButtonBReleased);
        assert_eq!(state.mode(), Mode::SchedulingEntry);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut state = ClockState::default();
        assert_eq!(state.handle(Event::ButtonBReleased), Effects::NONE);
        assert_eq!(state.mode(), Mode::Normal);
    }

    #[test]
    fn test_reset_time_clears_alarm() {
        let mut state = ClockState::default();
        state.set_slot(0, ClockTime::from_secs(2));
        ticks(&mut state, 2);
        assert!(state.alarm_asserted());

        assert_eq!(state.reset_time(), AlarmEdge::Falling);
        assert_eq!(state.now(), ClockTime::ZERO);
        assert!(!state.alarm_asserted());
        assert_eq!(state.reset_time(), AlarmEdge::None);
    }

    #[test]
    fn test_clock_view_reports_alarm() {
        let mut state = ClockState::default();
        state.set_slot(9, ClockTime::from_secs(1));
        state.handle(Event::Tick);
        assert_eq!(
            state.view(),
            View::Clock {
                time: ClockTime::from_secs(1),
                alarm: true
            }
        );
    }

    fn any_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::Tick),
            Just(Event::ButtonA),
            Just(Event::ButtonB),
            Just(Event::ButtonBHeld),
            Just(Event::ButtonBReleased),
        ]
    }

    proptest! {
        #[test]
        fn prop_ticks_add_one_second_each(n in 0u32..500) {
            let mut state = ClockState::default();
            ticks(&mut state, n);
            prop_assert_eq!(state.now().as_secs(), n);
        }

        #[test]
        fn prop_counter_stays_in_range(events in proptest::collection::vec(any_event(), 0..200)) {
            let mut state = ClockState::default();
            for event in events {
                state.handle(event);
                prop_assert!(state.counter() <= MAX_COUNTER);
                match state.mode() {
                    Mode::SchedulingEntry => prop_assert!(state.is_scheduling()),
                    Mode::Normal => prop_assert!(!state.is_scheduling()),
                    Mode::FastForwarding => {}
                }
            }
        }

        #[test]
        fn prop_counter_counts_presses(presses in 0usize..50) {
            let mut state = ClockState::default();
            for _ in 0..presses {
                state.handle(Event::ButtonA);
            }
            prop_assert_eq!(usize::from(state.counter()), presses % 11);
        }

        #[test]
        fn prop_held_adds_a_minute_per_unit(units in 0u32..100) {
            let mut state = ClockState::default();
            state.handle(Event::ButtonB);
            for _ in 0..units {
                state.handle(Event::ButtonBHeld);
            }
            state.handle(Event::ButtonBReleased);
            state.handle(Event::ButtonBHeld);
            prop_assert_eq!(state.now().as_secs(), 1 + 60 * units);
        }

        #[test]
        fn prop_time_never_decreases(events in proptest::collection::vec(any_event(), 0..200)) {
            let mut state = ClockState::default();
            let mut last = state.now();
            for event in events {
                state.handle(event);
                prop_assert!(state.now() >= last);
                last = state.now();
            }
        }
    }
}
