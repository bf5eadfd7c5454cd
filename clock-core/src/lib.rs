//! Board-agnostic logic for the alarm clock firmware
//!
//! Everything here builds for the host so it can be unit tested:
//!
//! - Time keeping and `HH:MM:SS` formatting
//! - The ten-slot alarm schedule and its alarm window
//! - The event-driven clock state machine
//! - Hold detection for the advance button
//! - Configuration defaults and validation
//! - The LED matrix framebuffer and font

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod button;
pub mod config;
pub mod controller;
pub mod event;
pub mod face;
pub mod matrix;
pub mod schedule;
pub mod time;

pub use button::HoldPoller;
pub use config::{ClockConfig, ConfigError};
pub use controller::{AlarmEdge, ClockState, Effects, Mode, Render, View};
pub use event::Event;
pub use face::ClockFace;
pub use schedule::{AlarmWindow, ScheduleTable, SLOT_COUNT};
pub use time::ClockTime;
