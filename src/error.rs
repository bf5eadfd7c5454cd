//! Init failures that stop the firmware

use clock_core::ConfigError;

/// Anything that keeps the clock from starting
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum FatalError {
    /// Baked-in configuration failed validation
    Config(ConfigError),
    /// Crystal oscillator or PLL setup failed
    Clocks,
    /// A hardware alarm was unavailable or could not be armed
    Timer,
    /// The MAX7219 chain did not accept its setup commands
    Display,
}

impl From<ConfigError> for FatalError {
    fn from(err: ConfigError) -> Self {
        FatalError::Config(err)
    }
}

impl From<max7219::DataError> for FatalError {
    fn from(_: max7219::DataError) -> Self {
        FatalError::Display
    }
}

/// Reports `err` over RTT and halts through panic-probe.
pub fn fatal(err: FatalError) -> ! {
    defmt::panic!("fatal init error: {}", err)
}
