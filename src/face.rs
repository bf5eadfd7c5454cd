//! MAX7219 matrix chain as a clock face

use clock_core::matrix::{stale_devices, DeviceRows, Framebuffer, DEVICES, HEIGHT};
use clock_core::{ClockFace, View};
use max7219::connectors::Connector;
use max7219::{DataError, MAX7219};

pub struct MatrixFace<C> {
    display: MAX7219<C>,
    /// Rows last written to each device
    shown: DeviceRows,
}

impl<C: Connector> MatrixFace<C> {
    /// Powers the chain on, sets brightness and blanks every device.
    pub fn new(mut display: MAX7219<C>, intensity: u8) -> Result<Self, DataError> {
        display.power_on()?;
        for dev in 0..DEVICES {
            display.set_intensity(dev, intensity)?;
            display.clear_display(dev)?;
        }
        Ok(Self {
            display,
            shown: [[0; HEIGHT]; DEVICES],
        })
    }
}

impl<C: Connector> ClockFace for MatrixFace<C> {
    type Error = DataError;

    fn render(&mut self, view: View, redraw: bool) -> Result<(), DataError> {
        let next = Framebuffer::compose(&view).device_rows();
        let stale = stale_devices(&self.shown, &next, redraw);
        for (dev, rows) in next.iter().enumerate().filter(|&(dev, _)| stale[dev]) {
            self.display.write_raw(dev, rows)?;
            self.shown[dev] = *rows;
        }
        Ok(())
    }
}
