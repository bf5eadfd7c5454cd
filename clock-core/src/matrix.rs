//! Framebuffer for a chain of four 8x8 LED matrices
//!
//! The chain forms a 32x8 pixel strip. `HH:MM:SS` takes 31 columns at a
//! 4 column pitch; the last column is an indicator: a full bar while the
//! alarm is asserted, or the slot number in binary while a slot is edited.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use crate::controller::View;

pub const DEVICES: usize = 4;
pub const WIDTH: usize = DEVICES * 8;
pub const HEIGHT: usize = 8;

pub const GLYPH_WIDTH: usize = 3;
/// Glyph width plus one blank column
pub const GLYPH_PITCH: usize = GLYPH_WIDTH + 1;
pub const INDICATOR_COLUMN: usize = WIDTH - 1;

/// One row per byte, low three bits used, bit 2 is the left column
pub type Glyph = [u8; HEIGHT];

#[rustfmt::skip]
const DIGITS: [Glyph; 10] = [
    [0, 0, 0b111, 0b101, 0b101, 0b101, 0b111, 0],
    [0, 0, 0b010, 0b110, 0b010, 0b010, 0b111, 0],
    [0, 0, 0b111, 0b001, 0b111, 0b100, 0b111, 0],
    [0, 0, 0b111, 0b001, 0b111, 0b001, 0b111, 0],
    [0, 0, 0b101, 0b101, 0b111, 0b001, 0b001, 0],
    [0, 0, 0b111, 0b100, 0b111, 0b001, 0b111, 0],
    [0, 0, 0b111, 0b100, 0b111, 0b101, 0b111, 0],
    [0, 0, 0b111, 0b001, 0b001, 0b001, 0b001, 0],
    [0, 0, 0b111, 0b101, 0b111, 0b101, 0b111, 0],
    [0, 0, 0b111, 0b101, 0b111, 0b001, 0b111, 0],
];

const COLON: Glyph = [0, 0, 0, 0b010, 0, 0b010, 0, 0];

pub fn glyph(c: char) -> Option<&'static Glyph> {
    match c {
        ':' => Some(&COLON),
        _ => c.to_digit(10).map(|d| &DIGITS[d as usize]),
    }
}

/// Row bytes for every device in the chain
pub type DeviceRows = [[u8; HEIGHT]; DEVICES];

/// Devices whose rows differ between `shown` and `next`, or all of them on `redraw`.
pub fn stale_devices(shown: &DeviceRows, next: &DeviceRows, redraw: bool) -> [bool; DEVICES] {
    let mut stale = [redraw; DEVICES];
    for (flag, (old, new)) in stale.iter_mut().zip(shown.iter().zip(next.iter())) {
        *flag |= old != new;
    }
    stale
}

/// Row-major pixel store, bit 31 of each row is column 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Framebuffer {
    rows: [u32; HEIGHT],
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self { rows: [0; HEIGHT] }
    }

    /// Renders a full view into a fresh framebuffer.
    pub fn compose(view: &View) -> Self {
        let mut fb = Self::new();
        match fb.paint(view) {
            Ok(()) => fb,
            Err(never) => match never {},
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.rows[y] & Self::mask(x) != 0
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        if on {
            self.rows[y] |= Self::mask(x);
        } else {
            self.rows[y] &= !Self::mask(x);
        }
    }

    /// Splits the strip into per-device row bytes, device 0 leftmost (FC16 wiring).
    pub fn device_rows(&self) -> DeviceRows {
        let mut out: DeviceRows = [[0; HEIGHT]; DEVICES];
        for (dev, rows) in out.iter_mut().enumerate() {
            let shift = (DEVICES - 1 - dev) * 8;
            for (byte, row) in rows.iter_mut().zip(self.rows.iter()) {
                *byte = (*row >> shift) as u8;
            }
        }
        out
    }

    fn mask(x: usize) -> u32 {
        1 << (WIDTH - 1 - x)
    }

    fn paint(&mut self, view: &View) -> Result<(), Infallible> {
        match *view {
            View::Clock { time, alarm } => {
                self.draw_text(time.text().as_str())?;
                if alarm {
                    let top = Point::new(INDICATOR_COLUMN as i32, 0);
                    let bottom = Point::new(INDICATOR_COLUMN as i32, HEIGHT as i32 - 1);
                    Line::new(top, bottom)
                        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                        .draw(self)?;
                }
            }
            View::Slot { index, time } => {
                self.draw_text(time.text().as_str())?;
                let number = index.saturating_add(1);
                // Four bits, least significant at the bottom row
                for bit in 0..4 {
                    self.set_pixel(INDICATOR_COLUMN, HEIGHT - 1 - bit, number & (1 << bit) != 0);
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str) -> Result<(), Infallible> {
        for (i, c) in text.chars().enumerate() {
            if let Some(glyph) = glyph(c) {
                self.draw_glyph(glyph, (i * GLYPH_PITCH) as i32)?;
            }
        }
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &Glyph, x: i32) -> Result<(), Infallible> {
        let pixels = glyph.iter().enumerate().flat_map(move |(row, &bits)| {
            (0..GLYPH_WIDTH)
                .filter(move |col| bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0)
                .map(move |col| Pixel(Point::new(x + col as i32, row as i32), BinaryColor::On))
        });
        self.draw_iter(pixels)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
