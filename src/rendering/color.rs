//! Color representation for the pixel buffer.
//!
//! [`Color`] is the plain value type callers draw with. [`AtomicColor`] is the slot a
//! [`PixelBuffer`] stores it in, so that several threads holding shared access to the
//! buffer can draw and render at the same time without ever observing half of a pixel.
//!
//! [`PixelBuffer`]: crate::rendering::buffer::PixelBuffer

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A 24-bit RGB color.
///
/// The default color is black.
///
/// ```rust
/// use tir::rendering::color::Color;
///
/// let red = Color::new(255, 0, 0);
/// assert_eq!(red, Color::from([255, 0, 0]));
/// assert_eq!(<[u8; 3]>::from(red), [255, 0, 0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels in `[r, g, b]` order.
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    const fn pack(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    const fn unpack(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.channels()
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

/// A pixel slot that can be read and written through a shared reference.
///
/// All three channels live in one atomic word, so a concurrent reader sees either the
/// old or the new color, never a mix. Ordering between a drawing pass and a refresh is
/// provided by the surface lock, which is why `Relaxed` is enough here.
#[derive(Default)]
pub struct AtomicColor(AtomicU32);

impl AtomicColor {
    pub fn new(color: Color) -> Self {
        Self(AtomicU32::new(color.pack()))
    }

    /// Reads the current color.
    pub fn load(&self) -> Color {
        Color::unpack(self.0.load(Ordering::Relaxed))
    }

    /// Overwrites the color.
    pub fn store(&self, color: Color) {
        self.0.store(color.pack(), Ordering::Relaxed);
    }
}

impl Clone for AtomicColor {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl fmt::Debug for AtomicColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicColor").field(&self.load()).finish()
    }
}

impl From<Color> for AtomicColor {
    fn from(color: Color) -> Self {
        Self::new(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_color_keeps_every_channel() {
        let slot = AtomicColor::default();
        assert_eq!(slot.load(), Color::BLACK);

        slot.store(Color::new(1, 128, 255));
        assert_eq!(slot.load(), Color::new(1, 128, 255));

        let copy = slot.clone();
        slot.store(Color::WHITE);
        assert_eq!(copy.load(), Color::new(1, 128, 255));
    }

    #[test]
    fn test_crossterm_conversion() {
        let color: crossterm::style::Color = Color::new(10, 20, 30).into();
        assert_eq!(
            color,
            crossterm::style::Color::Rgb {
                r: 10,
                g: 20,
                b: 30
            }
        );
    }
}
