//! The supersampled pixel buffer.
//!
//! A [`PixelBuffer`] is sized in terminal cells but addressed in supersampled pixels:
//! a terminal of `w` x `h` cells owns `w * SUP_SAMP_HOR` x `h * SUP_SAMP_VER` pixels.
//! Pixels are [`AtomicColor`] slots, so callers holding only shared access can still
//! draw.

use crate::rendering::color::{AtomicColor, Color};
use crate::rendering::display::Display;
use crate::rendering::glyph::{SAMPLES_PER_CELL, SUP_SAMP_HOR, SUP_SAMP_VER};

/// The supersampled pixels of one terminal cell, row-major.
pub type CellBlock = [Color; SAMPLES_PER_CELL];

/// RGB pixels at supersampled resolution, sized from the terminal's cell grid.
#[derive(Debug, Default)]
pub struct PixelBuffer {
    cell_width: usize,
    cell_height: usize,
    pixels: Display<AtomicColor>,
}

impl PixelBuffer {
    /// Creates an empty buffer with no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a black buffer for a terminal of `cell_width` x `cell_height` cells.
    pub fn with_cells(cell_width: usize, cell_height: usize) -> Self {
        let mut buffer = Self::new();
        buffer.resize(cell_width, cell_height);
        buffer
    }

    /// Reallocates for a new cell grid, discarding all pixels.
    ///
    /// Returns `false` without touching the contents when the grid is unchanged.
    /// Running out of memory here aborts: there is no display without a framebuffer.
    pub fn resize(&mut self, cell_width: usize, cell_height: usize) -> bool {
        if (cell_width, cell_height) == (self.cell_width, self.cell_height) {
            return false;
        }
        self.cell_width = cell_width;
        self.cell_height = cell_height;
        self.pixels = Display::new(
            cell_width * SUP_SAMP_HOR,
            cell_height * SUP_SAMP_VER,
            AtomicColor::default(),
        );
        true
    }

    /// Frees the storage. The buffer is 0 x 0 cells afterwards.
    pub fn release(&mut self) {
        self.cell_width = 0;
        self.cell_height = 0;
        self.pixels = Display::default();
    }

    /// Whether storage is currently allocated.
    pub fn is_allocated(&self) -> bool {
        !self.pixels.is_empty()
    }

    /// The terminal grid this buffer was sized for, in cells.
    pub fn extent_in_cells(&self) -> (usize, usize) {
        (self.cell_width, self.cell_height)
    }

    /// Width in supersampled pixels.
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Height in supersampled pixels.
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// The live pixel slot at `(x, y)`, or `None` outside `[0, width) x [0, height)`.
    pub fn get(&self, x: usize, y: usize) -> Option<&AtomicColor> {
        self.pixels.get(x, y)
    }

    /// Reads the pixel at `(x, y)`.
    pub fn load(&self, x: usize, y: usize) -> Option<Color> {
        self.get(x, y).map(AtomicColor::load)
    }

    /// Writes the pixel at `(x, y)`. Returns `false` if it is out of bounds.
    pub fn set(&self, x: usize, y: usize, color: Color) -> bool {
        match self.get(x, y) {
            Some(pixel) => {
                pixel.store(color);
                true
            }
            None => false,
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&self, color: Color) {
        for (_, _, pixel) in self.pixels.iter() {
            pixel.store(color);
        }
    }

    /// Copies out the supersamples of cell `(cx, cy)`.
    ///
    /// Samples of a cell outside the grid read as black.
    pub fn cell_block(&self, cx: usize, cy: usize) -> CellBlock {
        let mut block = [Color::BLACK; SAMPLES_PER_CELL];
        let start = cx * SUP_SAMP_HOR;
        for sy in 0..SUP_SAMP_VER {
            let samples = self
                .pixels
                .row(cy * SUP_SAMP_VER + sy)
                .and_then(|row| row.get(start..start + SUP_SAMP_HOR));
            for (sx, sample) in samples.into_iter().flatten().enumerate() {
                block[sy * SUP_SAMP_HOR + sx] = sample.load();
            }
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supersampled_extent() {
        let buffer = PixelBuffer::with_cells(3, 2);
        assert_eq!(buffer.extent_in_cells(), (3, 2));
        assert_eq!(buffer.width(), 3 * SUP_SAMP_HOR);
        assert_eq!(buffer.height(), 2 * SUP_SAMP_VER);
        assert!(buffer.is_allocated());
    }

    #[test]
    fn test_out_of_range_is_absent() {
        let buffer = PixelBuffer::with_cells(2, 2);
        let (w, h) = (buffer.width(), buffer.height());
        for y in 0..h + 2 {
            for x in 0..w + 2 {
                assert_eq!(buffer.get(x, y).is_some(), x < w && y < h, "({x}, {y})");
            }
        }
        assert!(!buffer.set(w, 0, Color::WHITE));
        assert!(PixelBuffer::new().get(0, 0).is_none());
    }

    #[test]
    fn test_writes_are_visible() {
        let buffer = PixelBuffer::with_cells(2, 1);
        buffer.get(3, 1).unwrap().store(Color::new(1, 2, 3));
        assert_eq!(buffer.load(3, 1), Some(Color::new(1, 2, 3)));
    }

    #[test]
    fn test_resize_unchanged_keeps_contents() {
        let mut buffer = PixelBuffer::with_cells(2, 2);
        buffer.fill(Color::WHITE);
        assert!(!buffer.resize(2, 2));
        assert_eq!(buffer.load(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buffer = PixelBuffer::with_cells(2, 2);
        buffer.fill(Color::WHITE);
        assert!(buffer.resize(5, 1));
        assert_eq!(buffer.width(), 5 * SUP_SAMP_HOR);
        assert_eq!(buffer.height(), SUP_SAMP_VER);
        assert_eq!(buffer.extent_in_cells(), (5, 1));

        buffer.release();
        assert!(!buffer.is_allocated());
        assert_eq!(buffer.extent_in_cells(), (0, 0));
    }

    #[test]
    fn test_cell_block_is_row_major() {
        let buffer = PixelBuffer::with_cells(2, 1);
        buffer.set(2, 0, Color::new(1, 0, 0));
        buffer.set(3, 0, Color::new(2, 0, 0));
        buffer.set(2, 1, Color::new(3, 0, 0));
        buffer.set(3, 1, Color::new(4, 0, 0));
        let block = buffer.cell_block(1, 0);
        let reds: Vec<u8> = block.iter().map(|c| c.r).collect();
        assert_eq!(reds, vec![1, 2, 3, 4]);
        assert_eq!(buffer.cell_block(2, 0), [Color::BLACK; SAMPLES_PER_CELL]);
    }
}
