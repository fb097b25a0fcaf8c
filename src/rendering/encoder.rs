//! Whole-frame serialization.
//!
//! A frame is the cursor-home sequence followed by every cell in row-major order, each as
//! a 24-bit foreground color, a 24-bit background color and the selected glyph. Rows are
//! separated by `\n\r`. Nothing is diffed against the previous frame: every refresh
//! redraws the whole screen.

use crate::rendering::buffer::PixelBuffer;
use crate::rendering::loss::{CellFit, LossEngine};
use crate::terminal::{CursorHome, SetRgbBackground, SetRgbForeground};
use crossterm::queue;
use crossterm::style::Print;
use std::io;
use std::io::Write;

const ROW_SEPARATOR: &str = "\n\r";

/// Rough upper bound of bytes per cell: two `ESC[x8;2;RRR;GGG;BBBm` plus a 3-byte glyph.
const BYTES_PER_CELL: usize = 2 * 19 + 3;

/// Turns a [`PixelBuffer`] into terminal output.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameEncoder {
    engine: LossEngine,
}

impl FrameEncoder {
    pub fn new(engine: LossEngine) -> Self {
        Self { engine }
    }

    /// Fits every cell of `buffer`, row by row.
    pub fn fit_cells<'a>(
        &'a self,
        buffer: &'a PixelBuffer,
    ) -> impl Iterator<Item = (usize, usize, CellFit)> + 'a {
        let (cell_width, cell_height) = buffer.extent_in_cells();
        (0..cell_height).flat_map(move |cy| {
            (0..cell_width).map(move |cx| {
                let block = buffer.cell_block(cx, cy);
                (cx, cy, self.engine.select(&block))
            })
        })
    }

    /// Serializes one frame. An unallocated buffer yields no bytes at all.
    pub fn encode(&self, buffer: &PixelBuffer) -> io::Result<Vec<u8>> {
        let (cell_width, cell_height) = buffer.extent_in_cells();
        if !buffer.is_allocated() || cell_width == 0 || cell_height == 0 {
            return Ok(Vec::new());
        }

        let mut frame = Vec::with_capacity(cell_width * cell_height * BYTES_PER_CELL);
        queue!(frame, CursorHome)?;
        for (cx, cy, fit) in self.fit_cells(buffer) {
            if cx == 0 && cy > 0 {
                queue!(frame, Print(ROW_SEPARATOR))?;
            }
            queue!(
                frame,
                SetRgbForeground(fit.fg),
                SetRgbBackground(fit.bg),
                Print(fit.glyph.glyph)
            )?;
        }
        Ok(frame)
    }

    /// Serializes one frame and hands it to `sink` in a single write.
    ///
    /// Returns the number of bytes written.
    pub fn write_frame(&self, buffer: &PixelBuffer, sink: &mut impl Write) -> io::Result<usize> {
        let frame = self.encode(buffer)?;
        if frame.is_empty() {
            return Ok(0);
        }
        sink.write_all(&frame)?;
        sink.flush()?;
        Ok(frame.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::Color;
    use crate::rendering::glyph::FULL_BLOCKS;

    const WHITE_CELL: &str = "\x1b[38;2;255;255;255m\x1b[48;2;255;255;255m█";

    fn encode_str(encoder: &FrameEncoder, buffer: &PixelBuffer) -> String {
        String::from_utf8(encoder.encode(buffer).unwrap()).unwrap()
    }

    #[test]
    fn test_single_row_frame() {
        let buffer = PixelBuffer::with_cells(2, 1);
        buffer.fill(Color::WHITE);
        let frame = encode_str(&FrameEncoder::default(), &buffer);
        assert_eq!(frame, format!("\x1b[H{WHITE_CELL}{WHITE_CELL}"));
        assert!(!frame.contains(ROW_SEPARATOR));
    }

    #[test]
    fn test_rows_are_separated_not_terminated() {
        let buffer = PixelBuffer::with_cells(1, 3);
        buffer.fill(Color::WHITE);
        let frame = encode_str(&FrameEncoder::default(), &buffer);
        assert_eq!(
            frame,
            format!("\x1b[H{WHITE_CELL}\n\r{WHITE_CELL}\n\r{WHITE_CELL}")
        );
    }

    #[test]
    fn test_cell_colors_and_glyph() {
        let buffer = PixelBuffer::with_cells(1, 1);
        buffer.set(0, 0, Color::new(255, 0, 0));
        buffer.set(0, 1, Color::new(255, 0, 0));
        buffer.set(1, 0, Color::new(0, 0, 255));
        buffer.set(1, 1, Color::new(0, 0, 255));
        let frame = encode_str(&FrameEncoder::default(), &buffer);
        assert_eq!(frame, "\x1b[H\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m▌");
    }

    #[test]
    fn test_palette_is_respected() {
        let buffer = PixelBuffer::with_cells(1, 1);
        buffer.set(0, 0, Color::WHITE);
        let encoder = FrameEncoder::new(LossEngine::new(&FULL_BLOCKS));
        let frame = encode_str(&encoder, &buffer);
        assert!(frame.ends_with('█'));
    }

    #[test]
    fn test_unallocated_buffer_renders_nothing() {
        let encoder = FrameEncoder::default();
        assert!(encoder.encode(&PixelBuffer::new()).unwrap().is_empty());

        let mut sink: Vec<u8> = Vec::new();
        assert_eq!(encoder.write_frame(&PixelBuffer::new(), &mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_write_frame_matches_encode() {
        let buffer = PixelBuffer::with_cells(3, 2);
        buffer.set(1, 1, Color::new(9, 8, 7));
        let encoder = FrameEncoder::default();
        let mut sink: Vec<u8> = Vec::new();
        let written = encoder.write_frame(&buffer, &mut sink).unwrap();
        assert_eq!(written, sink.len());
        assert_eq!(sink, encoder.encode(&buffer).unwrap());
    }
}
