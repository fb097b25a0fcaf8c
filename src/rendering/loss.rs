//! Glyph selection.
//!
//! For one cell, every glyph mask in a palette splits the cell's supersamples into a
//! foreground and a background side. Each side is painted with its mean color, and the
//! mask is scored by the L1 distance between the real samples and the color painted over
//! them. The cheapest mask wins; on a tie the earlier palette entry wins.
//!
//! This is a two-cluster quantization where the palette enumerates the allowed cluster
//! shapes, so the cost per cell is `palette.len() * SAMPLES_PER_CELL` with no iteration.

use crate::rendering::buffer::CellBlock;
use crate::rendering::color::Color;
use crate::rendering::glyph::{DEFAULT_PALETTE, GlyphMask, SUP_SAMP_HOR, SUP_SAMP_VER};

/// The chosen glyph and colors for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFit {
    pub glyph: &'static GlyphMask,
    pub fg: Color,
    pub bg: Color,
    /// Sum of absolute channel differences over all supersamples.
    pub loss: u32,
}

#[derive(Default, Clone, Copy)]
struct ChannelSum {
    sum: [u32; 3],
    count: u32,
}

impl ChannelSum {
    fn add(&mut self, color: Color) {
        for (acc, channel) in self.sum.iter_mut().zip(color.channels()) {
            *acc += channel as u32;
        }
        self.count += 1;
    }

    /// Truncating per-channel mean, `None` for an empty side.
    fn mean(&self) -> Option<Color> {
        if self.count == 0 {
            return None;
        }
        let [r, g, b] = self.sum.map(|s| (s / self.count) as u8);
        Some(Color::new(r, g, b))
    }
}

fn distance(a: Color, b: Color) -> u32 {
    a.channels()
        .iter()
        .zip(b.channels())
        .map(|(&x, y)| x.abs_diff(y) as u32)
        .sum()
}

/// Picks the best glyph of a palette for a block of supersamples.
#[derive(Clone, Copy, Debug)]
pub struct LossEngine {
    palette: &'static [GlyphMask],
}

impl Default for LossEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE)
    }
}

impl LossEngine {
    /// Creates an engine searching `palette` in order.
    ///
    /// An empty palette falls back to the default one.
    pub fn new(palette: &'static [GlyphMask]) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE
        } else {
            palette
        };
        Self { palette }
    }

    pub fn palette(&self) -> &'static [GlyphMask] {
        self.palette
    }

    /// Best colors and loss for painting `block` with `mask`.
    ///
    /// A side that no supersample falls on is painted with the other side's color. It is
    /// never visible and contributes nothing to the loss, and it keeps a uniform cell
    /// drawn in one color on both layers.
    pub fn fit(&self, block: &CellBlock, mask: &'static GlyphMask) -> CellFit {
        let mut fg_sum = ChannelSum::default();
        let mut bg_sum = ChannelSum::default();
        for sy in 0..SUP_SAMP_VER {
            for sx in 0..SUP_SAMP_HOR {
                let sample = block[sy * SUP_SAMP_HOR + sx];
                if mask.covers(sx, sy) {
                    fg_sum.add(sample);
                } else {
                    bg_sum.add(sample);
                }
            }
        }

        let (fg, bg) = match (fg_sum.mean(), bg_sum.mean()) {
            (Some(fg), Some(bg)) => (fg, bg),
            (Some(only), None) | (None, Some(only)) => (only, only),
            (None, None) => (Color::BLACK, Color::BLACK),
        };

        let mut loss = 0;
        for sy in 0..SUP_SAMP_VER {
            for sx in 0..SUP_SAMP_HOR {
                let painted = if mask.covers(sx, sy) { fg } else { bg };
                loss += distance(block[sy * SUP_SAMP_HOR + sx], painted);
            }
        }

        CellFit {
            glyph: mask,
            fg,
            bg,
            loss,
        }
    }

    /// The lowest-loss fit over the whole palette. Ties keep the earliest entry.
    pub fn select(&self, block: &CellBlock) -> CellFit {
        let mut best = self.fit(block, &self.palette[0]);
        for mask in self.palette[1..].iter() {
            if best.loss == 0 {
                break;
            }
            let candidate = self.fit(block, mask);
            if candidate.loss < best.loss {
                best = candidate;
            }
        }
        best
    }
}
