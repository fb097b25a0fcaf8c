//! Block glyphs and the masks they paint.
//!
//! Every terminal cell covers a block of `SUP_SAMP_HOR` x `SUP_SAMP_VER` supersampled
//! pixels. A [`GlyphMask`] says which of those pixels a glyph paints with its foreground
//! color; the rest show the background color.
//!
//! Masks may be coarser than the supersample grid (the full block is a single bit, the
//! half blocks are two). Each mask dimension must divide the matching supersampling
//! factor so that the nearest-neighbour mapping in [`GlyphMask::covers`] hits every
//! mask bit equally often; this is checked at compile time for the built-in palettes.

/// Horizontal supersampling factor: pixels per terminal column.
pub const SUP_SAMP_HOR: usize = 2;
/// Vertical supersampling factor: pixels per terminal row.
pub const SUP_SAMP_VER: usize = 2;
/// Supersampled pixels per terminal cell.
pub const SAMPLES_PER_CELL: usize = SUP_SAMP_HOR * SUP_SAMP_VER;

/// A displayable block glyph and the foreground region it covers.
#[derive(Debug, PartialEq, Eq)]
pub struct GlyphMask {
    /// The character printed for this mask.
    pub glyph: char,
    /// Mask columns.
    pub cols: usize,
    /// Mask rows.
    pub rows: usize,
    /// `rows * cols` bits in row-major order; `true` is foreground.
    pub bits: &'static [bool],
}

impl GlyphMask {
    pub const fn new(glyph: char, cols: usize, rows: usize, bits: &'static [bool]) -> Self {
        assert!(bits.len() == cols * rows);
        Self {
            glyph,
            cols,
            rows,
            bits,
        }
    }

    /// Whether the supersample at `(sx, sy)` inside a cell falls on the foreground.
    ///
    /// `sx` and `sy` are relative to the cell, in `0..SUP_SAMP_HOR` and `0..SUP_SAMP_VER`.
    #[inline]
    pub fn covers(&self, sx: usize, sy: usize) -> bool {
        let mx = sx * self.cols / SUP_SAMP_HOR;
        let my = sy * self.rows / SUP_SAMP_VER;
        self.bits[my * self.cols + mx]
    }

    /// Whether this mask maps cleanly onto the supersample grid.
    pub const fn fits_supersampling(&self) -> bool {
        self.cols > 0
            && self.rows > 0
            && self.cols <= SUP_SAMP_HOR
            && self.rows <= SUP_SAMP_VER
            && SUP_SAMP_HOR % self.cols == 0
            && SUP_SAMP_VER % self.rows == 0
    }
}

const fn all_fit(palette: &[GlyphMask]) -> bool {
    let mut i = 0;
    while i < palette.len() {
        if !palette[i].fits_supersampling() {
            return false;
        }
        i += 1;
    }
    true
}

pub const FULL_BLOCK: GlyphMask = GlyphMask::new('█', 1, 1, &[true]);
pub const LEFT_HALF_BLOCK: GlyphMask = GlyphMask::new('▌', 2, 1, &[true, false]);
pub const UPPER_HALF_BLOCK: GlyphMask = GlyphMask::new('▀', 1, 2, &[true, false]);
pub const QUADRANT_UPPER_LEFT: GlyphMask =
    GlyphMask::new('▘', 2, 2, &[true, false, false, false]);
pub const QUADRANT_UPPER_RIGHT: GlyphMask =
    GlyphMask::new('▝', 2, 2, &[false, true, false, false]);
pub const QUADRANT_LOWER_LEFT: GlyphMask =
    GlyphMask::new('▖', 2, 2, &[false, false, true, false]);
pub const QUADRANT_LOWER_RIGHT: GlyphMask =
    GlyphMask::new('▗', 2, 2, &[false, false, false, true]);
pub const QUADRANT_DIAGONAL: GlyphMask = GlyphMask::new('▚', 2, 2, &[true, false, false, true]);

/// Full, half and quarter blocks.
///
/// Swapping foreground and background already yields a mask's complement, so these eight
/// entries reach every split of a 2x2 cell into two regions.
pub static QUARTER_BLOCKS: [GlyphMask; 8] = [
    FULL_BLOCK,
    LEFT_HALF_BLOCK,
    UPPER_HALF_BLOCK,
    QUADRANT_UPPER_LEFT,
    QUADRANT_UPPER_RIGHT,
    QUADRANT_LOWER_LEFT,
    QUADRANT_LOWER_RIGHT,
    QUADRANT_DIAGONAL,
];

/// Full and half blocks only.
pub static HALF_BLOCKS: [GlyphMask; 3] = [FULL_BLOCK, LEFT_HALF_BLOCK, UPPER_HALF_BLOCK];

/// One solid block per cell; the cell is drawn in its average color.
pub static FULL_BLOCKS: [GlyphMask; 1] = [FULL_BLOCK];

/// The palette used unless another one is chosen.
pub static DEFAULT_PALETTE: &[GlyphMask] = &QUARTER_BLOCKS;

const _: () = assert!(all_fit(&QUARTER_BLOCKS));
const _: () = assert!(all_fit(&HALF_BLOCKS));
const _: () = assert!(all_fit(&FULL_BLOCKS));

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// The foreground set of a mask expanded onto the supersample grid, as a bitfield.
    fn expand(mask: &GlyphMask) -> u32 {
        let mut bits = 0;
        for sy in 0..SUP_SAMP_VER {
            for sx in 0..SUP_SAMP_HOR {
                if mask.covers(sx, sy) {
                    bits |= 1 << (sy * SUP_SAMP_HOR + sx);
                }
            }
        }
        bits
    }

    #[test]
    fn test_full_block_covers_everything() {
        assert_eq!(expand(&FULL_BLOCK), (1 << SAMPLES_PER_CELL) - 1);
    }

    #[test]
    fn test_half_blocks_upscale() {
        // left column: samples 0 and 2
        assert_eq!(expand(&LEFT_HALF_BLOCK), 0b0101);
        // top row: samples 0 and 1
        assert_eq!(expand(&UPPER_HALF_BLOCK), 0b0011);
        assert_eq!(expand(&QUADRANT_DIAGONAL), 0b1001);
    }

    #[test]
    fn test_quarter_blocks_cover_every_partition() {
        let all = (1u32 << SAMPLES_PER_CELL) - 1;
        let mut reached = HashSet::new();
        for mask in QUARTER_BLOCKS.iter() {
            let fg = expand(mask);
            // a mask and its complement describe the same split
            reached.insert(fg.min(all ^ fg));
        }
        assert_eq!(reached.len(), 1 << (SAMPLES_PER_CELL - 1));
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let glyphs: HashSet<char> = QUARTER_BLOCKS.iter().map(|m| m.glyph).collect();
        assert_eq!(glyphs.len(), QUARTER_BLOCKS.len());
        assert_eq!(DEFAULT_PALETTE[0], FULL_BLOCK);
    }
}
