//! Turning pixels into terminal output.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): [`Color`](color::Color) and its shared slot [`AtomicColor`](color::AtomicColor).
//! *   [`display`](crate::rendering::display): [`Display`](display::Display), a generic row-major 2D grid.
//! *   [`buffer`](crate::rendering::buffer): [`PixelBuffer`](buffer::PixelBuffer), the supersampled framebuffer.
//! *   [`glyph`](crate::rendering::glyph): the block glyphs, their masks and the supersampling factors.
//! *   [`loss`](crate::rendering::loss): [`LossEngine`](loss::LossEngine), which picks a glyph and two colors per cell.
//! *   [`encoder`](crate::rendering::encoder): [`FrameEncoder`](encoder::FrameEncoder), which serializes a frame.
//!
//! **Rendering a frame:**
//!
//! 1.  Each terminal cell covers `SUP_SAMP_HOR` x `SUP_SAMP_VER` pixels of the buffer.
//! 2.  For every cell, each glyph of the palette is tried: its mask splits the cell's pixels in
//!     two, each side gets its mean color, and the glyph with the least color error wins.
//! 3.  The encoder writes the winning glyph of every cell with its foreground and background
//!     colors as 24-bit escape sequences, and the whole frame leaves in one write.

pub mod buffer;
pub mod color;
pub mod display;
pub mod encoder;
pub mod glyph;
pub mod loss;
