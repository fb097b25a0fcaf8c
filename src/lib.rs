//! Draw RGB images in a text terminal.
//!
//! `tir` keeps an RGB framebuffer at twice the terminal's resolution in each direction and
//! draws every terminal cell as the Unicode block glyph (full, half or quarter block) plus
//! foreground/background color pair that best approximates the cell's pixels.
//!
//! # Example
//!
//! ```rust ,no_run
//! use std::sync::Arc;
//! use tir::rendering::color::Color;
//! use tir::{install_panic_handler, CrosstermTerminal, EventPump, Surface};
//!
//! fn draw(surface: &Surface<CrosstermTerminal>) {
//!     let pixels = surface.lock_for_read();
//!     for y in 0..pixels.height() {
//!         for x in 0..pixels.width() {
//!             pixels.set_pixel(x, y, Color::new((x * 4) as u8, (y * 8) as u8, 128));
//!         }
//!     }
//!     pixels.refresh();
//! }
//!
//! let surface = Arc::new(Surface::new(CrosstermTerminal::new()));
//! surface.init().unwrap();
//! install_panic_handler();
//!
//! surface.set_resize_callback(draw);
//! draw(&surface);
//!
//! let pump = EventPump::spawn(surface.clone());
//! while !pump.interrupted() {
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! pump.stop();
//! surface.shutdown().unwrap();
//! ```

pub mod error;
pub mod events;
pub mod rendering;
pub mod surface;
pub mod terminal;

pub use crate::error::{Error, Result};
pub use crate::events::EventPump;
pub use crate::surface::{Lifecycle, ReadGuard, Surface};
pub use crate::terminal::{CrosstermTerminal, HeadlessTerminal, Terminal};

/// Installs a panic handler that restores the terminal before the panic message is printed.
///
/// Without it the message would be printed in raw mode, on top of the last frame.
pub fn install_panic_handler() {
    let old_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |pinfo| {
        if let Err(err) = terminal::restore_terminal() {
            eprintln!("failed to restore terminal: {err}");
        }
        old_hook(pinfo);
    }));
}
