//! The drawing surface.
//!
//! A [`Surface`] owns the pixel buffer, the terminal it renders to and the resize
//! callback. It is meant to be shared (usually in an `Arc`) between the thread that draws
//! and the thread that delivers terminal notifications (see [`EventPump`]).
//!
//! # Locking
//!
//! The buffer sits behind one reader/writer lock:
//!
//! *   Drawing passes and refreshes take it shared, through [`Surface::lock_for_read`] or
//!     internally in [`Surface::refresh`]. Any number of them may run at once.
//! *   A resize (and `init`/`shutdown`) takes it exclusively, so it waits until every
//!     [`ReadGuard`] is gone and no guard ever sees the buffer change size under it.
//! *   The resize callback runs after the exclusive lock is released, so it may draw and
//!     refresh freely.
//!
//! The read-only helpers on `Surface` ([`Surface::refresh`], [`Surface::set_pixel`] and
//! friends) take the lock recursively, so a thread holding a [`ReadGuard`] may call them
//! even while a resize is waiting. A thread holding a guard must not call
//! [`Surface::lock_for_read`] again, nor `init`, `shutdown` or `notify_resize`.
//!
//! # Example
//!
//! ```rust
//! use tir::rendering::color::Color;
//! use tir::surface::Surface;
//! use tir::terminal::HeadlessTerminal;
//!
//! let terminal = HeadlessTerminal::new(2, 1);
//! let surface = Surface::new(terminal.clone());
//! surface.init().unwrap();
//!
//! {
//!     let pixels = surface.lock_for_read();
//!     pixels.fill(Color::WHITE);
//! }
//! surface.refresh();
//! assert!(terminal.output().ends_with("█".as_bytes()));
//!
//! surface.shutdown().unwrap();
//! ```
//!
//! [`EventPump`]: crate::events::EventPump

use crate::error::{Error, Result};
use crate::rendering::buffer::PixelBuffer;
use crate::rendering::color::{AtomicColor, Color};
use crate::rendering::encoder::FrameEncoder;
use crate::rendering::glyph::{DEFAULT_PALETTE, GlyphMask};
use crate::rendering::loss::LossEngine;
use crate::terminal::{CursorHome, ResetAttributes, Terminal};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Where a surface is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    ShutDown,
}

type ResizeCallback<T> = Arc<dyn Fn(&Surface<T>) + Send + Sync>;

/// Everything the reader/writer lock protects.
#[derive(Debug)]
struct Screen {
    lifecycle: Lifecycle,
    pixels: PixelBuffer,
}

/// A terminal-backed RGB canvas.
pub struct Surface<T: Terminal> {
    screen: RwLock<Screen>,
    terminal: Mutex<T>,
    on_resize: Mutex<Option<ResizeCallback<T>>>,
    encoder: FrameEncoder,
}

impl<T: Terminal> Surface<T> {
    /// Creates an uninitialized surface drawing with the default (quarter block) palette.
    pub fn new(terminal: T) -> Self {
        Self::with_palette(terminal, DEFAULT_PALETTE)
    }

    /// Creates an uninitialized surface drawing with `palette`.
    pub fn with_palette(terminal: T, palette: &'static [GlyphMask]) -> Self {
        Self {
            screen: RwLock::new(Screen {
                lifecycle: Lifecycle::Uninitialized,
                pixels: PixelBuffer::new(),
            }),
            terminal: Mutex::new(terminal),
            on_resize: Mutex::new(None),
            encoder: FrameEncoder::new(LossEngine::new(palette)),
        }
    }

    // Recursive: succeeds while the calling thread holds a `ReadGuard`, even with a writer
    // queued behind that guard.
    fn read_screen(&self) -> RwLockReadGuard<'_, Screen> {
        self.screen.read_recursive()
    }

    /// Takes over the terminal and allocates the pixel buffer.
    ///
    /// Enters raw mode, hides the cursor and sizes the buffer from the terminal.
    pub fn init(&self) -> Result<()> {
        let mut screen = self.screen.write();
        match screen.lifecycle {
            Lifecycle::Ready => return Err(Error::AlreadyInitialized),
            Lifecycle::ShutDown => return Err(Error::ShutDown),
            Lifecycle::Uninitialized => {}
        }

        let (columns, rows) = {
            let mut terminal = self.terminal.lock();
            terminal
                .enable_raw_mode()
                .map_err(Error::TerminalModeUnavailable)?;
            match execute!(terminal, Hide).and_then(|_| terminal.size()) {
                Ok(size) => size,
                Err(err) => {
                    let _ = terminal.disable_raw_mode();
                    return Err(err.into());
                }
            }
        };

        screen.pixels.resize(columns as usize, rows as usize);
        screen.lifecycle = Lifecycle::Ready;
        log::debug!("surface initialized at {columns}x{rows} cells");
        Ok(())
    }

    /// Frees the pixel buffer and gives the terminal back.
    ///
    /// Resets colors, clears the screen, homes and shows the cursor, and restores the
    /// terminal mode saved by [`Surface::init`]. The surface cannot be initialized again.
    pub fn shutdown(&self) -> Result<()> {
        let mut screen = self.screen.write();
        if screen.lifecycle != Lifecycle::Ready {
            return Err(Error::NotInitialized);
        }
        screen.lifecycle = Lifecycle::ShutDown;
        screen.pixels.release();

        let mut terminal = self.terminal.lock();
        let restored = execute!(
            terminal,
            ResetAttributes,
            Clear(ClearType::All),
            CursorHome,
            Show
        );
        let mode = terminal.disable_raw_mode();
        log::debug!("surface shut down");
        restored.and(mode)?;
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.read_screen().lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle() == Lifecycle::Ready
    }

    /// Registers the function called after every resize that changed the buffer.
    ///
    /// Replaces any previous callback. It runs on the thread that delivered the resize,
    /// with no lock held.
    pub fn set_resize_callback<F>(&self, callback: F)
    where
        F: Fn(&Surface<T>) + Send + Sync + 'static,
    {
        *self.on_resize.lock() = Some(Arc::new(callback));
    }

    pub fn clear_resize_callback(&self) {
        *self.on_resize.lock() = None;
    }

    /// Acquires shared access to the pixels for a drawing pass.
    ///
    /// Resizes wait until the returned guard is dropped.
    pub fn lock_for_read(&self) -> ReadGuard<'_, T> {
        ReadGuard {
            surface: self,
            screen: self.screen.read(),
        }
    }

    /// Width in supersampled pixels.
    pub fn width(&self) -> usize {
        self.read_screen().pixels.width()
    }

    /// Height in supersampled pixels.
    pub fn height(&self) -> usize {
        self.read_screen().pixels.height()
    }

    /// Reads one pixel, locking just for the read.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.read_screen().pixels.load(x, y)
    }

    /// Writes one pixel, locking just for the write. Returns `false` if out of bounds.
    pub fn set_pixel(&self, x: usize, y: usize, color: Color) -> bool {
        self.read_screen().pixels.set(x, y, color)
    }

    /// Renders the whole buffer to the terminal.
    ///
    /// Output problems are logged, never returned: a glitched frame is better than a
    /// crashed display. Does nothing before `init` and after `shutdown`.
    pub fn refresh(&self) {
        let screen = self.read_screen();
        self.render(&screen.pixels);
    }

    fn render(&self, pixels: &PixelBuffer) {
        if !pixels.is_allocated() {
            return;
        }
        let mut terminal = self.terminal.lock();
        match self.encoder.write_frame(pixels, &mut *terminal) {
            Ok(0) => {}
            Ok(written) => log::trace!("wrote {written} byte frame"),
            Err(err) => log::warn!("failed to write frame: {err}"),
        }
    }

    /// Re-reads the terminal size and reallocates the buffer if it changed.
    ///
    /// Called by whoever receives the terminal's resize notifications. When the size did
    /// change, the resize callback runs afterwards on the calling thread. Does nothing
    /// unless the surface is initialized.
    pub fn notify_resize(&self) {
        let resized = {
            let mut screen = self.screen.write();
            if screen.lifecycle != Lifecycle::Ready {
                return;
            }
            let size = self.terminal.lock().size();
            let (columns, rows) = match size {
                Ok(size) => size,
                Err(err) => {
                    log::warn!("failed to query terminal size: {err}");
                    return;
                }
            };
            let resized = screen.pixels.resize(columns as usize, rows as usize);
            if resized {
                log::debug!("pixel buffer resized to {columns}x{rows} cells");
            }
            resized
        };

        if resized {
            let callback = self.on_resize.lock().clone();
            if let Some(callback) = callback {
                callback(self);
            }
        }
    }
}

/// Shared access to a surface's pixels.
///
/// While any `ReadGuard` is alive the buffer keeps its size. Dropping the guard releases
/// the lock.
pub struct ReadGuard<'a, T: Terminal> {
    surface: &'a Surface<T>,
    screen: RwLockReadGuard<'a, Screen>,
}

impl<T: Terminal> ReadGuard<'_, T> {
    /// The live pixel at `(x, y)` in supersampled coordinates, or `None` if out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&AtomicColor> {
        self.screen.pixels.get(x, y)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.screen.pixels.load(x, y)
    }

    /// Writes one pixel. Returns `false` if out of bounds.
    pub fn set_pixel(&self, x: usize, y: usize, color: Color) -> bool {
        self.screen.pixels.set(x, y, color)
    }

    pub fn fill(&self, color: Color) {
        self.screen.pixels.fill(color);
    }

    pub fn width(&self) -> usize {
        self.screen.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.screen.pixels.height()
    }

    /// Renders the buffer without giving up the shared lock.
    pub fn refresh(&self) {
        self.surface.render(&self.screen.pixels);
    }
}
