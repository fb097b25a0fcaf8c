//! Terminal control.
//!
//! The [`Surface`] talks to the terminal through the [`Terminal`] trait: a byte sink plus
//! the three capabilities it needs besides writing (size query, entering and leaving raw
//! mode). [`CrosstermTerminal`] is the real one; [`HeadlessTerminal`] keeps everything in
//! memory and is what the tests and offscreen rendering use.
//!
//! [`Surface`]: crate::surface::Surface

use crate::rendering::color::Color;
use crossterm::Command;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io;
use std::io::{Stdout, Write, stdout};
use std::sync::Arc;

/// The terminal capabilities a surface needs.
pub trait Terminal: Write + Send {
    /// Current size in cells, as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Switches to raw input mode: no line buffering, no echo, no signal keys.
    ///
    /// The mode that was active before is remembered for [`Terminal::disable_raw_mode`].
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Restores the mode saved by [`Terminal::enable_raw_mode`].
    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

/// Moves the cursor to the top left corner (`ESC [ H`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorHome;

impl Command for CursorHome {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[H")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        crossterm::cursor::MoveTo(0, 0).execute_winapi()
    }
}

/// Resets all graphic attributes (`ESC [ m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetAttributes;

impl Command for ResetAttributes {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[m")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        crossterm::style::ResetColor.execute_winapi()
    }
}

/// Sets a 24-bit foreground color (`ESC [ 38;2;R;G;B m`).
///
/// Unlike `crossterm::style::SetForegroundColor` this ignores `NO_COLOR`: the pixels are
/// the content, not decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRgbForeground(pub Color);

impl Command for SetRgbForeground {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let Color { r, g, b } = self.0;
        write!(f, "\x1b[38;2;{r};{g};{b}m")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        crossterm::style::SetForegroundColor(self.0.into()).execute_winapi()
    }
}

/// Sets a 24-bit background color (`ESC [ 48;2;R;G;B m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRgbBackground(pub Color);

impl Command for SetRgbBackground {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let Color { r, g, b } = self.0;
        write!(f, "\x1b[48;2;{r};{g};{b}m")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        crossterm::style::SetBackgroundColor(self.0.into()).execute_winapi()
    }
}

/// The process's controlling terminal, driven through `crossterm`.
///
/// Writes are collected in memory and reach stdout only on `flush`, so a frame is handed to
/// the tty in one piece.
pub struct CrosstermTerminal {
    buf: Vec<u8>,
    stdout: Stdout,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            buf: vec![],
            stdout: stdout(),
        }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for CrosstermTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        let result = lock.write_all(&self.buf).and_then(|_| lock.flush());
        // a failed frame is dropped rather than prepended to the next one
        self.buf.clear();
        result
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    size: (u16, u16),
    raw_mode: bool,
    raw_mode_unavailable: bool,
    output: Vec<u8>,
    flushes: usize,
}

/// An in-memory terminal.
///
/// Clones share state, so a test can hand one clone to a surface and keep another to
/// resize the "window" and inspect what was written.
///
/// ```rust
/// use std::io::Write;
/// use tir::terminal::{HeadlessTerminal, Terminal};
///
/// let terminal = HeadlessTerminal::new(80, 24);
/// let mut handle = terminal.clone();
/// handle.write_all(b"hi").unwrap();
/// assert_eq!(terminal.take_output(), b"hi");
/// assert_eq!(terminal.size().unwrap(), (80, 24));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeadlessTerminal {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessTerminal {
    /// Creates a terminal of `columns` x `rows` cells.
    pub fn new(columns: u16, rows: u16) -> Self {
        let terminal = Self::default();
        terminal.set_size(columns, rows);
        terminal
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock()
    }

    /// Changes the size reported from now on.
    pub fn set_size(&self, columns: u16, rows: u16) {
        self.state().size = (columns, rows);
    }

    /// Makes `enable_raw_mode` fail, like a stdin that is not a tty.
    pub fn set_raw_mode_unavailable(&self, unavailable: bool) {
        self.state().raw_mode_unavailable = unavailable;
    }

    pub fn is_raw_mode(&self) -> bool {
        self.state().raw_mode
    }

    /// Everything written so far.
    pub fn output(&self) -> Vec<u8> {
        self.state().output.clone()
    }

    /// Everything written so far, clearing the capture.
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.state().output)
    }

    /// Number of `flush` calls so far.
    pub fn flushes(&self) -> usize {
        self.state().flushes
    }
}

impl Write for HeadlessTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state().output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state().flushes += 1;
        Ok(())
    }
}

impl Terminal for HeadlessTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.state().size)
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let mut state = self.state();
        if state.raw_mode_unavailable {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "raw mode is not available",
            ));
        }
        state.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.state().raw_mode = false;
        Ok(())
    }
}

/// Puts the controlling terminal back into a usable state.
///
/// Resets colors, clears the screen, shows the cursor and leaves raw mode. Used by the
/// panic handler, where the surface itself may be unreachable.
pub fn restore_terminal() -> io::Result<()> {
    let mut stdout = stdout();
    crossterm::execute!(
        stdout,
        ResetAttributes,
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
        CursorHome,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::queue;

    #[test]
    fn test_custom_commands() {
        let mut out = Vec::new();
        queue!(
            out,
            ResetAttributes,
            CursorHome,
            SetRgbForeground(Color::new(1, 22, 255)),
            SetRgbBackground(Color::BLACK)
        )
        .unwrap();
        assert_eq!(out, b"\x1b[m\x1b[H\x1b[38;2;1;22;255m\x1b[48;2;0;0;0m");
    }

    #[test]
    fn test_headless_raw_mode() {
        let mut terminal = HeadlessTerminal::new(4, 4);
        terminal.enable_raw_mode().unwrap();
        assert!(terminal.is_raw_mode());
        terminal.disable_raw_mode().unwrap();
        assert!(!terminal.is_raw_mode());

        terminal.set_raw_mode_unavailable(true);
        assert!(terminal.enable_raw_mode().is_err());
        assert!(!terminal.is_raw_mode());
    }

    #[test]
    fn test_headless_clones_share_state() {
        let terminal = HeadlessTerminal::new(1, 1);
        let mut clone = terminal.clone();
        clone.write_all(b"abc").unwrap();
        clone.flush().unwrap();
        terminal.set_size(7, 3);

        assert_eq!(terminal.output(), b"abc");
        assert_eq!(terminal.flushes(), 1);
        assert_eq!(clone.size().unwrap(), (7, 3));
    }
}
