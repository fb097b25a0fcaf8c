//! Terminal notifications.
//!
//! Resize and interrupt notifications arrive asynchronously. Instead of doing any work in
//! signal context, an [`EventPump`] runs a worker thread that reads terminal events through
//! `crossterm` (which turns `SIGWINCH` into [`Event::Resize`]) and:
//!
//! *   calls [`Surface::notify_resize`] on every resize, so reallocation and the resize
//!     callback happen on the worker thread;
//! *   sets a plain flag on Ctrl-C, which in raw mode arrives as a key press instead of
//!     `SIGINT`. The main loop polls [`EventPump::interrupted`] and shuts down itself;
//! *   forwards every event to the main loop over a channel.

use crate::surface::Surface;
use crate::terminal::Terminal;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Whether `event` asks the program to stop (Ctrl-C).
pub fn is_interrupt(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c' | 'C'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Reacts to one terminal event on behalf of `surface`.
///
/// This is the whole job of the pump's worker thread, pulled out so it can be driven with
/// synthetic events.
pub fn dispatch<T: Terminal>(event: &Event, surface: &Surface<T>, interrupted: &AtomicBool) {
    if let Event::Resize(columns, rows) = event {
        log::trace!("terminal reported resize to {columns}x{rows}");
        surface.notify_resize();
    } else if is_interrupt(event) {
        log::debug!("interrupt requested");
        interrupted.store(true, Ordering::SeqCst);
    }
}

/// Worker thread delivering terminal notifications to a [`Surface`].
///
/// The thread is stopped and joined by [`EventPump::stop`] or on drop.
pub struct EventPump {
    events: Receiver<Event>,
    interrupted: Arc<AtomicBool>,
    stop_signal: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl EventPump {
    /// Starts reading terminal events for `surface`.
    pub fn spawn<T: Terminal + 'static>(surface: Arc<Surface<T>>) -> Self {
        let (event_writer, events) = std::sync::mpsc::channel();
        let (stop_signal, stop_receiver) = std::sync::mpsc::channel::<()>();
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();

        let handle = std::thread::spawn(move || {
            loop {
                match stop_receiver.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }
                match crossterm::event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        log::warn!("terminal event polling failed: {err}");
                        break;
                    }
                }
                match crossterm::event::read() {
                    Ok(event) => {
                        dispatch(&event, &surface, &flag);
                        // the main loop may not care about events
                        let _ = event_writer.send(event);
                    }
                    Err(err) => log::warn!("failed to read terminal event: {err}"),
                }
            }
            log::debug!("event pump stopped");
        });

        Self {
            events,
            interrupted,
            stop_signal,
            handle: Some(handle),
        }
    }

    /// Whether Ctrl-C was pressed since the pump started.
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// The next pending event, without blocking.
    pub fn try_next(&self) -> Option<Event> {
        self.events.try_recv().ok()
    }

    /// Drains all pending events.
    pub fn pending(&self) -> impl Iterator<Item = Event> + '_ {
        self.events.try_iter()
    }

    /// Stops the worker thread and waits for it.
    pub fn stop(mut self) {
        self.shutdown_worker();
    }

    fn shutdown_worker(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_signal.send(());
            if handle.join().is_err() {
                log::error!("event pump thread panicked");
            }
        }
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.shutdown_worker();
    }
}
