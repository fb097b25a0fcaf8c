//! Draws test patterns with `tir`.
//!
//! Press `q`, `Esc` or Ctrl-C to quit. Resize the terminal to see the pattern redrawn.
//! Logs go to stderr (`RUST_LOG=debug tir 2>tir.log`).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{Event, KeyCode, KeyEvent};
use rand::Rng;
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tir::rendering::color::Color;
use tir::rendering::glyph::{FULL_BLOCKS, GlyphMask, HALF_BLOCKS, QUARTER_BLOCKS};
use tir::{CrosstermTerminal, EventPump, ReadGuard, Surface, install_panic_handler};

const IDLE_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// A gray disc on a magenta background.
    Circle,
    /// Moving color waves.
    Plasma,
    /// Random pixels.
    Noise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Glyphs {
    Full,
    Half,
    Quarter,
}

impl Glyphs {
    fn palette(self) -> &'static [GlyphMask] {
        match self {
            Glyphs::Full => &FULL_BLOCKS,
            Glyphs::Half => &HALF_BLOCKS,
            Glyphs::Quarter => &QUARTER_BLOCKS,
        }
    }
}

/// Render a test pattern into the terminal with block glyphs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// What to draw.
    #[arg(short, long, value_enum, default_value_t = Pattern::Circle)]
    pattern: Pattern,

    /// Which block glyphs cells may be drawn with.
    #[arg(short, long, value_enum, default_value_t = Glyphs::Quarter)]
    glyphs: Glyphs,

    /// Redraw this many times per second. Without it the pattern is only redrawn on resize.
    #[arg(long)]
    fps: Option<f64>,
}

fn paint(pixels: &ReadGuard<'_, CrosstermTerminal>, pattern: Pattern, t: f64) {
    let (width, height) = (pixels.width(), pixels.height());
    let mut rng = rand::thread_rng();
    for y in 0..height {
        for x in 0..width {
            let xf = 2.0 * x as f64 / width as f64 - 1.0;
            let yf = 2.0 * y as f64 / height as f64 - 1.0;
            let color = match pattern {
                Pattern::Circle => {
                    if xf * xf + yf * yf < 1.0 {
                        Color::new(101, 101, 101)
                    } else {
                        Color::new(255, 101, 255)
                    }
                }
                Pattern::Plasma => {
                    let v = (xf * 4.0 + t).sin()
                        + (yf * 3.0 - t * 0.7).sin()
                        + ((xf + yf) * 2.0 + t * 1.3).sin();
                    let wave = |phase: f64| ((v + phase).sin() * 127.5 + 127.5) as u8;
                    Color::new(wave(0.0), wave(2.1), wave(4.2))
                }
                Pattern::Noise => Color::new(
                    rng.gen_range(0..=255),
                    rng.gen_range(0..=255),
                    rng.gen_range(0..=255),
                ),
            };
            pixels.set_pixel(x, y, color);
        }
    }
}

fn draw(surface: &Surface<CrosstermTerminal>, pattern: Pattern, start: Instant) {
    let pixels = surface.lock_for_read();
    paint(&pixels, pattern, start.elapsed().as_secs_f64());
    pixels.refresh();
}

fn wants_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q' | 'Q') | KeyCode::Esc,
            ..
        })
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("starting with {args:?}");

    let surface = Arc::new(Surface::with_palette(
        CrosstermTerminal::new(),
        args.glyphs.palette(),
    ));
    surface.init().context("failed to take over the terminal")?;
    install_panic_handler();

    let start = Instant::now();
    let pattern = args.pattern;
    surface.set_resize_callback(move |surface| draw(surface, pattern, start));
    draw(&surface, pattern, start);

    let frame_time = args
        .fps
        .filter(|fps| *fps > 0.0)
        .map(|fps| Duration::from_secs_f64(1.0 / fps));

    let pump = EventPump::spawn(surface.clone());
    'main: loop {
        for event in pump.pending() {
            if wants_quit(&event) {
                break 'main;
            }
        }
        if pump.interrupted() {
            break;
        }
        match frame_time {
            Some(frame_time) => {
                let frame_start = Instant::now();
                draw(&surface, pattern, start);
                sleep(frame_time.saturating_sub(frame_start.elapsed()));
            }
            None => sleep(IDLE_INTERVAL),
        }
    }
    pump.stop();

    surface.shutdown().context("failed to restore the terminal")?;
    Ok(())
}
