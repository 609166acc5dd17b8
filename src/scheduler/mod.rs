//! The tick loop tying input, viewport, drawing and output together.
//!
//! [`MainLoop`] owns every piece of UI state that lives on the main thread:
//! the terminal, the cell buffer, the viewport, the configuration and the
//! window manager. The only state shared with another thread is the
//! [`InputState`] the reader thread writes into.
//!
//! # Tick order
//!
//! 1. Resize detection (buffer realloc, screen clear, mouse re-enable,
//!    decoder reset).
//! 2. Up to `max_keys_per_tick` queued keys; `Ctrl+Q` ends the loop.
//! 3. Wheel zoom and drag pan, skipped while a window is being dragged.
//! 4. Window focus, drag and close gestures.
//! 5. Autoplay step accounting.
//! 6. When dirty: user draw, rulers, windows, tooltip, status bar, flush.
//!
//! [`MainLoop::tick`] runs one pass and can be driven by hand in tests;
//! [`MainLoop::run`] adds terminal setup, the reader thread and frame
//! pacing.

mod autoplay;
pub mod chrome;
mod help;
mod keys;

pub use autoplay::{AutoStepper, FpsCounter};
pub use help::{HELP_Z, help_window};

use crate::buffer::CellBuffer;
use crate::config::{UiLayers, VizConfig};
use crate::error::Result;
use crate::frame::Frame;
use crate::input::{InputReader, InputState};
use crate::terminal::Terminal;
use crate::viewport::Viewport;
use crate::window::{WindowId, WindowManager};
use crate::world::TooltipProvider;
use chrome::TooltipContext;
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Sleep after a tick that had nothing to draw.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// What a single [`MainLoop::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The quit key was pressed; nothing was drawn.
    Quit,
    /// A frame was drawn and flushed.
    Rendered,
    /// Nothing was dirty.
    Idle,
}

/// The visualizer's main loop.
pub struct MainLoop<W: Write> {
    terminal: Terminal<W>,
    config: VizConfig,
    viewport: Viewport,
    buffer: CellBuffer,
    windows: WindowManager,
    input: Arc<InputState>,
    reader: Option<InputReader>,
    tooltip: Option<TooltipProvider>,
    tooltip_enabled: bool,
    help: Option<WindowId>,
    stepper: AutoStepper,
    fps: FpsCounter,
    /// Seconds since the last drawn frame.
    since_frame: f64,
    pending_steps: u32,
}

impl<W: Write> MainLoop<W> {
    /// Create a loop sized to the terminal's current dimensions.
    pub fn new(mut terminal: Terminal<W>, config: VizConfig) -> Self {
        let (w, h) = terminal.size();
        terminal.set_color_mode(config.color_mode);
        info!(width = w, height = h, color_mode = %config.color_mode, "main loop created");

        let mut buffer = CellBuffer::new(w, h);
        buffer.set_alpha_blend_enabled(config.alpha_blend());
        Self {
            terminal,
            viewport: Viewport::new(w, h),
            buffer,
            config,
            windows: WindowManager::new(),
            input: Arc::new(InputState::new()),
            reader: None,
            tooltip: None,
            tooltip_enabled: true,
            help: None,
            stepper: AutoStepper::new(),
            fps: FpsCounter::new(),
            since_frame: 0.0,
            pending_steps: 0,
        }
    }

    /// Show `provider`'s text for the world cell under the cursor.
    #[must_use]
    pub fn with_tooltip(mut self, provider: impl Fn(i64, i64) -> Option<String> + 'static) -> Self {
        self.tooltip = Some(Box::new(provider));
        self
    }

    /// Shared input state, for feeding events without a reader thread.
    #[must_use]
    pub fn input(&self) -> Arc<InputState> {
        Arc::clone(&self.input)
    }

    #[must_use]
    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut VizConfig {
        &mut self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    #[must_use]
    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    /// The most recently drawn frame.
    #[must_use]
    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<W> {
        &mut self.terminal
    }

    #[must_use]
    pub fn tooltip_enabled(&self) -> bool {
        self.tooltip_enabled
    }

    /// The help window, while it exists.
    #[must_use]
    pub fn help_window(&self) -> Option<WindowId> {
        self.help.filter(|id| self.windows.contains(*id))
    }

    /// Steps requested since the last drawn frame.
    #[must_use]
    pub fn pending_steps(&self) -> u32 {
        self.pending_steps
    }

    #[must_use]
    pub fn autoplay(&self) -> &AutoStepper {
        &self.stepper
    }

    /// Start the reader thread on stdin.
    pub fn start_reader(&mut self) -> Result<()> {
        self.reader = Some(InputReader::spawn_stdin(self.input())?);
        Ok(())
    }

    /// Start the reader thread on an arbitrary byte source.
    pub fn start_reader_from<R>(&mut self, source: R) -> Result<()>
    where
        R: Read + Send + 'static,
    {
        self.reader = Some(InputReader::spawn(source, self.input())?);
        Ok(())
    }

    /// Run one pass of the loop, `dt` seconds after the previous one.
    pub fn tick<F>(&mut self, dt: f64, draw: &mut F) -> Result<TickOutcome>
    where
        F: FnMut(&mut Frame<'_>),
    {
        self.since_frame += dt.max(0.0);
        self.check_resize();

        if self.drain_keys() {
            return Ok(TickOutcome::Quit);
        }
        self.handle_mouse();

        let (w, h) = self.screen_size();
        if self.windows.handle_mouse(&self.input.snapshot(), w, h) {
            self.input.mark_dirty();
        }

        if self.config.auto_play {
            if self.config.continuous_render_when_autoplay {
                self.input.mark_dirty();
            }
            let fired = self.stepper.advance(dt, self.config.auto_step_per_second);
            if fired > 0 {
                self.pending_steps = self.pending_steps.saturating_add(fired);
                self.input.mark_dirty();
            }
        }

        if !self.input.take_dirty() {
            return Ok(TickOutcome::Idle);
        }
        self.render(draw)?;
        Ok(TickOutcome::Rendered)
    }

    /// Set up the terminal and tick until quit, then restore the terminal.
    ///
    /// Starts a stdin reader unless one is already running. After each
    /// drawn frame the loop sleeps off what remains of the
    /// `1 / target_fps` budget.
    pub fn run<F>(&mut self, mut draw: F) -> Result<()>
    where
        F: FnMut(&mut Frame<'_>),
    {
        self.terminal.setup()?;
        if self.reader.is_none() {
            self.start_reader()?;
        }
        info!("main loop running");

        let mut last = Instant::now();
        loop {
            let started = Instant::now();
            let dt = started.duration_since(last).as_secs_f64();
            last = started;

            match self.tick(dt, &mut draw)? {
                TickOutcome::Quit => break,
                TickOutcome::Idle => thread::sleep(IDLE_SLEEP),
                TickOutcome::Rendered => {
                    if let Some(budget) = frame_budget(self.config.target_fps) {
                        if let Some(rest) = budget.checked_sub(started.elapsed()) {
                            thread::sleep(rest);
                        }
                    }
                }
            }
        }
        self.shutdown()
    }

    /// Stop the reader thread and restore the terminal.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(mut reader) = self.reader.take() {
            reader.stop();
        }
        self.terminal.cleanup()?;
        info!("main loop stopped");
        Ok(())
    }

    fn screen_size(&self) -> (i32, i32) {
        (i32::from(self.buffer.width()), i32::from(self.buffer.height()))
    }

    fn check_resize(&mut self) {
        let (w, h) = self.terminal.size();
        let (old_w, old_h) = self.buffer.size();
        if (w, h) == (old_w, old_h) {
            return;
        }
        info!(old_w, old_h, width = w, height = h, "terminal resized");

        self.buffer.resize(w, h);
        self.viewport.set_screen_size(w, h);
        self.windows.clamp_all(i32::from(w), i32::from(h));
        self.terminal.clear();
        self.terminal.reenable_mouse();
        self.input.on_resize();
        if let Some(reader) = &self.reader {
            reader.request_reset();
        }
        self.input.mark_dirty();
    }

    fn handle_mouse(&mut self) {
        let wheel = self.input.consume_wheel();
        if wheel != 0 {
            self.zoom_at_cursor(self.config.wheel_zoom_base.powi(wheel));
            self.input.mark_dirty();
        }

        if self.windows.is_dragging() {
            return;
        }
        if self.input.snapshot().is_dragging() {
            let (dx, dy) = self.input.consume_drag_delta();
            if dx != 0 || dy != 0 {
                let mul = self.config.pan_speed / self.viewport.zoom();
                self.viewport.offset(
                    (-f64::from(dx) * mul).floor(),
                    (-f64::from(dy) * mul).floor(),
                );
                self.input.mark_dirty();
            }
        }
    }

    /// Zoom keeping the world point under the mouse in place.
    fn zoom_at_cursor(&mut self, factor: f64) {
        let snap = self.input.snapshot();
        let (w, h) = self.screen_size();
        let sx = snap.mouse_x.clamp(0, w - 1);
        let sy = snap.mouse_y.clamp(0, h - 1);
        let (wx, wy) = self.viewport.screen_to_world(sx, sy);
        self.viewport
            .zoom_around(wx, wy, factor, self.config.min_zoom, self.config.max_zoom);
    }

    fn render<F>(&mut self, draw: &mut F) -> Result<()>
    where
        F: FnMut(&mut Frame<'_>),
    {
        self.buffer.set_alpha_blend_enabled(self.config.alpha_blend());
        self.buffer.clear();

        let snap = self.input.snapshot();
        let mouse = (snap.mouse_x, snap.mouse_y);
        {
            let mut frame = Frame::new(
                &mut self.buffer,
                &self.viewport,
                &self.config,
                &mut self.windows,
                snap,
                self.pending_steps,
            );
            draw(&mut frame);
        }

        if self.config.layers.contains(UiLayers::RULERS) {
            chrome::draw_rulers(&mut self.buffer, &self.viewport, &self.config, mouse);
        }
        self.windows.draw_all(&mut self.buffer);
        chrome::draw_tooltip(
            &mut self.buffer,
            &TooltipContext {
                viewport: &self.viewport,
                config: &self.config,
                windows: &self.windows,
                provider: self.tooltip.as_ref(),
                enabled: self.tooltip_enabled,
                mouse,
            },
        );
        if self.config.layers.contains(UiLayers::STATUS_BAR) {
            chrome::draw_status_bar(&mut self.buffer, &self.viewport, &self.config, mouse, self.fps.fps());
        }

        self.terminal.draw(&self.buffer)?;

        if self.config.auto_play {
            self.fps.record_frame(self.since_frame);
        } else {
            self.fps.reset();
        }
        self.since_frame = 0.0;
        if self.pending_steps > 0 {
            debug!(steps = self.pending_steps, "steps delivered");
        }
        self.pending_steps = 0;
        Ok(())
    }
}

/// Time allotted to one frame, or `None` when unthrottled.
fn frame_budget(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs(1) / target_fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::color::Rgb;
    use crate::input::{KeyCode, KeyEvent, MouseReport};
    use crate::world::GridWorld;

    fn test_loop(w: u16, h: u16) -> MainLoop<Vec<u8>> {
        MainLoop::new(Terminal::new(Vec::new()).with_fixed_size(w, h), VizConfig::default())
    }

    fn noop(_: &mut Frame<'_>) {}

    #[test]
    fn test_first_tick_renders_then_idles() {
        let mut ml = test_loop(40, 12);
        assert_eq!(ml.tick(0.0, &mut noop).unwrap(), TickOutcome::Rendered);
        assert_eq!(ml.tick(0.0, &mut noop).unwrap(), TickOutcome::Idle);
        let out = String::from_utf8_lossy(ml.terminal_mut().writer_mut()).into_owned();
        assert!(out.contains("\x1b[H"));
        assert!(out.contains("F1 Help"));
    }

    #[test]
    fn test_draw_callback_sees_world_and_chrome_on_top() {
        let world = GridWorld::filled(100, 100, Cell::new('#', Rgb::WHITE, Rgb::BLACK));
        let mut ml = test_loop(40, 12);
        let mut draw = |f: &mut Frame<'_>| f.draw_world(&world);
        ml.tick(0.0, &mut draw).unwrap();

        let buf = ml.buffer();
        assert_eq!(buf.get(20, 5).unwrap().ch, '#');
        assert_eq!(buf.get(20, 11).unwrap().bg, Rgb::GRAY);
        assert_ne!(buf.get(20, 0).unwrap().ch, '#');
    }

    #[test]
    fn test_quit_key_stops_before_later_keys() {
        let mut ml = test_loop(40, 12);
        let input = ml.input();
        input.enqueue_key(KeyEvent::with_ctrl(KeyCode::Char('q')));
        input.enqueue_key(KeyEvent::char('2'));
        assert_eq!(ml.tick(0.0, &mut noop).unwrap(), TickOutcome::Quit);
        assert!(!ml.config().auto_play);
        assert_eq!(input.pending_keys(), 1);
    }

    #[test]
    fn test_key_drain_is_bounded() {
        let mut ml = test_loop(40, 12);
        ml.config_mut().max_keys_per_tick = 2;
        let input = ml.input();
        for _ in 0..5 {
            input.enqueue_key(KeyEvent::char('t'));
        }
        ml.tick(0.0, &mut noop).unwrap();
        assert_eq!(input.pending_keys(), 3);
        assert!(ml.tooltip_enabled());
    }

    #[test]
    fn test_resize_reallocates_and_redraws() {
        let mut ml = test_loop(40, 12);
        ml.tick(0.0, &mut noop).unwrap();
        ml.terminal_mut().set_fixed_size(60, 20);
        assert_eq!(ml.tick(0.0, &mut noop).unwrap(), TickOutcome::Rendered);
        assert_eq!(ml.buffer().size(), (60, 20));
        assert_eq!(ml.viewport().screen_size(), (60, 20));
    }

    #[test]
    fn test_autoplay_delivers_steps_to_frame() {
        let mut ml = MainLoop::new(
            Terminal::new(Vec::new()).with_fixed_size(40, 12),
            VizConfig::default().with_auto_play(10.0),
        );
        let mut seen = Vec::new();
        let mut draw = |f: &mut Frame<'_>| seen.push(f.steps());
        ml.tick(0.35, &mut draw).unwrap();
        ml.tick(0.0, &mut draw).unwrap();
        assert_eq!(seen, vec![3, 0]);
        assert!((ml.autoplay().accumulator() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zooms_at_cursor() {
        let mut ml = test_loop(40, 12);
        let input = ml.input();
        input.apply_mouse(&MouseReport::new(64, 11, 6, true));
        let before = ml.viewport().screen_to_world(10, 5);
        ml.tick(0.0, &mut noop).unwrap();
        assert!((ml.viewport().zoom() - 1.1).abs() < 1e-9);
        let (sx, sy) = ml.viewport().world_to_screen(before.0, before.1);
        assert_eq!((sx, sy), (10, 5));
    }

    #[test]
    fn test_drag_pans_opposite_to_motion() {
        let mut ml = test_loop(40, 12);
        let input = ml.input();
        input.apply_mouse(&MouseReport::new(0, 21, 7, true));
        ml.tick(0.0, &mut noop).unwrap();
        input.apply_mouse(&MouseReport::new(32, 24, 9, true));
        ml.tick(0.0, &mut noop).unwrap();
        assert_eq!(ml.viewport().origin(), (-3.0, -2.0));
    }

    #[test]
    fn test_window_drag_blocks_pan() {
        let mut ml = test_loop(40, 12);
        let id = ml.windows_mut().create(10, 2, 12, 5);
        let input = ml.input();
        input.apply_mouse(&MouseReport::new(0, 13, 3, true));
        ml.tick(0.0, &mut noop).unwrap();
        input.apply_mouse(&MouseReport::new(32, 16, 4, true));
        ml.tick(0.0, &mut noop).unwrap();

        assert_eq!(ml.viewport().origin(), (0.0, 0.0));
        let win = ml.windows().get(id).unwrap();
        assert_eq!((win.x, win.y), (13, 3));
    }

    #[test]
    fn test_frame_budget() {
        assert_eq!(frame_budget(0), None);
        assert_eq!(frame_budget(4), Some(Duration::from_millis(250)));
    }
}
