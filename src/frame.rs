//! The view handed to the draw callback once per redrawn frame.

use crate::buffer::{CellBuffer, TooltipStyle, split_lines};
use crate::cell::Cell;
use crate::color::Rgb;
use crate::config::{UiLayers, VizConfig};
use crate::input::InputSnapshot;
use crate::render;
use crate::viewport::Viewport;
use crate::window::WindowManager;
use crate::world::WorldSource;

/// Drawing surface plus the transforms and state of the current tick.
///
/// World drawing respects the map layer and overlay primitives respect
/// the overlays layer, so callers can draw unconditionally.
pub struct Frame<'a> {
    buf: &'a mut CellBuffer,
    viewport: &'a Viewport,
    config: &'a VizConfig,
    windows: &'a mut WindowManager,
    input: InputSnapshot,
    steps: u32,
}

impl<'a> Frame<'a> {
    pub fn new(
        buf: &'a mut CellBuffer,
        viewport: &'a Viewport,
        config: &'a VizConfig,
        windows: &'a mut WindowManager,
        input: InputSnapshot,
        steps: u32,
    ) -> Self {
        Self {
            buf,
            viewport,
            config,
            windows,
            input,
            steps,
        }
    }

    #[must_use]
    pub fn screen_to_world(&self, sx: i32, sy: i32) -> (f64, f64) {
        self.viewport.screen_to_world(sx, sy)
    }

    #[must_use]
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (i32, i32) {
        self.viewport.world_to_screen(wx, wy)
    }

    #[must_use]
    pub fn world_cell_under_screen(&self, sx: i32, sy: i32) -> (i64, i64) {
        self.viewport.world_cell_under_screen(sx, sy)
    }

    /// World cell under the mouse cursor.
    #[must_use]
    pub fn hovered_cell(&self) -> (i64, i64) {
        self.world_cell_under_screen(self.input.mouse_x, self.input.mouse_y)
    }

    /// Sample `world` into the map area (map layer).
    pub fn draw_world<W: WorldSource + ?Sized>(&mut self, world: &W) {
        let enabled = self.config.layers.contains(UiLayers::MAP);
        render::draw_world(self.buf, self.viewport, world, enabled);
    }

    /// Filled world-space rectangle (overlays layer).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect_world(&mut self, x: f64, y: f64, w: f64, h: f64, ch: char, fg: Rgb, bg: Rgb) {
        let enabled = self.overlays_enabled();
        render::draw_rect_world(self.buf, self.viewport, x, y, w, h, Cell::new(ch, fg, bg), enabled);
    }

    /// World-space ring (overlays layer).
    pub fn draw_circle_world(&mut self, cx: f64, cy: f64, r: f64, ch: char, fg: Rgb, bg: Rgb) {
        let enabled = self.overlays_enabled();
        render::draw_circle_world(self.buf, self.viewport, cx, cy, r, Cell::new(ch, fg, bg), enabled);
    }

    /// Screen-anchored text (overlays layer).
    pub fn draw_text_screen(&mut self, sx: i32, sy: i32, text: &str, fg: Rgb, bg: Rgb) {
        let enabled = self.overlays_enabled();
        render::draw_text_screen(self.buf, sx, sy, text, fg, bg, enabled);
    }

    /// Bordered text box using the configured tooltip alphas.
    pub fn draw_tooltip_box(&mut self, sx: i32, sy: i32, text: &str) {
        let style = TooltipStyle::default()
            .with_alphas(self.config.tooltip_bg_alpha, self.config.tooltip_border_alpha);
        self.buf.draw_tooltip_box(sx, sy, &split_lines(text), style);
    }

    fn overlays_enabled(&self) -> bool {
        self.config.layers.contains(UiLayers::OVERLAYS)
    }

    #[must_use]
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    #[must_use]
    pub fn config(&self) -> &VizConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    /// Simulation steps owed since the last drawn frame, from autoplay and
    /// the step key.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn step_requested(&self) -> bool {
        self.steps > 0
    }

    #[must_use]
    pub fn screen_size(&self) -> (i32, i32) {
        (i32::from(self.buf.width()), i32::from(self.buf.height()))
    }

    /// Direct buffer access for drawing outside the layer rules.
    pub fn buffer_mut(&mut self) -> &mut CellBuffer {
        self.buf
    }

    #[must_use]
    pub fn windows(&self) -> &WindowManager {
        self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        self.windows
    }
}
