//! World ↔ screen transform with anchor-preserving zoom.
//!
//! Screen space is offset by a fixed ruler margin: world origin maps to
//! screen column [`MARGIN_X`] and row [`MARGIN_Y`].
//!
//! ```text
//! sx = MARGIN_X + (wx - origin_x) * zoom
//! sy = MARGIN_Y + (wy - origin_y) * zoom
//! ```
//!
//! All operations are pure arithmetic on the viewport's own fields.

/// Columns reserved on the left for the vertical ruler.
pub const MARGIN_X: i32 = 4;
/// Rows reserved at the top for the horizontal ruler.
pub const MARGIN_Y: i32 = 1;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 40.0;

/// Zoom changes smaller than this are ignored.
const ZOOM_EPSILON: f64 = 1e-9;

/// Pan/zoom state plus the screen size it projects onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    origin_x: f64,
    origin_y: f64,
    zoom: f64,
    screen_w: i32,
    screen_h: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Viewport {
    /// Viewport at zoom 1 with world origin at the top-left of the map area.
    #[must_use]
    pub fn new(screen_w: u16, screen_h: u16) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            zoom: 1.0,
            screen_w: i32::from(screen_w),
            screen_h: i32::from(screen_h),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin_x: f64, origin_y: f64) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Set zoom directly, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = clamp_zoom(zoom, MIN_ZOOM, MAX_ZOOM);
        self
    }

    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn screen_size(&self) -> (i32, i32) {
        (self.screen_w, self.screen_h)
    }

    pub fn set_screen_size(&mut self, w: u16, h: u16) {
        self.screen_w = i32::from(w);
        self.screen_h = i32::from(h);
    }

    #[must_use]
    pub fn screen_to_world(&self, sx: i32, sy: i32) -> (f64, f64) {
        (
            f64::from(sx - MARGIN_X) / self.zoom + self.origin_x,
            f64::from(sy - MARGIN_Y) / self.zoom + self.origin_y,
        )
    }

    /// Project a world point, rounding to the nearest screen cell.
    #[must_use]
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (i32, i32) {
        (
            (f64::from(MARGIN_X) + (wx - self.origin_x) * self.zoom).round() as i32,
            (f64::from(MARGIN_Y) + (wy - self.origin_y) * self.zoom).round() as i32,
        )
    }

    /// Discrete world cell represented by a screen cell.
    ///
    /// At `zoom >= 1` this is the nearest cell (half away from zero). Below 1
    /// each screen cell covers a `1/zoom` block and the block's top-left
    /// cell is returned.
    #[must_use]
    pub fn world_cell_under_screen(&self, sx: i32, sy: i32) -> (i64, i64) {
        let (wx, wy) = self.screen_to_world(sx, sy);
        if self.zoom >= 1.0 {
            (wx.round() as i64, wy.round() as i64)
        } else {
            let block = 1.0 / self.zoom;
            (
                (wx - block * 0.5).floor() as i64,
                (wy - block * 0.5).floor() as i64,
            )
        }
    }

    /// World-space extent of the map area, never below 1.
    #[must_use]
    pub fn visible_world_size(&self) -> (f64, f64) {
        (
            (f64::from(self.screen_w - MARGIN_X) / self.zoom).max(1.0),
            (f64::from(self.screen_h - 2) / self.zoom).max(1.0),
        )
    }

    /// Rescale by `factor` keeping `(wx, wy)` under the same screen cell.
    ///
    /// The new zoom is clamped to `[min_zoom, max_zoom]`; if that leaves it
    /// unchanged nothing happens.
    pub fn zoom_around(&mut self, wx: f64, wy: f64, factor: f64, min_zoom: f64, max_zoom: f64) {
        let (sx, sy) = self.world_to_screen(wx, wy);
        let new_zoom = clamp_zoom(self.zoom * factor, min_zoom, max_zoom);
        if (new_zoom - self.zoom).abs() < ZOOM_EPSILON {
            return;
        }
        self.origin_x = wx - f64::from(sx - MARGIN_X) / new_zoom;
        self.origin_y = wy - f64::from(sy - MARGIN_Y) / new_zoom;
        self.zoom = new_zoom;
    }

    /// Jump to `new_zoom` keeping the world point under `(sx, sy)` fixed.
    pub fn reset_zoom_around_screen_point(&mut self, sx: i32, sy: i32, new_zoom: f64) {
        let target = clamp_zoom(new_zoom, MIN_ZOOM, MAX_ZOOM);
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.zoom_around(wx, wy, target / self.zoom, MIN_ZOOM, MAX_ZOOM);
    }

    /// Pan by a world-space delta.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.origin_x += dx;
        self.origin_y += dy;
    }

    /// Pan so `(wx, wy)` sits in the middle of the map area.
    pub fn center_on(&mut self, wx: f64, wy: f64) {
        self.origin_x = wx - f64::from(self.screen_w - MARGIN_X) / (2.0 * self.zoom);
        self.origin_y = wy - f64::from(self.screen_h - 2) / (2.0 * self.zoom);
    }

    /// Integer world bounds `(x0, y0, x1, y1)` covered by the map area.
    #[must_use]
    pub fn world_rect(&self) -> (i64, i64, i64, i64) {
        let (ax, ay) = self.screen_to_world(MARGIN_X, MARGIN_Y);
        let (bx, by) = self.screen_to_world(self.screen_w - 1, self.screen_h - 2);
        (
            ax.min(bx).floor() as i64,
            ay.min(by).floor() as i64,
            ax.max(bx).ceil() as i64,
            ay.max(by).ceil() as i64,
        )
    }
}

fn clamp_zoom(zoom: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    if zoom.is_nan() {
        return min_zoom;
    }
    zoom.clamp(min_zoom, max_zoom)
}
