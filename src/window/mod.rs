//! Floating panels drawn over the map.
//!
//! A [`Window`] is a bordered, optionally translucent rectangle with a
//! title row that can be dragged and an `[X]` close button. Windows live
//! in a [`WindowManager`], which owns z-order, focus and drag state.

mod manager;

pub use manager::WindowManager;

use crate::buffer::{BoxGlyphs, CellBuffer};
use crate::cell::Cell;
use crate::color::Rgb;
use std::fmt;

/// Draws window content after background and border.
pub type ContentFn = Box<dyn Fn(&mut CellBuffer, &Window)>;

/// Called once when a window is closed through its `[X]` button.
pub type CloseFn = Box<dyn FnMut(&Window)>;

/// Handle assigned by [`WindowManager::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    const UNASSIGNED: Self = Self(0);

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What part of a window a point falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowHit {
    None,
    Close,
    TitleBar,
    Body,
}

/// A floating panel.
pub struct Window {
    id: WindowId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Larger values draw later, on top.
    pub z: i32,
    pub visible: bool,
    pub draggable: bool,
    pub show_close_button: bool,
    pub bg_color: Rgb,
    /// 255 is an opaque background.
    pub bg_alpha: u8,
    pub border_color: Rgb,
    pub border_color_active: Rgb,
    pub border_alpha: u8,
    pub text_color: Rgb,
    content: Option<ContentFn>,
    on_close: Option<CloseFn>,
}

impl Window {
    /// A window with the default style at the given rectangle.
    #[must_use]
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: WindowId::UNASSIGNED,
            x,
            y,
            w,
            h,
            z: 0,
            visible: true,
            draggable: true,
            show_close_button: true,
            bg_color: Rgb::new(20, 20, 20),
            bg_alpha: 180,
            border_color: Rgb::WHITE,
            border_color_active: Rgb::new(255, 230, 120),
            border_alpha: 220,
            text_color: Rgb::new(245, 245, 245),
            content: None,
            on_close: None,
        }
    }

    #[must_use]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Rgb, alpha: u8) -> Self {
        self.bg_color = color;
        self.bg_alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_border(mut self, color: Rgb, alpha: u8) -> Self {
        self.border_color = color;
        self.border_alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Fn(&mut CellBuffer, &Window) + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    #[must_use]
    pub fn with_on_close(mut self, on_close: impl FnMut(&Window) + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    pub fn set_content(&mut self, content: Option<ContentFn>) {
        self.content = content;
    }

    pub fn set_on_close(&mut self, on_close: Option<CloseFn>) {
        self.on_close = on_close;
    }

    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    #[must_use]
    pub fn contains(&self, mx: i32, my: i32) -> bool {
        mx >= self.x && mx < self.x + self.w && my >= self.y && my < self.y + self.h
    }

    /// Columns of `[` and `]` on the top row, when the button is shown.
    #[must_use]
    pub fn close_button_span(&self) -> Option<(i32, i32)> {
        if !self.show_close_button || self.w < 5 {
            return None;
        }
        Some((self.x + self.w - 4, self.x + self.w - 2))
    }

    #[must_use]
    pub fn is_in_close_button(&self, mx: i32, my: i32) -> bool {
        self.close_button_span()
            .is_some_and(|(x0, x1)| my == self.y && (x0..=x1).contains(&mx))
    }

    /// The top row of a draggable window.
    #[must_use]
    pub fn is_in_title_bar(&self, mx: i32, my: i32) -> bool {
        self.draggable && my == self.y && mx >= self.x && mx < self.x + self.w
    }

    #[must_use]
    pub fn hit(&self, mx: i32, my: i32) -> WindowHit {
        if !self.contains(mx, my) {
            WindowHit::None
        } else if self.is_in_close_button(mx, my) {
            WindowHit::Close
        } else if self.is_in_title_bar(mx, my) {
            WindowHit::TitleBar
        } else {
            WindowHit::Body
        }
    }

    /// Keep the rectangle on screen.
    ///
    /// A window larger than the screen in either axis is pinned to the
    /// origin of that axis and shrunk to fit.
    pub fn clamp_to_screen(&mut self, screen_w: i32, screen_h: i32) {
        (self.x, self.w) = clamp_axis(self.x, self.w, screen_w);
        (self.y, self.h) = clamp_axis(self.y, self.h, screen_h);
    }

    /// Paint background, border, close button and content.
    ///
    /// The background is opaque when both alphas are 255 or the buffer is
    /// in opaque mode. Border glyphs keep the blended background.
    pub fn draw(&self, buf: &mut CellBuffer, active: bool) {
        if self.w <= 0 || self.h <= 0 {
            return;
        }
        let (bw, bh) = (i32::from(buf.width()), i32::from(buf.height()));
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (bw - 1).min(self.x + self.w - 1);
        let y1 = (bh - 1).min(self.y + self.h - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let opaque =
            (self.bg_alpha == 255 && self.border_alpha == 255) || !buf.alpha_blend_enabled();

        for y in y0..=y1 {
            for x in x0..=x1 {
                if opaque {
                    buf.try_set(x, y, Cell::blank(self.text_color, self.bg_color));
                } else {
                    buf.blend_bg_and_fg(x, y, self.bg_color, self.bg_alpha, self.bg_color, self.bg_alpha);
                }
            }
        }

        let border = if active {
            self.border_color_active
        } else {
            self.border_color
        };
        buf.draw_box_outline(x0, y0, x1 - x0 + 1, y1 - y0 + 1, BoxGlyphs::SINGLE, border);

        let mut put = |x: i32, y: i32, ch: char| {
            if opaque {
                buf.try_set(x, y, Cell::new(ch, border, self.bg_color));
            } else {
                buf.put_glyph_keep_bg(x, y, ch, border);
            }
        };
        if let Some((cx0, cx1)) = self.close_button_span() {
            put(cx0, self.y, '[');
            put(cx0 + 1, self.y, 'X');
            put(cx1, self.y, ']');
        }

        if let Some(content) = &self.content {
            content(buf, self);
        }
    }
}

fn clamp_axis(pos: i32, len: i32, screen: i32) -> (i32, i32) {
    if len > screen {
        (0, screen)
    } else if pos < 0 {
        (0, len)
    } else if pos + len > screen {
        ((screen - len).max(0), len)
    } else {
        (pos, len)
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("rect", &(self.x, self.y, self.w, self.h))
            .field("z", &self.z)
            .field("visible", &self.visible)
            .field("has_content", &self.content.is_some())
            .finish_non_exhaustive()
    }
}
