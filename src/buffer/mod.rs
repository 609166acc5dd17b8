//! Fixed-size cell grid with alpha compositing.
//!
//! [`CellBuffer`] is the single drawing surface of a frame. The scheduler
//! owns it and lends it to the world sampler, overlays and windows, which
//! paint into it in layer order before the output engine serializes it.
//!
//! Every write is bounds-checked. Coordinates are signed because overlay and
//! window math routinely produces positions left of or above the screen;
//! such writes are silently dropped.
//!
//! # Opaque mode
//!
//! When [`alpha_blend_enabled`](CellBuffer::alpha_blend_enabled) is false
//! (16-color output), the destination cannot show translucency. Every blend
//! then overwrites the affected channels with the requested colors, whatever
//! the alpha argument.
//!
//! ```
//! use gridscope::{Cell, CellBuffer, Rgb};
//!
//! let mut buf = CellBuffer::new(20, 10);
//! buf.blend_bg(3, 3, Rgb::new(200, 0, 0), 128);
//! assert_eq!(buf.get(3, 3).unwrap().bg, Rgb::new(100, 0, 0));
//!
//! buf.set_alpha_blend_enabled(false);
//! buf.blend_bg(3, 3, Rgb::new(200, 0, 0), 1);
//! assert_eq!(buf.get(3, 3).unwrap().bg, Rgb::new(200, 0, 0));
//! ```

mod drawing;

pub use drawing::{BoxGlyphs, TooltipStyle, split_lines, tooltip_width};
pub(crate) use drawing::truncate_to_width;

use crate::cell::Cell;
use crate::color::Rgb;

/// Grid of cells sized to the terminal.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    alpha_blend_enabled: bool,
}

impl CellBuffer {
    /// Create a buffer filled with the default cell.
    ///
    /// Zero dimensions are clamped to 1.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            alpha_blend_enabled: true,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn alpha_blend_enabled(&self) -> bool {
        self.alpha_blend_enabled
    }

    pub fn set_alpha_blend_enabled(&mut self, enabled: bool) {
        self.alpha_blend_enabled = enabled;
    }

    /// Reallocate to the new size and reset every cell to the default.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.cells = vec![Cell::default(); usize::from(self.width) * usize::from(self.height)];
    }

    /// Overwrite every cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Reset every cell to the default (space, white on black).
    pub fn clear(&mut self) {
        self.fill(Cell::default());
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        if x >= w || y >= h {
            return None;
        }
        Some(y * w + x)
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.cell_index(x, y).is_some()
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cell_index(x, y).map(|idx| &self.cells[idx])
    }

    /// Write a cell; out-of-bounds positions are ignored.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        self.try_set(x, y, cell);
    }

    /// Write a cell and report whether the position was inside the buffer.
    pub fn try_set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.cell_index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Composite `color` into the background only.
    pub fn blend_bg(&mut self, x: i32, y: i32, color: Rgb, alpha: u8) {
        let opaque = !self.alpha_blend_enabled;
        if let Some(idx) = self.cell_index(x, y) {
            let dst = &mut self.cells[idx];
            dst.bg = if opaque {
                color
            } else {
                Rgb::blend(color, alpha, dst.bg)
            };
        }
    }

    /// Composite the background and tint the foreground independently.
    ///
    /// The glyph is left as is.
    pub fn blend_bg_and_fg(
        &mut self,
        x: i32,
        y: i32,
        bg: Rgb,
        bg_alpha: u8,
        fg_tint: Rgb,
        fg_alpha: u8,
    ) {
        let opaque = !self.alpha_blend_enabled;
        if let Some(idx) = self.cell_index(x, y) {
            let dst = &mut self.cells[idx];
            if opaque {
                dst.bg = bg;
                dst.fg = fg_tint;
            } else {
                dst.bg = Rgb::blend(bg, bg_alpha, dst.bg);
                dst.fg = Rgb::blend(fg_tint, fg_alpha, dst.fg);
            }
        }
    }

    /// Composite a whole cell.
    ///
    /// The background always blends from `top.bg`. The glyph and foreground
    /// change only when `replace_char` is set or `top` carries a non-space
    /// glyph, so blank cells paint background without erasing text.
    pub fn blend_cell(&mut self, x: i32, y: i32, top: Cell, fg_alpha: u8, bg_alpha: u8, replace_char: bool) {
        let opaque = !self.alpha_blend_enabled;
        if let Some(idx) = self.cell_index(x, y) {
            let dst = &mut self.cells[idx];
            let take_glyph = replace_char || !top.is_blank();
            if opaque {
                dst.bg = top.bg;
                if take_glyph {
                    dst.ch = top.ch;
                    dst.fg = top.fg;
                }
            } else {
                dst.bg = Rgb::blend(top.bg, bg_alpha, dst.bg);
                if take_glyph {
                    dst.ch = top.ch;
                    dst.fg = Rgb::blend(top.fg, fg_alpha, dst.fg);
                }
            }
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }
}

impl Default for CellBuffer {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
