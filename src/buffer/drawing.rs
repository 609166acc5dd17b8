//! Text, box and tooltip drawing on top of [`CellBuffer`].

use crate::buffer::CellBuffer;
use crate::cell::Cell;
use crate::color::Rgb;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Box drawing glyph set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BoxGlyphs {
    /// Single-line box drawing characters.
    pub const SINGLE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };
}

impl Default for BoxGlyphs {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Colors and translucency of a tooltip box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipStyle {
    pub bg: Rgb,
    pub border: Rgb,
    pub fg: Rgb,
    pub bg_alpha: u8,
    pub border_alpha: u8,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            bg: Rgb::new(20, 20, 20),
            border: Rgb::WHITE,
            fg: Rgb::new(245, 245, 245),
            bg_alpha: 255,
            border_alpha: 255,
        }
    }
}

impl TooltipStyle {
    #[must_use]
    pub fn with_alphas(self, bg_alpha: u8, border_alpha: u8) -> Self {
        Self {
            bg_alpha,
            border_alpha,
            ..self
        }
    }
}

/// Horizontal padding inside a tooltip box, per side.
const TOOLTIP_PAD_X: i32 = 1;

/// Minimum tooltip box width.
const TOOLTIP_MIN_WIDTH: i32 = 6;

/// Split on `\r\n`, `\n` or `\r`.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    lines.push(rest);
    lines
}

/// Box width for the given lines on a screen `screen_w` columns wide.
#[must_use]
pub fn tooltip_width(lines: &[&str], screen_w: i32) -> i32 {
    let longest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    let longest = i32::try_from(longest).unwrap_or(i32::MAX - 2);
    (longest + TOOLTIP_PAD_X * 2).clamp(TOOLTIP_MIN_WIDTH.min(screen_w), screen_w.max(1))
}

/// Keep the longest prefix of `s` that fits in `cols` columns.
pub(crate) fn truncate_to_width(s: &str, cols: usize) -> &str {
    let mut used = 0;
    for (i, ch) in s.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > cols {
            return &s[..i];
        }
    }
    s
}

impl CellBuffer {
    /// Draw text with explicit colors, one glyph per column.
    ///
    /// Wide glyphs advance two columns; control and zero-width characters
    /// are skipped.
    pub fn put_text(&mut self, x: i32, y: i32, text: &str, fg: Rgb, bg: Rgb) {
        let mut col = x;
        for ch in text.chars() {
            let Some(w) = ch.width().filter(|w| *w > 0) else {
                continue;
            };
            self.try_set(col, y, Cell::new(ch, fg, bg));
            col = col.saturating_add(w as i32);
        }
    }

    /// Draw text keeping whatever background each cell already has.
    ///
    /// Stops at the right edge of the buffer.
    pub fn put_text_keep_bg(&mut self, x: i32, y: i32, text: &str, fg: Rgb) {
        let mut col = x;
        for ch in text.chars() {
            let Some(w) = ch.width().filter(|w| *w > 0) else {
                continue;
            };
            if col >= i32::from(self.width()) {
                break;
            }
            if let Some(cur) = self.get(col, y).copied() {
                self.try_set(col, y, Cell::new(ch, fg, cur.bg));
            }
            col = col.saturating_add(w as i32);
        }
    }

    /// Draw a box outline; glyphs take `fg` and keep the existing background.
    pub fn draw_box_outline(&mut self, x: i32, y: i32, w: i32, h: i32, glyphs: BoxGlyphs, fg: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x1, y1) = (x + w - 1, y + h - 1);
        for cx in x + 1..x1 {
            self.put_glyph_keep_bg(cx, y, glyphs.horizontal, fg);
            self.put_glyph_keep_bg(cx, y1, glyphs.horizontal, fg);
        }
        for cy in y + 1..y1 {
            self.put_glyph_keep_bg(x, cy, glyphs.vertical, fg);
            self.put_glyph_keep_bg(x1, cy, glyphs.vertical, fg);
        }
        self.put_glyph_keep_bg(x, y, glyphs.top_left, fg);
        self.put_glyph_keep_bg(x1, y, glyphs.top_right, fg);
        self.put_glyph_keep_bg(x, y1, glyphs.bottom_left, fg);
        self.put_glyph_keep_bg(x1, y1, glyphs.bottom_right, fg);
    }

    pub(crate) fn put_glyph_keep_bg(&mut self, x: i32, y: i32, ch: char, fg: Rgb) {
        if let Some(cur) = self.get(x, y).copied() {
            self.try_set(x, y, Cell::new(ch, fg, cur.bg));
        }
    }

    /// Draw a bordered text box with its top-left corner near `(x0, y0)`.
    ///
    /// The box is shifted left and up when it would overflow the right edge
    /// or the status row. Lines longer than the inner width are cut.
    pub fn draw_tooltip_box(&mut self, x0: i32, y0: i32, lines: &[&str], style: TooltipStyle) {
        if lines.is_empty() {
            return;
        }
        let (sw, sh) = (i32::from(self.width()), i32::from(self.height()));
        let rows = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        let w = tooltip_width(lines, sw);

        let mut x0 = x0;
        let mut y0 = y0;
        if x0 + w >= sw {
            x0 = (sw - w - 1).max(0);
        }
        if y0 + rows >= sh - 1 {
            y0 = (sh - 1 - rows).max(0);
        }

        let opaque = (style.bg_alpha == 255 && style.border_alpha == 255) || !self.alpha_blend_enabled();
        let inner = usize::try_from(w - TOOLTIP_PAD_X * 2).unwrap_or(0);

        for (row, line) in lines.iter().enumerate() {
            let y = y0 + row as i32;
            if y >= sh {
                break;
            }

            for x in x0..x0 + w {
                if opaque {
                    self.try_set(x, y, Cell::blank(style.fg, style.bg));
                } else {
                    self.blend_bg_and_fg(x, y, style.bg, style.bg_alpha, style.bg, style.bg_alpha);
                }
            }

            if opaque {
                self.try_set(x0, y, Cell::blank(style.fg, style.border));
                self.try_set(x0 + w - 1, y, Cell::blank(style.fg, style.border));
            } else {
                self.blend_bg(x0, y, style.border, style.border_alpha);
                self.blend_bg(x0 + w - 1, y, style.border, style.border_alpha);
            }

            let text = truncate_to_width(line, inner);
            if opaque {
                self.put_text(x0 + TOOLTIP_PAD_X, y, text, style.fg, style.bg);
            } else {
                self.put_text_keep_bg(x0 + TOOLTIP_PAD_X, y, text, style.fg);
            }
        }
    }
}
