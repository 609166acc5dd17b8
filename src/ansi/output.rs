//! Buffered frame serializer with color state tracking.

use crate::ansi::{self, ColorMode};
use crate::buffer::CellBuffer;
use crate::color::Rgb;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Buffered writer that tracks the last emitted colors so each frame only
/// carries the escape codes where a color actually changes.
pub struct AnsiWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    color_mode: ColorMode,
    current_fg: Option<Rgb>,
    current_bg: Option<Rgb>,
}

impl<W: Write> AnsiWriter<W> {
    /// Create a new ANSI writer wrapping the given output.
    pub fn new(writer: W) -> Self {
        Self::with_color_mode(writer, ColorMode::TrueColor)
    }

    /// Create a new ANSI writer with specified color mode.
    pub fn with_color_mode(writer: W, color_mode: ColorMode) -> Self {
        Self {
            writer,
            buffer: Vec::with_capacity(8192),
            color_mode,
            current_fg: None,
            current_bg: None,
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.reset_state();
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Forget the last emitted colors so the next cell emits both.
    pub fn reset_state(&mut self) {
        self.current_fg = None;
        self.current_bg = None;
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    /// Set foreground color if different from current.
    pub fn set_fg(&mut self, color: Rgb) {
        if self.current_fg != Some(color) {
            let _ = ansi::write_fg_color_with_mode(&mut self.buffer, color, self.color_mode);
            self.current_fg = Some(color);
        }
    }

    /// Set background color if different from current.
    pub fn set_bg(&mut self, color: Rgb) {
        if self.current_bg != Some(color) {
            let _ = ansi::write_bg_color_with_mode(&mut self.buffer, color, self.color_mode);
            self.current_bg = Some(color);
        }
    }

    /// Write a glyph with the given colors at the cursor.
    pub fn write_glyph(&mut self, ch: char, fg: Rgb, bg: Rgb) {
        self.set_bg(bg);
        self.set_fg(fg);
        let mut utf8 = [0u8; 4];
        self.buffer
            .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Serialize a whole buffer: cursor home, every row left to right with
    /// `\r\n` between rows, then an attribute reset.
    ///
    /// Color state starts uninitialized, so the first cell always emits both
    /// colors. Control and zero-width glyphs are written as spaces; the
    /// cell after a wide glyph is skipped.
    pub fn write_frame(&mut self, frame: &CellBuffer) {
        self.reset_state();
        self.write_str(ansi::CURSOR_HOME);
        for (y, row) in frame.rows().enumerate() {
            if y > 0 {
                self.buffer.extend_from_slice(b"\r\n");
            }
            let mut skip = 0;
            for cell in row {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let (ch, width) = match cell.ch.width() {
                    Some(w) if w > 0 => (cell.ch, w),
                    _ => (' ', 1),
                };
                self.write_glyph(ch, cell.fg, cell.bg);
                skip = width - 1;
            }
        }
        self.write_str(ansi::RESET);
    }

    /// Bytes queued since the last flush.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Write queued bytes to the underlying writer and flush it.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer)?;
        self.buffer.clear();
        self.writer.flush()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
