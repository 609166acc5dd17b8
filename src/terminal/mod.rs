//! Terminal control channel: lifecycle sequences, raw mode and frame output.

mod capabilities;
mod raw;

pub use capabilities::{Capabilities, ColorSupport};
pub use raw::{RawModeGuard, enable_raw_mode, is_tty, terminal_size};

use crate::ansi::{AnsiWriter, ColorMode, sequences};
use crate::buffer::CellBuffer;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Size used when the real size cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Output stream plus the modes switched on for the UI.
///
/// [`cleanup`](Self::cleanup) undoes every mode and also runs on drop.
pub struct Terminal<W: Write> {
    out: AnsiWriter<W>,
    alt_screen: bool,
    mouse_enabled: bool,
    cursor_hidden: bool,
    raw_mode_guard: Option<RawModeGuard>,
    fixed_size: Option<(u16, u16)>,
}

impl<W: Write> Terminal<W> {
    /// Wrap `writer`; nothing is written until a mode is switched on.
    pub fn new(writer: W) -> Self {
        Self {
            out: AnsiWriter::new(writer),
            alt_screen: false,
            mouse_enabled: false,
            cursor_hidden: false,
            raw_mode_guard: None,
            fixed_size: None,
        }
    }

    /// Report a fixed size instead of querying the tty.
    #[must_use]
    pub fn with_fixed_size(mut self, width: u16, height: u16) -> Self {
        self.fixed_size = Some((width.max(1), height.max(1)));
        self
    }

    pub fn set_fixed_size(&mut self, width: u16, height: u16) {
        self.fixed_size = Some((width.max(1), height.max(1)));
    }

    /// Current size in cells, falling back to 80x24 when unknown.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        if let Some(size) = self.fixed_size {
            return size;
        }
        terminal_size().unwrap_or(FALLBACK_SIZE)
    }

    /// Whether stdin is held in raw mode.
    #[must_use]
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode_guard.is_some()
    }

    #[must_use]
    pub fn is_alt_screen(&self) -> bool {
        self.alt_screen
    }

    #[must_use]
    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Enter raw mode on stdin.
    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.raw_mode_guard.is_none() {
            self.raw_mode_guard = Some(enable_raw_mode()?);
        }
        Ok(())
    }

    /// Restore the tty settings saved by [`enter_raw_mode`](Self::enter_raw_mode).
    pub fn exit_raw_mode(&mut self) {
        self.raw_mode_guard = None;
    }

    pub fn enter_alt_screen(&mut self) {
        if !self.alt_screen {
            self.out.write_str(sequences::ALT_SCREEN_ON);
            self.alt_screen = true;
        }
    }

    pub fn leave_alt_screen(&mut self) {
        if self.alt_screen {
            self.out.write_str(sequences::ALT_SCREEN_OFF);
            self.alt_screen = false;
        }
    }

    /// Ask for any-motion SGR mouse reports.
    pub fn enable_mouse(&mut self) {
        if !self.mouse_enabled {
            self.out.write_str(sequences::MOUSE_ON);
            self.mouse_enabled = true;
        }
    }

    /// Send the mouse enable sequence even if it was sent before.
    ///
    /// Some terminals drop mouse reporting on resize.
    pub fn reenable_mouse(&mut self) {
        self.out.write_str(sequences::MOUSE_ON);
        self.mouse_enabled = true;
    }

    pub fn disable_mouse(&mut self) {
        if self.mouse_enabled {
            self.out.write_str(sequences::MOUSE_OFF);
            self.mouse_enabled = false;
        }
    }

    pub fn hide_cursor(&mut self) {
        if !self.cursor_hidden {
            self.out.write_str(sequences::CURSOR_HIDE);
            self.cursor_hidden = true;
        }
    }

    pub fn show_cursor(&mut self) {
        if self.cursor_hidden {
            self.out.write_str(sequences::CURSOR_SHOW);
            self.cursor_hidden = false;
        }
    }

    /// Clear the screen and home the cursor.
    pub fn clear(&mut self) {
        self.out.write_str(sequences::CLEAR_SCREEN);
        self.out.write_str(sequences::CURSOR_HOME);
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.out.color_mode()
    }

    /// Switch output color depth, resetting attributes so no stale colors
    /// from the previous mode survive.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if self.out.color_mode() != mode {
            debug!(?mode, "color mode switched");
        }
        self.out.set_color_mode(mode);
        self.out.write_str(sequences::RESET);
    }

    /// Serialize a full frame and flush it.
    pub fn draw(&mut self, frame: &CellBuffer) -> io::Result<()> {
        self.out.write_frame(frame);
        self.out.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// The underlying writer; bytes still queued are not included.
    pub fn writer_mut(&mut self) -> &mut W {
        self.out.writer_mut()
    }

    /// Raw mode, alternate screen, hidden cursor and mouse reporting.
    ///
    /// A tty that refuses raw mode is logged and skipped.
    pub fn setup(&mut self) -> io::Result<()> {
        if let Err(err) = self.enter_raw_mode() {
            warn!(%err, "raw mode unavailable, continuing without it");
        }
        self.enter_alt_screen();
        self.hide_cursor();
        self.enable_mouse();
        self.clear();
        self.flush()
    }

    /// Undo everything [`setup`](Self::setup) did.
    pub fn cleanup(&mut self) -> io::Result<()> {
        self.out.write_str(sequences::RESET);
        self.disable_mouse();
        self.show_cursor();
        self.leave_alt_screen();
        self.exit_raw_mode();
        self.flush()
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::color::Rgb;

    #[test]
    fn test_new_terminal_has_no_modes() {
        let terminal = Terminal::new(Vec::new());
        assert!(!terminal.is_alt_screen());
        assert!(!terminal.is_mouse_enabled());
        assert!(!terminal.is_raw_mode());
    }

    #[test]
    fn test_fixed_size() {
        let terminal = Terminal::new(Vec::new()).with_fixed_size(120, 0);
        assert_eq!(terminal.size(), (120, 1));
    }

    #[test]
    fn test_mode_sequences_written_once() {
        let mut output = Vec::new();
        {
            let mut terminal = Terminal::new(&mut output);
            terminal.enter_alt_screen();
            terminal.enter_alt_screen();
            terminal.enable_mouse();
            terminal.enable_mouse();
            terminal.hide_cursor();
            terminal.flush().unwrap();
        }
        let s = String::from_utf8_lossy(&output);
        assert!(s.starts_with("\x1b[?1049h\x1b[?1003h\x1b[?1006h\x1b[?25l"));
        assert_eq!(s.matches(sequences::ALT_SCREEN_ON).count(), 1);
        assert_eq!(s.matches(sequences::MOUSE_ON).count(), 1);
    }

    #[test]
    fn test_cleanup_on_drop_restores_modes() {
        let mut output = Vec::new();
        {
            let mut terminal = Terminal::new(&mut output);
            terminal.enter_alt_screen();
            terminal.enable_mouse();
            terminal.hide_cursor();
            terminal.flush().unwrap();
        }
        let s = String::from_utf8_lossy(&output);
        assert!(s.contains(sequences::MOUSE_OFF));
        assert!(s.contains(sequences::CURSOR_SHOW));
        assert!(s.ends_with(sequences::ALT_SCREEN_OFF));
    }

    #[test]
    fn test_reenable_mouse_always_writes() {
        let mut output = Vec::new();
        {
            let mut terminal = Terminal::new(&mut output);
            terminal.enable_mouse();
            terminal.reenable_mouse();
            terminal.flush().unwrap();
        }
        let s = String::from_utf8_lossy(&output);
        assert_eq!(s.matches(sequences::MOUSE_ON).count(), 2);
    }

    #[test]
    fn test_draw_writes_frame() {
        let mut output = Vec::new();
        {
            let mut terminal = Terminal::new(&mut output);
            terminal.set_color_mode(ColorMode::Color16);
            let mut buf = CellBuffer::new(2, 1);
            buf.set(0, 0, Cell::new('@', Rgb::WHITE, Rgb::BLACK));
            terminal.draw(&buf).unwrap();
        }
        let s = String::from_utf8_lossy(&output);
        assert!(s.starts_with("\x1b[0m\x1b[H\x1b[40m\x1b[97m@ \x1b[0m"));
    }
}
