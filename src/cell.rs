//! A single character position on screen or in a world.

use crate::color::Rgb;

/// One glyph with its foreground and background colors.
///
/// Cells are plain values: the buffer overwrites them wholesale or through
/// its blend operations, never through shared references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    #[must_use]
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }

    /// A space that only carries a background color.
    #[must_use]
    pub const fn blank(fg: Rgb, bg: Rgb) -> Self {
        Self::new(' ', fg, bg)
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    #[must_use]
    pub const fn with_fg(self, fg: Rgb) -> Self {
        Self { fg, ..self }
    }

    #[must_use]
    pub const fn with_bg(self, bg: Rgb) -> Self {
        Self { bg, ..self }
    }
}

impl Default for Cell {
    /// Space, white on black.
    fn default() -> Self {
        Self::new(' ', Rgb::WHITE, Rgb::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell() {
        let cell = Cell::default();
        assert!(cell.is_blank());
        assert_eq!(cell.fg, Rgb::WHITE);
        assert_eq!(cell.bg, Rgb::BLACK);
    }

    #[test]
    fn test_with_colors() {
        let cell = Cell::new('x', Rgb::RED, Rgb::BLUE)
            .with_fg(Rgb::GREEN)
            .with_bg(Rgb::GRAY);
        assert_eq!(cell, Cell::new('x', Rgb::GREEN, Rgb::GRAY));
    }
}
