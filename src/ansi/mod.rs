//! ANSI escape sequence generation.

pub mod output;
pub mod sequences;

pub use output::AnsiWriter;
pub use sequences::*;

use crate::color::Rgb;
use crate::terminal::ColorSupport;
use std::fmt;
use std::io::{self, Write};

/// Color depth used when serializing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// True color (24-bit RGB).
    #[default]
    TrueColor,
    /// 16-color (basic ANSI), nearest palette entry per color.
    Color16,
}

impl ColorMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::TrueColor => Self::Color16,
            Self::Color16 => Self::TrueColor,
        }
    }
}

impl From<ColorSupport> for ColorMode {
    fn from(support: ColorSupport) -> Self {
        match support {
            ColorSupport::TrueColor => ColorMode::TrueColor,
            ColorSupport::Extended | ColorSupport::Basic | ColorSupport::None => ColorMode::Color16,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TrueColor => "TrueColor",
            Self::Color16 => "Color16",
        })
    }
}

/// Write a u8 as decimal digits to a writer without formatting overhead.
#[inline]
fn write_u8_decimal(w: &mut impl Write, n: u8) -> io::Result<()> {
    if n >= 100 {
        w.write_all(&[b'0' + n / 100, b'0' + (n / 10) % 10, b'0' + n % 10])
    } else if n >= 10 {
        w.write_all(&[b'0' + n / 10, b'0' + n % 10])
    } else {
        w.write_all(&[b'0' + n])
    }
}

fn write_color(w: &mut impl Write, color: Rgb, mode: ColorMode, background: bool) -> io::Result<()> {
    match mode {
        ColorMode::TrueColor => {
            w.write_all(if background { b"\x1b[48;2;" } else { b"\x1b[38;2;" })?;
            write_u8_decimal(w, color.r)?;
            w.write_all(b";")?;
            write_u8_decimal(w, color.g)?;
            w.write_all(b";")?;
            write_u8_decimal(w, color.b)?;
            w.write_all(b"m")
        }
        ColorMode::Color16 => {
            let idx = color.nearest_ansi16();
            // 30-37/90-97 foreground, 40-47/100-107 background
            let (normal, bright) = if background { (40, 100) } else { (30, 90) };
            let code = if idx < 8 { normal + idx } else { bright + idx - 8 };
            w.write_all(b"\x1b[")?;
            write_u8_decimal(w, code)?;
            w.write_all(b"m")
        }
    }
}

/// Write SGR sequence for a foreground color.
pub fn write_fg_color_with_mode(w: &mut impl Write, color: Rgb, mode: ColorMode) -> io::Result<()> {
    write_color(w, color, mode, false)
}

/// Write SGR sequence for a background color.
pub fn write_bg_color_with_mode(w: &mut impl Write, color: Rgb, mode: ColorMode) -> io::Result<()> {
    write_color(w, color, mode, true)
}

/// SGR sequence for a foreground color as a string.
#[must_use]
pub fn fg_color_with_mode(color: Rgb, mode: ColorMode) -> String {
    let mut buf = Vec::with_capacity(20);
    let _ = write_fg_color_with_mode(&mut buf, color, mode);
    String::from_utf8_lossy(&buf).into_owned()
}

/// SGR sequence for a background color as a string.
#[must_use]
pub fn bg_color_with_mode(color: Rgb, mode: ColorMode) -> String {
    let mut buf = Vec::with_capacity(20);
    let _ = write_bg_color_with_mode(&mut buf, color, mode);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ANSI16_PALETTE;

    #[test]
    fn test_sgr_colors_rgb_format() {
        let c = Rgb::new(255, 7, 42);
        assert_eq!(fg_color_with_mode(c, ColorMode::TrueColor), "\x1b[38;2;255;7;42m");
        assert_eq!(bg_color_with_mode(c, ColorMode::TrueColor), "\x1b[48;2;255;7;42m");
    }

    #[test]
    fn test_sgr_colors_16_mapping() {
        let expected_fg = [30, 31, 32, 33, 34, 35, 36, 37, 90, 91, 92, 93, 94, 95, 96, 97];
        for (color, code) in ANSI16_PALETTE.iter().zip(expected_fg) {
            assert_eq!(fg_color_with_mode(*color, ColorMode::Color16), format!("\x1b[{code}m"));
            assert_eq!(
                bg_color_with_mode(*color, ColorMode::Color16),
                format!("\x1b[{}m", code + 10)
            );
        }
    }

    #[test]
    fn test_color_boundary_values() {
        assert_eq!(fg_color_with_mode(Rgb::BLACK, ColorMode::TrueColor), "\x1b[38;2;0;0;0m");
        assert_eq!(
            bg_color_with_mode(Rgb::WHITE, ColorMode::TrueColor),
            "\x1b[48;2;255;255;255m"
        );
    }

    #[test]
    fn test_color_mode_from_support() {
        assert_eq!(ColorMode::from(ColorSupport::TrueColor), ColorMode::TrueColor);
        assert_eq!(ColorMode::from(ColorSupport::Extended), ColorMode::Color16);
        assert_eq!(ColorMode::from(ColorSupport::None), ColorMode::Color16);
    }

    #[test]
    fn test_color_mode_toggle_and_display() {
        assert_eq!(ColorMode::TrueColor.toggled(), ColorMode::Color16);
        assert_eq!(ColorMode::Color16.toggled(), ColorMode::TrueColor);
        assert_eq!(ColorMode::Color16.to_string(), "Color16");
    }
}
