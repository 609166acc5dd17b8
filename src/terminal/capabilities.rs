//! Color depth detection from `COLORTERM` and `TERM`.

use std::env;
use tracing::debug;

/// How many colors the host terminal advertises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorSupport {
    /// `TERM` unset or `dumb`.
    #[default]
    None,
    /// The 16 ANSI colors.
    Basic,
    /// The xterm 256-color palette.
    Extended,
    /// 24-bit RGB.
    TrueColor,
}

/// What the environment says about the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub color: ColorSupport,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            color: ColorSupport::TrueColor,
        }
    }
}

/// `TERM` fragments of emulators known to accept 24-bit SGR colors.
const TRUECOLOR_TERMS: &[&str] = &[
    "256color",
    "24bit",
    "truecolor",
    "alacritty",
    "kitty",
    "wezterm",
    "ghostty",
];

impl Capabilities {
    /// Read `TERM` and `COLORTERM` from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        let term = env::var("TERM").unwrap_or_default();
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let caps = Self::from_vars(&term, &colorterm);
        debug!(%term, %colorterm, color = ?caps.color, "terminal capabilities");
        caps
    }

    /// Classify explicit `TERM` and `COLORTERM` values.
    ///
    /// `COLORTERM=truecolor` or `24bit` always wins. Most 256-color
    /// emulators also take RGB, so a `256color` TERM counts as truecolor.
    #[must_use]
    pub fn from_vars(term: &str, colorterm: &str) -> Self {
        let color = if ["truecolor", "24bit"]
            .iter()
            .any(|v| colorterm.eq_ignore_ascii_case(v))
            || TRUECOLOR_TERMS.iter().any(|t| term.contains(t))
        {
            ColorSupport::TrueColor
        } else {
            match term {
                "" | "dumb" => ColorSupport::None,
                t if t.contains("256") => ColorSupport::Extended,
                _ => ColorSupport::Basic,
            }
        };
        Self { color }
    }
}
