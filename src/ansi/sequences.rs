//! Fixed control sequences written by the terminal lifecycle and the
//! frame writer.

// Attributes and screen.
pub const RESET: &str = "\x1b[0m";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
/// Row 1, column 1; every frame starts here.
pub const CURSOR_HOME: &str = "\x1b[H";

// Cursor visibility, toggled for the lifetime of the UI.
pub const CURSOR_HIDE: &str = "\x1b[?25l";
pub const CURSOR_SHOW: &str = "\x1b[?25h";

// Alternate screen, DEC private mode 1049.
pub const ALT_SCREEN_ON: &str = "\x1b[?1049h";
pub const ALT_SCREEN_OFF: &str = "\x1b[?1049l";

/// Report every motion (1003) using SGR coordinates (1006), which the
/// input decoder expects.
pub const MOUSE_ON: &str = concat!("\x1b[?1003h", "\x1b[?1006h");
pub const MOUSE_OFF: &str = concat!("\x1b[?1003l", "\x1b[?1006l");
