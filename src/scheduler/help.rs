//! The F1 key reference window.

use crate::buffer::truncate_to_width;
use crate::color::Rgb;
use crate::window::Window;

const MAX_WIDTH: i32 = 64;
const MAX_HEIGHT: i32 = 18;
/// Kept free around the window on each axis.
const SCREEN_INSET: i32 = 6;

pub const HELP_Z: i32 = 100;

const HELP_LINES: &[&str] = &[
    "Ctrl+Q      : quit",
    "= / -       : zoom in/out (also mouse wheel)",
    "0           : reset zoom",
    "LMB drag    : pan (RMB also if terminal allows)",
    "Arrows/WASD : pan",
    "Space       : step",
    "1 / 2 / 3   : autoplay off / 5 per s / 30 per s",
    "[ / ]       : autoplay slower / faster",
    "F5/F6/F7/F8 : layers (all/map/ui/overlays)",
    "C           : toggle color mode (TrueColor/16)",
    "T           : toggle tooltip",
];

const TITLE_COLOR: Rgb = Rgb::new(255, 230, 120);
const TEXT_COLOR: Rgb = Rgb::new(230, 230, 230);
const HINT_COLOR: Rgb = Rgb::new(200, 220, 255);

/// Centered window listing the key bindings.
#[must_use]
pub fn help_window(screen_w: i32, screen_h: i32) -> Window {
    let w = MAX_WIDTH.min(screen_w - SCREEN_INSET).max(3);
    let h = MAX_HEIGHT.min(screen_h - SCREEN_INSET).max(3);
    let x = (screen_w - w) / 2;
    let y = (screen_h - h) / 2;

    let mut win = Window::new(x, y, w, h)
        .with_background(Rgb::new(20, 20, 24), 220)
        .with_z(HELP_Z)
        .with_content(|buf, win| {
            let lx = win.x + 2;
            // Title stops short of the close button, body text inside the border.
            let title_cols = usize::try_from(win.w - 6).unwrap_or(0);
            let cols = usize::try_from(win.w - 3).unwrap_or(0);
            let last_row = win.y + win.h - 2;

            buf.put_text_keep_bg(lx, win.y, truncate_to_width("[ Help ]", title_cols), TITLE_COLOR);
            let mut ly = win.y + 2;
            for line in HELP_LINES {
                if ly > last_row {
                    return;
                }
                buf.put_text_keep_bg(lx, ly, truncate_to_width(line, cols), TEXT_COLOR);
                ly += 1;
            }
            if ly < last_row {
                let hint = truncate_to_width("Press F1 to hide this window.", cols);
                buf.put_text_keep_bg(lx, ly + 1, hint, HINT_COLOR);
            }
        });
    win.show_close_button = true;
    win.border_color_active = Rgb::new(255, 200, 80);
    win
}
