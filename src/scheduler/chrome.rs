//! Built-in screen furniture: rulers, status bar and the cell tooltip.

use crate::buffer::{CellBuffer, TooltipStyle, split_lines, tooltip_width};
use crate::cell::Cell;
use crate::color::Rgb;
use crate::config::{UiLayers, VizConfig};
use crate::viewport::Viewport;
use crate::window::WindowManager;
use crate::world::TooltipProvider;

/// Top-ruler label spacing in columns.
const TOP_LABEL_EVERY: i32 = 10;
/// Left-ruler label spacing in rows.
const LEFT_LABEL_EVERY: i32 = 2;
/// Width of a left-ruler label.
const LEFT_LABEL_WIDTH: usize = 3;

/// Paint the top and left rulers with world coordinate labels and the
/// mouse column and row highlighted.
pub fn draw_rulers(buf: &mut CellBuffer, vp: &Viewport, cfg: &VizConfig, mouse: (i32, i32)) {
    let (w, h) = (i32::from(buf.width()), i32::from(buf.height()));
    if w < 10 || h < 5 {
        return;
    }
    let lw = i32::from(cfg.left_ruler_width.max(1));
    let opaque = !buf.alpha_blend_enabled();
    let (bg, alpha) = (cfg.ruler_bg_color, cfg.ruler_bg_alpha);

    let paint = |buf: &mut CellBuffer, x: i32, y: i32| {
        if opaque {
            buf.set(x, y, Cell::blank(Rgb::WHITE, bg));
        } else {
            buf.blend_bg_and_fg(x, y, bg, alpha, bg, alpha);
        }
    };
    for x in 0..w {
        paint(buf, x, 0);
    }
    for y in 1..h {
        for x in 0..lw.min(w) {
            paint(buf, x, y);
        }
    }

    for sx in (lw..w).filter(|sx| sx % TOP_LABEL_EVERY == 0) {
        let (wx, _) = vp.screen_to_world(sx, 1);
        let label = format!("{}", wx.round() as i64);
        buf.put_text_keep_bg(sx, 0, &label, Rgb::WHITE);
    }
    for sy in (1..h - 1).filter(|sy| sy % LEFT_LABEL_EVERY == 0) {
        let (_, wy) = vp.screen_to_world(lw, sy);
        let label = format!("{:>3}", wy.round() as i64);
        let label = &label[label.len().saturating_sub(LEFT_LABEL_WIDTH)..];
        buf.put_text_keep_bg(0, sy, label, Rgb::WHITE);
    }

    let msx = mouse.0.clamp(0, w - 1);
    let msy = mouse.1.clamp(0, h - 1);
    let (hi, hi_alpha) = (cfg.ruler_highlight, cfg.ruler_highlight_alpha);
    for (x, y) in [(msx, 0), (0, msy)] {
        if opaque {
            if let Some(&cell) = buf.get(x, y) {
                buf.set(x, y, Cell::new(cell.ch, hi, bg));
            }
        } else {
            buf.blend_bg_and_fg(x, y, hi, hi_alpha, hi, hi_alpha);
        }
    }
}

/// Bottom-row summary of the view state.
pub fn status_line(cfg: &VizConfig, vp: &Viewport, mouse: (i32, i32), fps: f64) -> String {
    let (ix, iy) = vp.world_cell_under_screen(mouse.0, mouse.1);
    let auto = if cfg.auto_play {
        format!("{:.1}/s | FPS {fps:.1}", cfg.auto_step_per_second)
    } else {
        "off | FPS off".to_string()
    };
    format!(
        "F1 Help |  {} | {} | Zoom {:.2} | Auto {auto} | Cell {ix}, {iy}",
        cfg.color_mode,
        cfg.layers,
        vp.zoom(),
    )
}

/// Draw [`status_line`] black on gray across the bottom row.
pub fn draw_status_bar(buf: &mut CellBuffer, vp: &Viewport, cfg: &VizConfig, mouse: (i32, i32), fps: f64) {
    let (w, h) = (i32::from(buf.width()), i32::from(buf.height()));
    if w < 10 || h < 3 {
        return;
    }
    let y = h - 1;
    for x in 0..w {
        buf.set(x, y, Cell::blank(Rgb::BLACK, Rgb::GRAY));
    }
    let width = usize::from(buf.width());
    let text: String = format!("{:<width$}", status_line(cfg, vp, mouse, fps))
        .chars()
        .take(width)
        .collect();
    buf.put_text(0, y, &text, Rgb::BLACK, Rgb::GRAY);
}

/// Inputs for [`draw_tooltip`] besides the buffer.
pub struct TooltipContext<'a> {
    pub viewport: &'a Viewport,
    pub config: &'a VizConfig,
    pub windows: &'a WindowManager,
    pub provider: Option<&'a TooltipProvider>,
    pub enabled: bool,
    pub mouse: (i32, i32),
}

/// Show the provider's text for the world cell under the mouse.
///
/// Nothing is drawn when the tooltip is off, the overlays layer is off,
/// the cursor is over a window, or the provider has nothing to say.
pub fn draw_tooltip(buf: &mut CellBuffer, ctx: &TooltipContext<'_>) {
    let Some(provider) = ctx.provider else {
        return;
    };
    let (mx, my) = ctx.mouse;
    if !ctx.enabled
        || !ctx.config.layers.contains(UiLayers::OVERLAYS)
        || ctx.windows.is_over_window(mx, my)
    {
        return;
    }
    let (ix, iy) = ctx.viewport.world_cell_under_screen(mx, my);
    let Some(text) = provider(ix, iy).filter(|t| !t.is_empty()) else {
        return;
    };

    let (w, h) = (i32::from(buf.width()), i32::from(buf.height()));
    let lines = split_lines(&text);
    let rows = i32::try_from(lines.len()).unwrap_or(i32::MAX);
    let box_w = tooltip_width(&lines, w);

    let mut sx = (mx + 2).clamp(0, (w - 1).max(0));
    let mut sy = (my + 1).clamp(0, (h - 2).max(0));
    if sx + box_w >= w {
        sx = (w - box_w - 1).max(0);
    }
    if sy + rows >= h - 1 {
        sy = (my - rows - 1).max(0);
    }

    let style = TooltipStyle::default()
        .with_alphas(ctx.config.tooltip_bg_alpha, ctx.config.tooltip_border_alpha);
    buf.draw_tooltip_box(sx, sy, &lines, style);
}
