//! World- and screen-anchored overlay primitives.
//!
//! Each takes an `enabled` flag (the overlays layer) and does nothing when
//! it is off, so callers never test the layer themselves.

use crate::buffer::CellBuffer;
use crate::cell::Cell;
use crate::color::Rgb;
use crate::viewport::Viewport;

/// Fill the screen rectangle covering world cells `x..x+w` by `y..y+h`.
#[allow(clippy::too_many_arguments)]
pub fn draw_rect_world(
    buf: &mut CellBuffer,
    vp: &Viewport,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    cell: Cell,
    enabled: bool,
) {
    if !enabled {
        return;
    }
    let (sx0, sy0) = vp.world_to_screen(x, y);
    let (sx1, sy1) = vp.world_to_screen(x + w - 1.0, y + h - 1.0);
    for sy in sy0.min(sy1)..=sy0.max(sy1) {
        for sx in sx0.min(sx1)..=sx0.max(sx1) {
            buf.try_set(sx, sy, cell);
        }
    }
}

/// Ring of radius `r` world units around `(cx, cy)`.
///
/// A screen cell is on the ring when its world position lies within
/// `0.6 / zoom` of the circle.
pub fn draw_circle_world(
    buf: &mut CellBuffer,
    vp: &Viewport,
    cx: f64,
    cy: f64,
    r: f64,
    cell: Cell,
    enabled: bool,
) {
    if !enabled {
        return;
    }
    let (scx, scy) = vp.world_to_screen(cx, cy);
    let rr = (r * vp.zoom()).round() as i32;
    let tolerance = 0.6 / vp.zoom();
    for sy in scy - rr..=scy + rr {
        for sx in scx - rr..=scx + rr {
            let (wx, wy) = vp.screen_to_world(sx, sy);
            let dist = (wx - cx).hypot(wy - cy);
            if (dist - r).abs() <= tolerance {
                buf.try_set(sx, sy, cell);
            }
        }
    }
}

/// Text at a fixed screen position.
pub fn draw_text_screen(
    buf: &mut CellBuffer,
    sx: i32,
    sy: i32,
    text: &str,
    fg: Rgb,
    bg: Rgb,
    enabled: bool,
) {
    if enabled {
        buf.put_text(sx, sy, text, fg, bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(buf: &CellBuffer, ch: char) -> usize {
        buf.cells().iter().filter(|c| c.ch == ch).count()
    }

    #[test]
    fn test_rect_covers_world_cells() {
        let vp = Viewport::new(30, 12);
        let mut buf = CellBuffer::new(30, 12);
        let cell = Cell::new('R', Rgb::RED, Rgb::BLACK);
        draw_rect_world(&mut buf, &vp, 2.0, 3.0, 4.0, 2.0, cell, true);
        assert_eq!(count(&buf, 'R'), 8);
        assert_eq!(buf.get(6, 4).unwrap().ch, 'R');
        assert_eq!(buf.get(9, 5).unwrap().ch, 'R');
        assert_eq!(buf.get(10, 5).unwrap().ch, ' ');
    }

    #[test]
    fn test_rect_scales_with_zoom() {
        let vp = Viewport::new(40, 20).with_zoom(2.0);
        let mut buf = CellBuffer::new(40, 20);
        draw_rect_world(&mut buf, &vp, 0.0, 0.0, 3.0, 1.0, Cell::new('R', Rgb::RED, Rgb::BLACK), true);
        // x from 4 to 4 + 2*2, one row
        assert_eq!(count(&buf, 'R'), 5);
    }

    #[test]
    fn test_overlays_disabled() {
        let vp = Viewport::new(30, 12);
        let mut buf = CellBuffer::new(30, 12);
        let cell = Cell::new('R', Rgb::RED, Rgb::BLACK);
        draw_rect_world(&mut buf, &vp, 0.0, 0.0, 5.0, 5.0, cell, false);
        draw_circle_world(&mut buf, &vp, 5.0, 5.0, 3.0, cell, false);
        draw_text_screen(&mut buf, 0, 0, "hi", Rgb::WHITE, Rgb::BLACK, false);
        assert_eq!(count(&buf, 'R'), 0);
        assert_eq!(count(&buf, 'h'), 0);
    }

    #[test]
    fn test_circle_is_a_ring() {
        let vp = Viewport::new(40, 20);
        let mut buf = CellBuffer::new(40, 20);
        let cell = Cell::new('o', Rgb::GREEN, Rgb::BLACK);
        draw_circle_world(&mut buf, &vp, 10.0, 8.0, 4.0, cell, true);
        // Center at screen (14, 9).
        assert_eq!(buf.get(14, 9).unwrap().ch, ' ');
        assert_eq!(buf.get(18, 9).unwrap().ch, 'o');
        assert_eq!(buf.get(14, 5).unwrap().ch, 'o');
        assert_eq!(buf.get(10, 9).unwrap().ch, 'o');
        assert!(count(&buf, 'o') > 8);
    }

    #[test]
    fn test_text_screen() {
        let mut buf = CellBuffer::new(10, 2);
        draw_text_screen(&mut buf, 1, 1, "abc", Rgb::WHITE, Rgb::BLUE, true);
        assert_eq!(buf.get(2, 1).unwrap().ch, 'b');
        assert_eq!(buf.get(2, 1).unwrap().bg, Rgb::BLUE);
    }
}
