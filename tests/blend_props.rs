//! Compositing properties of the cell buffer.

use gridscope::{Cell, CellBuffer, Rgb};
use proptest::prelude::*;

fn rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

proptest! {
    #[test]
    fn blend_endpoints(top in rgb(), bottom in rgb()) {
        prop_assert_eq!(Rgb::blend(top, 255, bottom), top);
        prop_assert_eq!(Rgb::blend(top, 0, bottom), bottom);
    }

    #[test]
    fn blend_of_equal_colors_is_identity(c in rgb(), alpha in any::<u8>()) {
        prop_assert_eq!(Rgb::blend(c, alpha, c), c);
    }

    #[test]
    fn blend_stays_between_inputs(top in rgb(), bottom in rgb(), alpha in any::<u8>()) {
        let out = Rgb::blend(top, alpha, bottom);
        for (o, t, b) in [(out.r, top.r, bottom.r), (out.g, top.g, bottom.g), (out.b, top.b, bottom.b)] {
            prop_assert!(o >= t.min(b) && o <= t.max(b));
        }
    }

    #[test]
    fn opaque_buffer_ignores_alpha(top in rgb(), under in rgb(), alpha in any::<u8>()) {
        let mut buf = CellBuffer::new(1, 1);
        buf.set_alpha_blend_enabled(false);
        buf.set(0, 0, Cell::new('x', Rgb::WHITE, under));
        buf.blend_bg(0, 0, top, alpha);
        prop_assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(top));
    }
}

#[test]
fn blend_midpoint_truncates() {
    let out = Rgb::blend(Rgb::new(255, 255, 255), 128, Rgb::BLACK);
    assert_eq!(out, Rgb::new(128, 128, 128));
    let out = Rgb::blend(Rgb::BLACK, 128, Rgb::new(255, 255, 255));
    assert_eq!(out, Rgb::new(127, 127, 127));
}

#[test]
fn blend_bg_keeps_glyph_and_foreground() {
    let mut buf = CellBuffer::new(2, 1);
    buf.set(0, 0, Cell::new('@', Rgb::YELLOW, Rgb::BLACK));
    buf.blend_bg(0, 0, Rgb::new(200, 0, 0), 128);

    let cell = buf.get(0, 0).copied().unwrap();
    assert_eq!(cell.ch, '@');
    assert_eq!(cell.fg, Rgb::YELLOW);
    assert_eq!(cell.bg, Rgb::new(100, 0, 0));
}

#[test]
fn blend_outside_buffer_is_ignored() {
    let mut buf = CellBuffer::new(2, 2);
    let before = buf.clone();
    buf.blend_bg(-1, 0, Rgb::RED, 200);
    buf.blend_bg(0, 5, Rgb::RED, 200);
    assert_eq!(buf.cells(), before.cells());
}
