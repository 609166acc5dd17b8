//! 24-bit colors, HSV construction and the ANSI-16 palette.
//!
//! [`Rgb`] is the only color type used by the buffer and output engine.
//! Translucency is never stored in a color; it is an argument to the
//! blend operations on [`CellBuffer`](crate::buffer::CellBuffer).
//!
//! ```
//! use gridscope::Rgb;
//!
//! let hue = Rgb::from_hsv(120.0, 1.0, 1.0);
//! assert_eq!(hue, Rgb::new(0, 255, 0));
//!
//! // Quarter-strength red over black.
//! let tinted = Rgb::blend(Rgb::new(255, 0, 0), 64, Rgb::BLACK);
//! assert_eq!(tinted, Rgb::new(64, 0, 0));
//! ```

use std::fmt;

/// Standard ANSI-16 palette in SGR index order.
#[rustfmt::skip]
pub const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // 0 black
    Rgb::new(128, 0, 0),     // 1 red
    Rgb::new(0, 128, 0),     // 2 green
    Rgb::new(128, 128, 0),   // 3 yellow
    Rgb::new(0, 0, 128),     // 4 blue
    Rgb::new(128, 0, 128),   // 5 magenta
    Rgb::new(0, 128, 128),   // 6 cyan
    Rgb::new(192, 192, 192), // 7 white
    Rgb::new(128, 128, 128), // 8 bright black
    Rgb::new(255, 0, 0),     // 9 bright red
    Rgb::new(0, 255, 0),     // 10 bright green
    Rgb::new(255, 255, 0),   // 11 bright yellow
    Rgb::new(0, 0, 255),     // 12 bright blue
    Rgb::new(255, 0, 255),   // 13 bright magenta
    Rgb::new(0, 255, 255),   // 14 bright cyan
    Rgb::new(255, 255, 255), // 15 bright white
];

/// An opaque 24-bit color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const GRAY: Self = Self::new(180, 180, 180);
    pub const YELLOW: Self = Self::new(255, 220, 0);
    pub const RED: Self = Self::new(220, 40, 40);
    pub const GREEN: Self = Self::new(40, 200, 120);
    pub const BLUE: Self = Self::new(60, 120, 220);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from hue (degrees, wrapped into `[0, 360)`), saturation
    /// and value (both `[0, 1]`). Channels are rounded to the nearest byte.
    #[must_use]
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let v = v.clamp(0.0, 1.0);
        if s <= 0.0 {
            let g = to_byte(v);
            return Self::new(g, g, g);
        }
        let s = s.min(1.0);

        let h = h.rem_euclid(360.0);
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r1, g1, b1) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::new(to_byte(r1 + m), to_byte(g1 + m), to_byte(b1 + m))
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
        Self::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }

    /// Composite `top` over `bottom` with integer alpha.
    ///
    /// `alpha >= 255` yields `top`, `alpha == 0` yields `bottom`, otherwise each
    /// channel is `(top * alpha + bottom * (255 - alpha)) / 255`.
    #[must_use]
    pub fn blend(top: Self, alpha: u8, bottom: Self) -> Self {
        match alpha {
            255 => top,
            0 => bottom,
            a => {
                let a = u32::from(a);
                let mix = |t: u8, b: u8| ((u32::from(t) * a + u32::from(b) * (255 - a)) / 255) as u8;
                Self::new(
                    mix(top.r, bottom.r),
                    mix(top.g, bottom.g),
                    mix(top.b, bottom.b),
                )
            }
        }
    }

    /// Index of the nearest ANSI-16 palette entry by squared distance.
    ///
    /// Ties resolve to the lowest index.
    #[must_use]
    pub fn nearest_ansi16(self) -> u8 {
        let mut best = 0;
        let mut best_dist = i32::MAX;
        for (i, p) in ANSI16_PALETTE.iter().enumerate() {
            let dr = i32::from(self.r) - i32::from(p.r);
            let dg = i32::from(self.g) - i32::from(p.g);
            let db = i32::from(self.b) - i32::from(p.b);
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best as u8
    }

    /// Palette color for an ANSI-16 index; out-of-range indices map to black.
    #[must_use]
    pub fn from_ansi16(idx: u8) -> Self {
        ANSI16_PALETTE
            .get(usize::from(idx))
            .copied()
            .unwrap_or(Self::BLACK)
    }

    /// Rec. 709 luma, truncated to an integer.
    #[must_use]
    pub fn luma(self) -> u8 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b))
            as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(Rgb::from_hsv(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hsv(120.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hsv(240.0, 1.0, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::from_hsv(360.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hsv(-120.0, 1.0, 1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_hsv_zero_saturation_is_gray() {
        assert_eq!(Rgb::from_hsv(200.0, 0.0, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(Rgb::from_hsv(10.0, 0.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn test_blend_boundaries() {
        let top = Rgb::new(10, 200, 30);
        let bottom = Rgb::new(250, 0, 90);
        assert_eq!(Rgb::blend(top, 0, bottom), bottom);
        assert_eq!(Rgb::blend(top, 255, bottom), top);
        assert_eq!(Rgb::blend(top, 128, bottom), Rgb::new(129, 100, 59));
    }

    #[test]
    fn test_nearest_ansi16_exact_entries() {
        for (i, c) in ANSI16_PALETTE.iter().enumerate() {
            assert_eq!(c.nearest_ansi16() as usize, i);
        }
    }

    #[test]
    fn test_nearest_ansi16_ties_pick_lowest() {
        // (64,0,0) is equidistant from black (0) and red (1).
        assert_eq!(Rgb::new(64, 0, 0).nearest_ansi16(), 0);
        assert_eq!(Rgb::new(250, 10, 10).nearest_ansi16(), 9);
        assert_eq!(Rgb::new(20, 20, 20).nearest_ansi16(), 0);
    }

    #[test]
    fn test_from_ansi16_out_of_range() {
        assert_eq!(Rgb::from_ansi16(7), Rgb::new(192, 192, 192));
        assert_eq!(Rgb::from_ansi16(99), Rgb::BLACK);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Rgb::new(255, 16, 1).to_string(), "#ff1001");
    }

    fn rgb_strategy() -> impl Strategy<Value = Rgb> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
    }

    proptest! {
        #[test]
        fn blend_same_color_is_identity(c in rgb_strategy(), a in any::<u8>()) {
            prop_assert_eq!(Rgb::blend(c, a, c), c);
        }

        #[test]
        fn blend_stays_between_inputs(t in rgb_strategy(), b in rgb_strategy(), a in any::<u8>()) {
            let out = Rgb::blend(t, a, b);
            prop_assert!(out.r >= t.r.min(b.r) && out.r <= t.r.max(b.r));
            prop_assert!(out.g >= t.g.min(b.g) && out.g <= t.g.max(b.g));
            prop_assert!(out.b >= t.b.min(b.b) && out.b <= t.b.max(b.b));
        }

        #[test]
        fn nearest_ansi16_in_range(c in rgb_strategy()) {
            prop_assert!(c.nearest_ansi16() < 16);
        }
    }
}
