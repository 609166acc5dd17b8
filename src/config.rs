//! Runtime options read by the scheduler every frame.
//!
//! [`VizConfig`] is a plain record: key handlers mutate its fields between
//! frames, and everything downstream reads them fresh on the next tick.

use crate::ansi::ColorMode;
use crate::color::Rgb;
use crate::terminal::Capabilities;
use crate::viewport::{MAX_ZOOM, MIN_ZOOM};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Independently toggled drawing layers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct UiLayers: u8 {
        /// The world itself.
        const MAP = 1 << 0;
        /// Top and left coordinate rulers.
        const RULERS = 1 << 1;
        /// Bottom status line.
        const STATUS_BAR = 1 << 2;
        /// Caller overlays and the cell tooltip.
        const OVERLAYS = 1 << 3;
        const ALL = Self::MAP.bits() | Self::RULERS.bits() | Self::STATUS_BAR.bits() | Self::OVERLAYS.bits();
    }
}

impl Default for UiLayers {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for UiLayers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return f.write_str("All");
        }
        if self.is_empty() {
            return f.write_str("None");
        }
        let names = [
            (Self::MAP, "Map"),
            (Self::RULERS, "Rulers"),
            (Self::STATUS_BAR, "StatusBar"),
            (Self::OVERLAYS, "Overlays"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Visualizer options.
#[derive(Clone, Debug, PartialEq)]
pub struct VizConfig {
    /// Output color depth. Also decides whether the buffer blends.
    pub color_mode: ColorMode,
    /// Frame rate ceiling; 0 disables throttling.
    pub target_fps: u32,

    pub auto_play: bool,
    pub auto_step_per_second: f64,

    /// Mouse-drag pan multiplier, divided by zoom.
    pub pan_speed: f64,
    /// Keyboard pan step as a fraction of the visible world size.
    pub pan_key_step_frac: f64,

    pub layers: UiLayers,

    pub ruler_highlight: Rgb,
    pub ruler_bg_color: Rgb,
    pub ruler_bg_alpha: u8,
    pub ruler_highlight_alpha: u8,
    pub left_ruler_width: u16,

    /// Force a redraw on every tick while autoplay runs.
    pub continuous_render_when_autoplay: bool,

    pub tooltip_bg_alpha: u8,
    pub tooltip_border_alpha: u8,

    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor for one `+`/`-` key press.
    pub key_zoom_factor: f64,
    /// Wheel zoom is `wheel_zoom_base ^ wheel_delta`.
    pub wheel_zoom_base: f64,
    /// Key events processed per tick; the rest wait for the next tick.
    pub max_keys_per_tick: usize,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::TrueColor,
            target_fps: 30,
            auto_play: false,
            auto_step_per_second: 5.0,
            pan_speed: 1.0,
            pan_key_step_frac: 0.10,
            layers: UiLayers::ALL,
            ruler_highlight: Rgb::new(80, 140, 240),
            ruler_bg_color: Rgb::new(40, 40, 40),
            ruler_bg_alpha: 190,
            ruler_highlight_alpha: 160,
            left_ruler_width: 4,
            continuous_render_when_autoplay: true,
            tooltip_bg_alpha: 255,
            tooltip_border_alpha: 255,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            key_zoom_factor: 1.25,
            wheel_zoom_base: 1.1,
            max_keys_per_tick: 64,
        }
    }
}

impl VizConfig {
    /// Defaults with the color mode picked from the environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_capabilities(&Capabilities::detect())
    }

    #[must_use]
    pub fn from_capabilities(caps: &Capabilities) -> Self {
        Self {
            color_mode: ColorMode::from(caps.color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: UiLayers) -> Self {
        self.layers = layers;
        self
    }

    #[must_use]
    pub fn with_auto_play(mut self, steps_per_second: f64) -> Self {
        self.auto_play = true;
        self.auto_step_per_second = steps_per_second;
        self
    }

    /// Whether blends should composite (truecolor) or overwrite (16-color).
    #[must_use]
    pub fn alpha_blend(&self) -> bool {
        self.color_mode == ColorMode::TrueColor
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::terminal::ColorSupport;

    #[test]
    fn test_defaults() {
        let cfg = VizConfig::default();
        assert_eq!(cfg.color_mode, ColorMode::TrueColor);
        assert_eq!(cfg.target_fps, 30);
        assert!(!cfg.auto_play);
        assert_eq!(cfg.auto_step_per_second, 5.0);
        assert_eq!(cfg.pan_key_step_frac, 0.10);
        assert_eq!(cfg.layers, UiLayers::ALL);
        assert_eq!(cfg.ruler_bg_alpha, 190);
        assert_eq!(cfg.left_ruler_width, 4);
        assert!(cfg.alpha_blend());
    }

    #[test]
    fn test_from_capabilities() {
        let caps = Capabilities {
            color: ColorSupport::Basic,
        };
        let cfg = VizConfig::from_capabilities(&caps);
        assert_eq!(cfg.color_mode, ColorMode::Color16);
        assert!(!cfg.alpha_blend());
    }

    #[test]
    fn test_layers_display() {
        assert_eq!(UiLayers::ALL.to_string(), "All");
        assert_eq!(UiLayers::MAP.to_string(), "Map");
        assert_eq!(
            (UiLayers::RULERS | UiLayers::STATUS_BAR).to_string(),
            "Rulers|StatusBar"
        );
        assert_eq!(UiLayers::empty().to_string(), "None");
    }

    #[test]
    fn test_layer_toggle() {
        let mut layers = UiLayers::ALL;
        layers.toggle(UiLayers::OVERLAYS);
        assert!(!layers.contains(UiLayers::OVERLAYS));
        assert!(layers.contains(UiLayers::MAP));
    }
}
