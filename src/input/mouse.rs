//! SGR mouse reports.

use crate::input::KeyModifiers;

const MOTION_BIT: u16 = 32;
const WHEEL_BIT: u16 = 64;
const SHIFT_BIT: u16 = 4;
const META_BIT: u16 = 8;
const CTRL_BIT: u16 = 16;

/// Mouse button encoded in the low two bits of an SGR button code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Code 3: no button (motion without a pressed button).
    None,
}

/// One decoded `ESC [ < b ; x ; y (M|m)` report.
///
/// Coordinates are 1-based as sent by the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseReport {
    pub code: u16,
    pub x: u16,
    pub y: u16,
    /// `M` terminator; `m` means release.
    pub press: bool,
}

impl MouseReport {
    #[must_use]
    pub fn new(code: u16, x: u16, y: u16, press: bool) -> Self {
        Self { code, x, y, press }
    }

    #[must_use]
    pub fn button(&self) -> MouseButton {
        match self.code & 0b11 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    }

    #[must_use]
    pub fn is_motion(&self) -> bool {
        self.code & MOTION_BIT != 0
    }

    #[must_use]
    pub fn is_wheel(&self) -> bool {
        self.code & WHEEL_BIT != 0
    }

    /// `+1` for wheel up (base button 0), `-1` for wheel down. Modifier
    /// bits do not change the direction.
    #[must_use]
    pub fn wheel_delta(&self) -> i32 {
        if !self.is_wheel() {
            0
        } else if self.code & 0b11 == 0 {
            1
        } else {
            -1
        }
    }

    /// Modifier keys held during the event; meta is reported as ALT.
    #[must_use]
    pub fn modifiers(&self) -> KeyModifiers {
        let mut mods = KeyModifiers::empty();
        if self.code & SHIFT_BIT != 0 {
            mods |= KeyModifiers::SHIFT;
        }
        if self.code & META_BIT != 0 {
            mods |= KeyModifiers::ALT;
        }
        if self.code & CTRL_BIT != 0 {
            mods |= KeyModifiers::CTRL;
        }
        mods
    }

    /// 0-based screen column and row.
    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (
            (i32::from(self.x) - 1).max(0),
            (i32::from(self.y) - 1).max(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_press() {
        let r = MouseReport::new(0, 10, 5, true);
        assert_eq!(r.button(), MouseButton::Left);
        assert!(!r.is_motion());
        assert!(!r.is_wheel());
        assert_eq!(r.position(), (9, 4));
        assert!(r.modifiers().is_empty());
    }

    #[test]
    fn test_motion_and_buttons() {
        assert!(MouseReport::new(32, 1, 1, true).is_motion());
        assert_eq!(MouseReport::new(34, 1, 1, true).button(), MouseButton::Right);
        assert_eq!(MouseReport::new(35, 1, 1, true).button(), MouseButton::None);
        assert_eq!(MouseReport::new(1, 1, 1, true).button(), MouseButton::Middle);
    }

    #[test]
    fn test_wheel_delta() {
        assert_eq!(MouseReport::new(64, 1, 1, true).wheel_delta(), 1);
        assert_eq!(MouseReport::new(65, 1, 1, true).wheel_delta(), -1);
        assert_eq!(MouseReport::new(0, 1, 1, true).wheel_delta(), 0);
        // shift, meta and ctrl keep the direction
        assert_eq!(MouseReport::new(68, 1, 1, true).wheel_delta(), 1);
        assert_eq!(MouseReport::new(72, 1, 1, true).wheel_delta(), 1);
        assert_eq!(MouseReport::new(80, 1, 1, true).wheel_delta(), 1);
        assert_eq!(MouseReport::new(81, 1, 1, true).wheel_delta(), -1);
    }

    #[test]
    fn test_modifiers() {
        let r = MouseReport::new(4 | 8 | 16, 1, 1, true);
        assert_eq!(
            r.modifiers(),
            KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CTRL
        );
    }

    #[test]
    fn test_zero_coordinates_clamp() {
        assert_eq!(MouseReport::new(0, 0, 0, true).position(), (0, 0));
    }
}
