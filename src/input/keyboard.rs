//! Keys the decoder can produce.

use bitflags::bitflags;

bitflags! {
    /// Modifiers, laid out as xterm's modifier parameter minus one.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
    }
}

impl KeyModifiers {
    /// Decode the `m` in `ESC [ 1 ; m X`, which is `1 + shift + 2*alt + 4*ctrl`.
    ///
    /// Meta (8) and above are ignored; 0 is treated as 1.
    #[must_use]
    pub fn from_xterm_param(param: u32) -> Self {
        Self::from_bits_truncate((param.saturating_sub(1) & 0b111) as u8)
    }
}

/// Key identity without modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    /// F1 through F12.
    F(u8),
    /// Printable ASCII, space included.
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Unmodified key.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Unmodified printable character.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    #[must_use]
    pub fn with_ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CTRL)
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    /// Ctrl+Q, the only way out of the main loop.
    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.ctrl() && matches!(self.code, KeyCode::Char('q' | 'Q'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_char_is_not_quit() {
        let event = KeyEvent::char('q');
        assert_eq!(event.code, KeyCode::Char('q'));
        assert!(event.modifiers.is_empty());
        assert!(!event.is_quit());
    }

    #[test]
    fn test_ctrl_q_either_case_quits() {
        assert!(KeyEvent::with_ctrl(KeyCode::Char('q')).is_quit());
        assert!(KeyEvent::with_ctrl(KeyCode::Char('Q')).is_quit());
        assert!(!KeyEvent::with_ctrl(KeyCode::Char('w')).is_quit());
    }

    #[test]
    fn test_xterm_modifier_param() {
        assert_eq!(KeyModifiers::from_xterm_param(0), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm_param(1), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm_param(2), KeyModifiers::SHIFT);
        assert_eq!(KeyModifiers::from_xterm_param(3), KeyModifiers::ALT);
        assert_eq!(KeyModifiers::from_xterm_param(5), KeyModifiers::CTRL);
        assert_eq!(KeyModifiers::from_xterm_param(8), KeyModifiers::all());
        assert_eq!(KeyModifiers::from_xterm_param(9), KeyModifiers::empty());
    }
}
