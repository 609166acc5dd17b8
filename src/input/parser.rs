//! Incremental escape-sequence decoder for terminal input.
//!
//! Bytes arrive in arbitrary chunks from the reader thread. The decoder
//! keeps any unfinished escape sequence between calls to [`feed`], so a
//! sequence split across reads decodes exactly as if it arrived whole.
//!
//! Recognized input:
//! - printable ASCII and `0x11` (Ctrl+Q) in the normal state
//! - SGR mouse reports `ESC [ < b ; x ; y (M|m)`
//! - arrow keys `ESC [ A..D` (optionally `ESC [ 1 ; m A..D`)
//! - F1-F4 as SS3 `ESC O P..S` or `ESC [ 1 ; m P..S`
//! - F1-F12 as `ESC [ n (; m)? ~`
//!
//! Anything else is dropped without an event.
//!
//! [`feed`]: EscapeDecoder::feed

use crate::input::keyboard::{KeyCode, KeyEvent, KeyModifiers};
use crate::input::mouse::MouseReport;
use tracing::debug;

/// Longest pending escape sequence kept before it is discarded.
pub const MAX_PENDING: usize = 64;

const ESC: u8 = 0x1b;
const CTRL_Q: u8 = 0x11;

/// A decoded input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseReport),
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<MouseReport> for InputEvent {
    fn from(report: MouseReport) -> Self {
        Self::Mouse(report)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Normal,
    InEscape,
}

/// Outcome of testing the pending bytes after an append.
enum Resolution {
    /// Not complete yet; keep accumulating.
    Pending,
    /// Complete, produced an event.
    Event(InputEvent),
    /// Complete but not something we understand.
    Discard,
}

/// Streaming two-state decoder.
#[derive(Clone, Debug, Default)]
pub struct EscapeDecoder {
    state: State,
    pending: Vec<u8>,
}

impl EscapeDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            pending: Vec::with_capacity(MAX_PENDING),
        }
    }

    /// Whether a partial escape sequence is buffered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == State::InEscape
    }

    /// Drop any partial sequence and return to the normal state.
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.pending.clear();
    }

    /// Decode a chunk, calling `emit` for every complete event.
    pub fn feed(&mut self, bytes: &[u8], emit: &mut impl FnMut(InputEvent)) {
        for &byte in bytes {
            self.push(byte, emit);
        }
    }

    /// Decode a chunk into a vector of events.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.feed(bytes, &mut |event| events.push(event));
        events
    }

    fn push(&mut self, byte: u8, emit: &mut impl FnMut(InputEvent)) {
        match self.state {
            State::Normal => self.push_normal(byte, emit),
            State::InEscape => self.push_escape(byte, emit),
        }
    }

    fn push_normal(&mut self, byte: u8, emit: &mut impl FnMut(InputEvent)) {
        match byte {
            ESC => {
                self.state = State::InEscape;
                self.pending.clear();
                self.pending.push(ESC);
            }
            CTRL_Q => emit(KeyEvent::with_ctrl(KeyCode::Char('q')).into()),
            0x20..=0x7e => emit(KeyEvent::char(char::from(byte)).into()),
            _ => {}
        }
    }

    fn push_escape(&mut self, byte: u8, emit: &mut impl FnMut(InputEvent)) {
        // A fresh ESC abandons the unfinished sequence.
        if byte == ESC {
            self.pending.clear();
            self.pending.push(ESC);
            return;
        }

        self.pending.push(byte);
        if self.pending.len() > MAX_PENDING {
            debug!(len = self.pending.len(), "escape sequence overflow, resetting");
            self.reset();
            return;
        }

        match resolve(&self.pending) {
            Resolution::Pending => {}
            Resolution::Event(event) => {
                self.reset();
                emit(event);
            }
            Resolution::Discard => self.reset(),
        }
    }
}

fn resolve(seq: &[u8]) -> Resolution {
    match seq {
        [ESC] => Resolution::Pending,
        [ESC, b'[', rest @ ..] => resolve_csi(rest),
        [ESC, b'O'] => Resolution::Pending,
        [ESC, b'O', last @ b'P'..=b'S'] => {
            key(KeyCode::F(*last - b'P' + 1), KeyModifiers::empty())
        }
        // ESC followed by anything else is a complete two-byte sequence.
        _ => Resolution::Discard,
    }
}

fn resolve_csi(body: &[u8]) -> Resolution {
    let Some((&last, params)) = body.split_last() else {
        return Resolution::Pending;
    };
    // Parameter and intermediate bytes; the sequence continues.
    if (0x20..=0x3f).contains(&last) {
        return Resolution::Pending;
    }
    if !(0x40..=0x7e).contains(&last) {
        return Resolution::Discard;
    }

    if let [b'<', payload @ ..] = params {
        return match last {
            b'M' | b'm' => parse_sgr_mouse(payload, last == b'M')
                .map_or(Resolution::Discard, |r| Resolution::Event(r.into())),
            _ => Resolution::Discard,
        };
    }

    match last {
        b'A' | b'B' | b'C' | b'D' => {
            let Some(mods) = letter_modifiers(params) else {
                return Resolution::Discard;
            };
            let code = match last {
                b'A' => KeyCode::Up,
                b'B' => KeyCode::Down,
                b'C' => KeyCode::Right,
                _ => KeyCode::Left,
            };
            key(code, mods)
        }
        b'P'..=b'S' => match letter_modifiers(params) {
            Some(mods) => key(KeyCode::F(last - b'P' + 1), mods),
            None => Resolution::Discard,
        },
        b'~' => parse_tilde(params)
            .map_or(Resolution::Discard, |(n, mods)| key(KeyCode::F(n), mods)),
        _ => Resolution::Discard,
    }
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> Resolution {
    Resolution::Event(KeyEvent::new(code, modifiers).into())
}

/// Modifiers for `ESC [ X` or `ESC [ 1 ; m X`.
fn letter_modifiers(params: &[u8]) -> Option<KeyModifiers> {
    if params.is_empty() {
        return Some(KeyModifiers::empty());
    }
    let text = std::str::from_utf8(params).ok()?;
    let (first, modifier) = text.split_once(';')?;
    if first != "1" {
        return None;
    }
    let m: u32 = modifier.parse().ok()?;
    Some(KeyModifiers::from_xterm_param(m))
}

/// `n (; m)?` before `~`, mapped to a function key number.
fn parse_tilde(params: &[u8]) -> Option<(u8, KeyModifiers)> {
    let text = std::str::from_utf8(params).ok()?;
    let (num, modifier) = match text.split_once(';') {
        Some((num, m)) => (num, Some(m)),
        None => (text, None),
    };
    let f = match num.parse::<u32>().ok()? {
        11 => 1,
        12 => 2,
        13 => 3,
        14 => 4,
        15 => 5,
        17 => 6,
        18 => 7,
        19 => 8,
        20 => 9,
        21 => 10,
        23 => 11,
        24 => 12,
        _ => return None,
    };
    let mods = match modifier {
        Some(m) => KeyModifiers::from_xterm_param(m.parse().ok()?),
        None => KeyModifiers::empty(),
    };
    Some((f, mods))
}

/// `b ; x ; y` with exactly three numeric fields.
fn parse_sgr_mouse(payload: &[u8], press: bool) -> Option<MouseReport> {
    let text = std::str::from_utf8(payload).ok()?;
    let mut parts = text.split(';');
    let code = parts.next()?.parse().ok()?;
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(MouseReport::new(code, x, y, press))
}
