//! Input state shared between the reader thread and the main loop.

use crate::input::keyboard::KeyEvent;
use crate::input::mouse::{MouseButton, MouseReport};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mouse position before any report arrives.
pub const INITIAL_MOUSE: (i32, i32) = (10, 5);

/// Copy of the mouse fields taken under the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSnapshot {
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub left_down: bool,
    pub right_down: bool,
    pub left_dragging: bool,
    pub right_dragging: bool,
    /// Wheel notches not yet consumed.
    pub wheel: i32,
}

impl InputSnapshot {
    /// Snapshot with the cursor at `(x, y)` and nothing pressed.
    #[must_use]
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            mouse_x: x,
            mouse_y: y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_left_down(mut self, down: bool) -> Self {
        self.left_down = down;
        self.left_dragging = down;
        self
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.left_dragging || self.right_dragging
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            mouse_x: INITIAL_MOUSE.0,
            mouse_y: INITIAL_MOUSE.1,
            left_down: false,
            right_down: false,
            left_dragging: false,
            right_dragging: false,
            wheel: 0,
        }
    }
}

#[derive(Debug)]
struct Inner {
    mouse: InputSnapshot,
    drag_base_x: i32,
    drag_base_y: i32,
    keys: VecDeque<KeyEvent>,
}

/// Mouse, wheel and key queue behind one mutex, plus a lock-free dirty flag.
///
/// The reader thread writes; the main loop reads and drains. Position and
/// drag baseline always change under the same lock.
#[derive(Debug)]
pub struct InputState {
    inner: Mutex<Inner>,
    dirty: AtomicBool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// New state; starts dirty so the first frame is drawn.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                mouse: InputSnapshot::default(),
                drag_base_x: INITIAL_MOUSE.0,
                drag_base_y: INITIAL_MOUSE.1,
                keys: VecDeque::new(),
            }),
            dirty: AtomicBool::new(true),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one SGR mouse report.
    ///
    /// Every report moves the cursor. Wheel and motion reports stop there;
    /// only press and release touch button flags and the drag baseline.
    pub fn apply_mouse(&self, report: &MouseReport) {
        let (x, y) = report.position();
        {
            let mut inner = self.lock();
            inner.mouse.mouse_x = x;
            inner.mouse.mouse_y = y;

            if report.is_wheel() {
                inner.mouse.wheel += report.wheel_delta();
            } else if !report.is_motion() {
                match (report.button(), report.press) {
                    (MouseButton::Left, true) => {
                        inner.mouse.left_down = true;
                        inner.mouse.left_dragging = true;
                        inner.drag_base_x = x;
                        inner.drag_base_y = y;
                    }
                    (MouseButton::Right, true) => {
                        inner.mouse.right_down = true;
                        inner.mouse.right_dragging = true;
                        inner.drag_base_x = x;
                        inner.drag_base_y = y;
                    }
                    (MouseButton::Left, false) => {
                        inner.mouse.left_down = false;
                        inner.mouse.left_dragging = false;
                    }
                    (MouseButton::Right, false) => {
                        inner.mouse.right_down = false;
                        inner.mouse.right_dragging = false;
                    }
                    _ => {}
                }
            }
        }
        self.mark_dirty();
    }

    /// Queue a key event. The queue is unbounded; the main loop bounds
    /// how many it drains per tick.
    pub fn enqueue_key(&self, key: KeyEvent) {
        self.lock().keys.push_back(key);
        self.mark_dirty();
    }

    pub fn try_dequeue_key(&self) -> Option<KeyEvent> {
        self.lock().keys.pop_front()
    }

    #[must_use]
    pub fn pending_keys(&self) -> usize {
        self.lock().keys.len()
    }

    /// Movement since the drag baseline; the baseline moves to the cursor.
    pub fn consume_drag_delta(&self) -> (i32, i32) {
        let mut inner = self.lock();
        let dx = inner.mouse.mouse_x - inner.drag_base_x;
        let dy = inner.mouse.mouse_y - inner.drag_base_y;
        inner.drag_base_x = inner.mouse.mouse_x;
        inner.drag_base_y = inner.mouse.mouse_y;
        (dx, dy)
    }

    /// Take and zero the accumulated wheel notches.
    pub fn consume_wheel(&self) -> i32 {
        std::mem::take(&mut self.lock().mouse.wheel)
    }

    /// Rebase any drag on the current cursor after a terminal resize.
    pub fn on_resize(&self) {
        {
            let mut inner = self.lock();
            inner.drag_base_x = inner.mouse.mouse_x;
            inner.drag_base_y = inner.mouse.mouse_y;
        }
        self.mark_dirty();
    }

    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        self.lock().mouse
    }

    #[must_use]
    pub fn drag_baseline(&self) -> (i32, i32) {
        let inner = self.lock();
        (inner.drag_base_x, inner.drag_base_y)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_initial_state() {
        let state = InputState::new();
        let snap = state.snapshot();
        assert_eq!((snap.mouse_x, snap.mouse_y), INITIAL_MOUSE);
        assert!(!snap.left_down);
        assert!(state.take_dirty());
        assert!(!state.take_dirty());
    }

    #[test]
    fn test_press_sets_baseline() {
        let state = InputState::new();
        state.apply_mouse(&MouseReport::new(0, 21, 11, true));
        let snap = state.snapshot();
        assert!(snap.left_down && snap.left_dragging);
        assert_eq!(state.drag_baseline(), (20, 10));
    }

    #[test]
    fn test_motion_moves_cursor_only() {
        let state = InputState::new();
        state.apply_mouse(&MouseReport::new(0, 1, 1, true));
        state.apply_mouse(&MouseReport::new(32, 6, 4, true));
        let snap = state.snapshot();
        assert_eq!((snap.mouse_x, snap.mouse_y), (5, 3));
        assert!(snap.left_down);
        assert_eq!(state.drag_baseline(), (0, 0));
        assert_eq!(state.consume_drag_delta(), (5, 3));
        assert_eq!(state.consume_drag_delta(), (0, 0));
    }

    #[test]
    fn test_release_clears_flags() {
        let state = InputState::new();
        state.apply_mouse(&MouseReport::new(2, 3, 3, true));
        assert!(state.snapshot().right_dragging);
        state.apply_mouse(&MouseReport::new(2, 3, 3, false));
        let snap = state.snapshot();
        assert!(!snap.right_down && !snap.right_dragging);
    }

    #[test]
    fn test_wheel_accumulates_separately() {
        let state = InputState::new();
        state.apply_mouse(&MouseReport::new(64, 5, 5, true));
        state.apply_mouse(&MouseReport::new(64, 5, 5, true));
        state.apply_mouse(&MouseReport::new(65, 5, 5, true));
        assert!(!state.snapshot().left_down);
        assert_eq!(state.consume_wheel(), 1);
        assert_eq!(state.consume_wheel(), 0);
    }

    #[test]
    fn test_key_queue_fifo() {
        let state = InputState::new();
        state.enqueue_key(KeyEvent::char('a'));
        state.enqueue_key(KeyEvent::key(KeyCode::F(1)));
        assert_eq!(state.pending_keys(), 2);
        assert_eq!(state.try_dequeue_key(), Some(KeyEvent::char('a')));
        assert_eq!(state.try_dequeue_key(), Some(KeyEvent::key(KeyCode::F(1))));
        assert_eq!(state.try_dequeue_key(), None);
    }

    #[test]
    fn test_on_resize_rebases_drag() {
        let state = InputState::new();
        state.apply_mouse(&MouseReport::new(0, 1, 1, true));
        state.apply_mouse(&MouseReport::new(32, 9, 9, true));
        state.take_dirty();
        state.on_resize();
        assert!(state.is_dirty());
        assert_eq!(state.consume_drag_delta(), (0, 0));
    }
}
