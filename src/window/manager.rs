//! Window collection with z-order, focus, drag and close gestures.

use crate::buffer::CellBuffer;
use crate::input::InputSnapshot;
use crate::window::{Window, WindowHit, WindowId};
use tracing::debug;

/// Offsets recorded when a title-bar drag starts.
#[derive(Clone, Copy, Debug)]
struct DragState {
    id: WindowId,
    mouse_x: i32,
    mouse_y: i32,
    win_x: i32,
    win_y: i32,
}

/// Owns every window plus the focus and drag cursors.
///
/// At most one window is active and at most one is being dragged.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: Vec<Window>,
    next_id: u64,
    active: Option<WindowId>,
    drag: Option<DragState>,
    prev_left_down: bool,
    close_armed: bool,
}

impl WindowManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a window and return its handle.
    pub fn add(&mut self, mut window: Window) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        window.id = id;
        self.windows.push(window);
        id
    }

    /// Add a default-styled window at the given rectangle.
    pub fn create(&mut self, x: i32, y: i32, w: i32, h: i32) -> WindowId {
        self.add(Window::new(x, y, w, h))
    }

    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a window without running its close callback.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let idx = self.windows.iter().position(|w| w.id == id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        Some(self.windows.remove(idx))
    }

    pub fn clear(&mut self) {
        self.windows.clear();
        self.active = None;
        self.drag = None;
        self.close_armed = false;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    #[must_use]
    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    /// Focus a window (or none) without touching z-order.
    pub fn set_active(&mut self, id: Option<WindowId>) {
        self.active = id.filter(|id| self.contains(*id));
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Topmost visible window under the point; equal `z` goes to the later
    /// window.
    #[must_use]
    pub fn hit_test_top(&self, mx: i32, my: i32) -> Option<WindowId> {
        let mut best: Option<&Window> = None;
        for w in self.windows.iter().filter(|w| w.visible && w.contains(mx, my)) {
            if best.is_none_or(|b| w.z >= b.z) {
                best = Some(w);
            }
        }
        best.map(|w| w.id)
    }

    /// Whether any visible window covers the point.
    #[must_use]
    pub fn is_over_window(&self, mx: i32, my: i32) -> bool {
        self.hit_test_top(mx, my).is_some()
    }

    /// Pull every window back inside a resized screen.
    pub fn clamp_all(&mut self, screen_w: i32, screen_h: i32) {
        for w in &mut self.windows {
            w.clamp_to_screen(screen_w, screen_h);
        }
    }

    /// Raise a window above every other one.
    pub fn bring_to_front(&mut self, id: WindowId) {
        let max_z = self.windows.iter().map(|w| w.z).max().unwrap_or(0).max(0);
        if let Some(w) = self.get_mut(id) {
            w.z = max_z + 1;
        }
    }

    /// Run the focus/drag/close gesture machine for one tick.
    ///
    /// Driven by the edges of the left button against the previous call.
    /// Returns true when focus, a position or the window set changed.
    pub fn handle_mouse(&mut self, input: &InputSnapshot, screen_w: i32, screen_h: i32) -> bool {
        let down = input.left_down;
        let (mx, my) = (input.mouse_x, input.mouse_y);
        let mut changed = false;

        if down && !self.prev_left_down && self.drag.is_none() {
            changed = self.press(mx, my);
        } else if down {
            if let Some(drag) = self.drag {
                changed = self.drag_to(drag, mx, my, screen_w, screen_h);
            }
        } else if self.prev_left_down {
            changed = self.release(mx, my);
        }

        self.prev_left_down = down;
        changed
    }

    fn press(&mut self, mx: i32, my: i32) -> bool {
        let Some(id) = self.hit_test_top(mx, my) else {
            return self.active.take().is_some();
        };

        let mut changed = false;
        if self.active != Some(id) {
            self.active = Some(id);
            self.bring_to_front(id);
            changed = true;
        }

        let Some((hit, win_x, win_y)) = self.get(id).map(|w| (w.hit(mx, my), w.x, w.y)) else {
            return changed;
        };
        match hit {
            WindowHit::Close => self.close_armed = true,
            WindowHit::TitleBar => {
                self.drag = Some(DragState {
                    id,
                    mouse_x: mx,
                    mouse_y: my,
                    win_x,
                    win_y,
                });
                changed = true;
            }
            WindowHit::Body | WindowHit::None => {}
        }
        changed
    }

    fn drag_to(&mut self, drag: DragState, mx: i32, my: i32, screen_w: i32, screen_h: i32) -> bool {
        let Some(win) = self.get_mut(drag.id) else {
            self.drag = None;
            return true;
        };
        let before = (win.x, win.y, win.w, win.h);
        win.x = drag.win_x + (mx - drag.mouse_x);
        win.y = drag.win_y + (my - drag.mouse_y);
        win.clamp_to_screen(screen_w, screen_h);
        before != (win.x, win.y, win.w, win.h)
    }

    fn release(&mut self, mx: i32, my: i32) -> bool {
        let mut changed = false;

        if std::mem::take(&mut self.close_armed) {
            let target = self
                .hit_test_top(mx, my)
                .filter(|id| self.active == Some(*id))
                .filter(|id| self.get(*id).is_some_and(|w| w.is_in_close_button(mx, my)));
            if let Some(id) = target {
                self.close(id);
                changed = true;
            }
        }

        if self.drag.take().is_some() {
            changed = true;
        }
        changed
    }

    /// Remove a window and run its close callback.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(mut win) = self.remove(id) else {
            return false;
        };
        debug!(id = id.get(), "window closed");
        if let Some(mut on_close) = win.on_close.take() {
            on_close(&win);
        }
        true
    }

    /// Draw visible windows in ascending `z`; equal `z` keeps insertion
    /// order.
    pub fn draw_all(&mut self, buf: &mut CellBuffer) {
        self.windows.sort_by_key(|w| w.z);
        for w in self.windows.iter().filter(|w| w.visible) {
            w.draw(buf, self.active == Some(w.id));
        }
    }
}
