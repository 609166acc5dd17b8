//! Focus, z-order, dragging and closing across overlapping windows.

use gridscope::input::InputSnapshot;
use gridscope::{CellBuffer, Rgb, Window, WindowId, WindowManager};

const SCREEN: (i32, i32) = (40, 20);

fn click(wm: &mut WindowManager, x: i32, y: i32) {
    wm.handle_mouse(&InputSnapshot::at(x, y).with_left_down(true), SCREEN.0, SCREEN.1);
    wm.handle_mouse(&InputSnapshot::at(x, y), SCREEN.0, SCREEN.1);
}

/// A spans x 2..=11, y 2..=7; B spans x 6..=15, y 4..=9.
fn overlapping() -> (WindowManager, WindowId, WindowId) {
    let mut wm = WindowManager::new();
    let a = wm.add(Window::new(2, 2, 10, 6).with_background(Rgb::RED, 255));
    let b = wm.add(Window::new(6, 4, 10, 6).with_background(Rgb::BLUE, 255));
    (wm, a, b)
}

fn bg_at(wm: &mut WindowManager, x: i32, y: i32) -> Rgb {
    let mut buf = CellBuffer::new(SCREEN.0 as u16, SCREEN.1 as u16);
    wm.draw_all(&mut buf);
    buf.get(x, y).map(|c| c.bg).unwrap()
}

#[test]
fn later_window_wins_ties() {
    let (mut wm, _, b) = overlapping();
    assert_eq!(wm.hit_test_top(8, 5), Some(b));
    assert_eq!(bg_at(&mut wm, 8, 5), Rgb::BLUE);
}

#[test]
fn clicking_lower_window_reverses_order() {
    let (mut wm, a, b) = overlapping();

    click(&mut wm, 3, 3);
    assert_eq!(wm.active(), Some(a));
    assert_eq!(wm.hit_test_top(8, 5), Some(a));
    assert_eq!(bg_at(&mut wm, 8, 5), Rgb::RED);

    click(&mut wm, 14, 8);
    assert_eq!(wm.active(), Some(b));
    assert_eq!(wm.hit_test_top(8, 5), Some(b));
    assert_eq!(bg_at(&mut wm, 8, 5), Rgb::BLUE);
    assert!(wm.get(b).unwrap().z > wm.get(a).unwrap().z);
}

#[test]
fn clicking_empty_space_clears_focus() {
    let (mut wm, a, _) = overlapping();
    click(&mut wm, 3, 3);
    assert_eq!(wm.active(), Some(a));
    click(&mut wm, 30, 15);
    assert_eq!(wm.active(), None);
}

#[test]
fn title_drag_moves_only_the_grabbed_window() {
    let (mut wm, a, b) = overlapping();
    let (w, h) = SCREEN;

    assert!(wm.handle_mouse(&InputSnapshot::at(8, 4).with_left_down(true), w, h));
    assert!(wm.is_dragging());
    assert!(wm.handle_mouse(&InputSnapshot::at(15, 6).with_left_down(true), w, h));
    assert!(!wm.handle_mouse(&InputSnapshot::at(15, 6).with_left_down(true), w, h));
    wm.handle_mouse(&InputSnapshot::at(15, 6), w, h);
    assert!(!wm.is_dragging());

    let moved = wm.get(b).unwrap();
    assert_eq!((moved.x, moved.y), (13, 6));
    let still = wm.get(a).unwrap();
    assert_eq!((still.x, still.y), (2, 2));
}

#[test]
fn drag_is_clamped_to_screen() {
    let (mut wm, _, b) = overlapping();
    let (w, h) = SCREEN;
    wm.handle_mouse(&InputSnapshot::at(8, 4).with_left_down(true), w, h);
    wm.handle_mouse(&InputSnapshot::at(90, 90).with_left_down(true), w, h);
    wm.handle_mouse(&InputSnapshot::at(90, 90), w, h);

    let win = wm.get(b).unwrap();
    assert_eq!((win.x + win.w, win.y + win.h), SCREEN);
}

#[test]
fn close_button_removes_window_and_runs_callback() {
    use std::cell::Cell as Flag;
    use std::rc::Rc;

    let closed = Rc::new(Flag::new(false));
    let flag = Rc::clone(&closed);
    let mut wm = WindowManager::new();
    let id = wm.add(Window::new(2, 2, 10, 6).with_on_close(move |_| flag.set(true)));

    click(&mut wm, 9, 2);
    assert!(!wm.contains(id));
    assert!(closed.get());
    assert!(wm.is_empty());
}

#[test]
fn release_away_from_close_button_keeps_window() {
    let mut wm = WindowManager::new();
    let id = wm.add(Window::new(2, 2, 10, 6));
    let (w, h) = SCREEN;
    wm.handle_mouse(&InputSnapshot::at(9, 2).with_left_down(true), w, h);
    wm.handle_mouse(&InputSnapshot::at(5, 5), w, h);
    assert!(wm.contains(id));
}
