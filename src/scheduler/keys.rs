//! Key bindings.

use super::MainLoop;
use super::help::help_window;
use crate::config::UiLayers;
use crate::input::{KeyCode, KeyEvent};
use std::io::Write;
use tracing::{debug, info};

/// Autoplay rate change per `[` or `]` press.
const RATE_FACTOR: f64 = 1.25;
/// Slowest rate reachable with `[`.
const MIN_KEY_RATE: f64 = 0.2;
/// Fastest rate reachable with `]`.
const MAX_KEY_RATE: f64 = 1000.0;

impl<W: Write> MainLoop<W> {
    /// Apply up to `max_keys_per_tick` queued keys. Returns true on quit;
    /// keys after the quit key stay queued.
    pub(super) fn drain_keys(&mut self) -> bool {
        for _ in 0..self.config.max_keys_per_tick {
            let Some(key) = self.input.try_dequeue_key() else {
                break;
            };
            if key.is_quit() {
                info!("quit requested");
                return true;
            }
            self.apply_key(key);
            self.input.mark_dirty();
        }
        false
    }

    fn apply_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => self.pending_steps = self.pending_steps.saturating_add(1),

            KeyCode::Char('+' | '=') => self.zoom_at_cursor(self.config.key_zoom_factor),
            KeyCode::Char('-') => self.zoom_at_cursor(1.0 / self.config.key_zoom_factor),
            KeyCode::Char('0') => {
                let (w, h) = self.screen_size();
                self.viewport.reset_zoom_around_screen_point(w / 2, h / 2, 1.0);
            }

            KeyCode::Left | KeyCode::Char('a' | 'A') => self.pan_by_key(-1.0, 0.0),
            KeyCode::Right | KeyCode::Char('d' | 'D') => self.pan_by_key(1.0, 0.0),
            KeyCode::Up | KeyCode::Char('w' | 'W') => self.pan_by_key(0.0, -1.0),
            KeyCode::Down | KeyCode::Char('s' | 'S') => self.pan_by_key(0.0, 1.0),

            KeyCode::Char('1') => self.config.auto_play = false,
            KeyCode::Char('2') => self.set_autoplay(5.0),
            KeyCode::Char('3') => self.set_autoplay(30.0),
            KeyCode::Char('[') => {
                self.config.auto_step_per_second =
                    (self.config.auto_step_per_second / RATE_FACTOR).max(MIN_KEY_RATE);
            }
            KeyCode::Char(']') => {
                self.config.auto_step_per_second =
                    (self.config.auto_step_per_second * RATE_FACTOR).min(MAX_KEY_RATE);
            }

            KeyCode::F(1) => self.toggle_help(),
            KeyCode::F(5) => self.config.layers = UiLayers::ALL,
            KeyCode::F(6) => self.config.layers = UiLayers::MAP,
            KeyCode::F(7) => self.config.layers = UiLayers::RULERS | UiLayers::STATUS_BAR,
            KeyCode::F(8) => self.config.layers.toggle(UiLayers::OVERLAYS),

            KeyCode::Char('t' | 'T') => self.tooltip_enabled = !self.tooltip_enabled,
            KeyCode::Char('c' | 'C') => {
                self.config.color_mode = self.config.color_mode.toggled();
                self.terminal.set_color_mode(self.config.color_mode);
                self.terminal.clear();
            }
            _ => {}
        }
    }

    fn set_autoplay(&mut self, rate: f64) {
        self.config.auto_play = true;
        self.config.auto_step_per_second = rate;
    }

    /// Pan by a fraction of the visible world, independent of zoom.
    fn pan_by_key(&mut self, dx: f64, dy: f64) {
        let (vw, vh) = self.viewport.visible_world_size();
        let frac = self.config.pan_key_step_frac;
        self.viewport.offset(dx * vw * frac, dy * vh * frac);
    }

    /// Show or hide the help window, creating it if it was never opened or
    /// has been closed.
    fn toggle_help(&mut self) {
        if let Some(win) = self.help.and_then(|id| self.windows.get_mut(id)) {
            win.visible = !win.visible;
            debug!(visible = win.visible, "help toggled");
            return;
        }
        let (w, h) = self.screen_size();
        self.help = Some(self.windows.add(help_window(w, h)));
        debug!("help opened");
    }
}
