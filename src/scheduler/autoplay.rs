//! Fixed-rate step timing and frame-rate measurement.

/// Slowest meaningful rate; keeps the step interval finite.
const MIN_RATE: f64 = 1e-4;

/// Converts elapsed time into whole simulation steps at a given rate.
///
/// Leftover time carries to the next call, so steps are never dropped
/// and never fire twice for the same interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoStepper {
    accumulator: f64,
}

impl AutoStepper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt` seconds and return the number of steps now due.
    pub fn advance(&mut self, dt: f64, steps_per_second: f64) -> u32 {
        let step = 1.0 / steps_per_second.max(MIN_RATE);
        self.accumulator += dt.max(0.0);
        let due = (self.accumulator / step).floor();
        if !due.is_finite() || due < 1.0 {
            return 0;
        }
        let fired = due.min(f64::from(u32::MAX));
        self.accumulator = (self.accumulator - fired * step).max(0.0);
        // Time owed beyond the u32 cap is dropped.
        if self.accumulator >= step {
            self.accumulator = 0.0;
        }
        fired as u32
    }

    /// Seconds carried toward the next step.
    #[must_use]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frames per second averaged over one-second windows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f64,
    fps: f64,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame drawn `dt` seconds after the previous tick.
    pub fn record_frame(&mut self, dt: f64) {
        self.frames += 1;
        self.elapsed += dt.max(0.0);
        if self.elapsed >= 1.0 {
            self.fps = f64::from(self.frames) / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    /// Rate measured over the last completed window.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
