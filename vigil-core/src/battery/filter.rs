//! Moving-average filter for the displayed battery level

/// Fixed-window moving average
///
/// The first sample fills the whole window, so the output starts at the
/// first reading instead of ramping up from zero.
#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize> {
    window: [f32; N],
    next: usize,
    sum: f32,
    seeded: bool,
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "window must hold at least one sample");
        Self {
            window: [0.0; N],
            next: 0,
            sum: 0.0,
            seeded: false,
        }
    }

    /// Push a sample and return the new average
    pub fn update(&mut self, value: f32) -> f32 {
        if !self.seeded {
            self.window = [value; N];
            self.seeded = true;
        } else {
            self.window[self.next] = value;
            self.next = (self.next + 1) % N;
        }
        // Rebuilt from the window so rounding never accumulates
        self.sum = self.window.iter().sum();
        self.sum / N as f32
    }

    /// Current average, `None` before the first sample
    pub fn average(&self) -> Option<f32> {
        self.seeded.then(|| self.sum / N as f32)
    }

    /// Forget all samples; the next update re-seeds the window
    pub fn reset(&mut self) {
        self.next = 0;
        self.sum = 0.0;
        self.seeded = false;
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
