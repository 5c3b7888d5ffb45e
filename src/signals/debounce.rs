//! Unanimous-window boolean debouncing.
//!
//! Interaction booleans (pinch, point, grip) only flip to true once a full
//! window of raw per-tick samples is unanimously true; a single false
//! sample drops the output immediately. Edge-triggered, not a majority
//! vote — the output never chatters while a signal hovers at threshold.

/// Largest supported window length.
pub const MAX_WINDOW: usize = 16;

/// Fixed-size ring buffer of raw boolean samples with a unanimous-window
/// output.
#[derive(Debug, Clone)]
pub struct DebounceWindow {
    samples: [bool; MAX_WINDOW],
    window: usize,
    head: usize,
    filled: usize,
    value: bool,
}

impl DebounceWindow {
    /// `window` is clamped to `1..=MAX_WINDOW`.
    pub fn new(window: usize) -> Self {
        Self {
            samples: [false; MAX_WINDOW],
            window: window.clamp(1, MAX_WINDOW),
            head: 0,
            filled: 0,
            value: false,
        }
    }

    /// Push a raw sample and return the debounced value.
    pub fn push(&mut self, raw: bool) -> bool {
        self.samples[self.head] = raw;
        self.head = (self.head + 1) % self.window;
        self.filled = (self.filled + 1).min(self.window);

        self.value = self.filled == self.window
            && self.samples[..self.window].iter().all(|&s| s);
        self.value
    }

    /// Current debounced value.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Discard all buffered samples.
    pub fn reset(&mut self) {
        self.samples = [false; MAX_WINDOW];
        self.head = 0;
        self.filled = 0;
        self.value = false;
    }
}
