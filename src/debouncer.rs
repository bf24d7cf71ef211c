use std::time::{Duration, Instant};

/// Debounce timer for search input, polled from the event loop tick.
/// Every keystroke restarts the window; only the window started by the most
/// recent keystroke ever fires.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    armed_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            armed_at: None,
        }
    }

    /// Restart the window. Any previously pending fire is superseded.
    pub fn restart(&mut self) {
        self.armed_at = Some(Instant::now());
    }

    /// Drop any pending fire without triggering it.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    /// Poll the timer. Returns true exactly once per elapsed window.
    pub fn fires(&mut self) -> bool {
        match self.armed_at {
            Some(armed) if armed.elapsed() >= self.window => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }
}
