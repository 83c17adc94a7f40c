//! Coalescing of recompute passes after bursts of edits
//!
//! The engine never reads a clock: hosts pass monotonic milliseconds
//! (`performance.now()` in the browser, `Instant` on the server).

/// Default coalescing window for recompute passes
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeDebouncer {
    window_ms: u64,
    last_edit_ms: Option<u64>,
}

impl Default for RecomputeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl RecomputeDebouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_edit_ms: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Record an edit; restarts the window
    pub fn notify(&mut self, now_ms: u64) {
        self.last_edit_ms = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit_ms.is_some()
    }

    /// Milliseconds until the pending pass is due, if one is pending
    pub fn due_in(&self, now_ms: u64) -> Option<u64> {
        self.last_edit_ms
            .map(|last| last.saturating_add(self.window_ms).saturating_sub(now_ms))
    }

    /// Returns `true` once per burst, when the window has elapsed since the
    /// last edit. The caller runs the recompute pass on `true`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.last_edit_ms {
            Some(last) if now_ms.saturating_sub(last) >= self.window_ms => {
                self.last_edit_ms = None;
                true
            }
            _ => false,
        }
    }
}
