//! Coarse typing-burst detector used by tap/hold rules with `tap_typing`
//! set: while a typing burst looks active, those rules resolve in favor
//! of their tap behavior instead of waiting out the hold timeout.

use std::time::{Duration, Instant};

/// Default idle window after which a typing burst is considered over.
pub const TYPING_TIMEOUT_MSEC: u64 = 192;

pub struct TypingDetector {
    is_typing: bool,
    last_typing: Option<Instant>,
    timeout: Duration,
}

impl Default for TypingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingDetector {
    pub fn new() -> Self {
        TypingDetector {
            is_typing: false,
            last_typing: None,
            timeout: Duration::from_millis(TYPING_TIMEOUT_MSEC),
        }
    }

    /// Called when a non-modifier key release is about to be written
    /// downstream: marks a typing burst as active.
    pub fn note_release(&mut self, now: Instant) {
        self.is_typing = true;
        self.last_typing = Some(now);
    }

    /// Called on every non-UP key event arriving at the engine: if a
    /// burst is active, checks whether it has gone quiet long enough to
    /// clear, and refreshes the last-seen timestamp either way.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_typing {
            if let Some(last) = self.last_typing {
                if now.duration_since(last) > self.timeout {
                    self.is_typing = false;
                }
            }
            self.last_typing = Some(now);
        }
        self.is_typing
    }
}
