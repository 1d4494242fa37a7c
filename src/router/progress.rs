//! Top-of-page progress indicator tied to route transitions.
//!
//! Purely cosmetic: the guard starts it when a transition to a named route
//! begins and stops it when the decision is made, whatever the outcome.

#[cfg(test)]
#[path = "progress_test.rs"]
mod progress_test;

use std::cell::Cell;

/// Something that can show "navigation in progress".
pub trait ProgressIndicator {
    fn start(&self);
    fn done(&self);
}

/// Counts overlapping transitions so a fast second navigation does not hide
/// the bar while the first is still pending.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    pending: Cell<u32>,
}

impl ProgressCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending.get() > 0
    }
}

impl ProgressIndicator for ProgressCounter {
    fn start(&self) {
        self.pending.set(self.pending.get().saturating_add(1));
    }

    fn done(&self) {
        self.pending.set(self.pending.get().saturating_sub(1));
    }
}
