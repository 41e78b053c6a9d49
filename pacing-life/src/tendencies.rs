//! Running behavioural tendencies, shared with the director.

use std::sync::Arc;

use parking_lot::Mutex;

use pacing_core::{TendencyProvider, TendencyScores};

/// Cumulative tendency scores. Clones share the same totals, so one handle
/// can be given to the director while the session records choices.
#[derive(Debug, Clone, Default)]
pub struct TendencyTracker {
    scores: Arc<Mutex<TendencyScores>>,
}

impl TendencyTracker {
    /// Tracker starting from existing totals.
    #[must_use]
    pub fn with_scores(scores: TendencyScores) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores)),
        }
    }

    /// Add the deltas of a chosen option.
    pub fn record(&self, delta: &TendencyScores) {
        if !delta.is_zero() {
            self.scores.lock().accumulate(delta);
        }
    }

    /// Current totals.
    #[must_use]
    pub fn snapshot(&self) -> TendencyScores {
        *self.scores.lock()
    }

    /// Overwrite the totals (on load).
    pub fn replace(&self, scores: TendencyScores) {
        *self.scores.lock() = scores;
    }
}

impl TendencyProvider for TendencyTracker {
    fn tendencies(&self) -> TendencyScores {
        self.snapshot()
    }
}
