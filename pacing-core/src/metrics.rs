//! Runtime counters and instrumentation.
//!
//! Lock-free `AtomicU64` counters incremented on the hot path and read on
//! demand, plus a [`RecordingTelemetry`] sink that keeps every reported
//! event behind a `parking_lot::Mutex`.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::ports::TelemetrySink;

// ---------------------------------------------------------------------------
// Counters (lock-free)
// ---------------------------------------------------------------------------

/// Atomic counters for director and arc activity.
#[derive(Debug)]
pub struct PacingCounters {
    /// Turns evaluated.
    pub turns_evaluated: AtomicU64,
    /// Turns whose fire roll succeeded.
    pub rolls_won: AtomicU64,
    /// Single-shot events selected.
    pub events_selected: AtomicU64,
    /// Successful rolls that found no eligible candidate.
    pub empty_candidate_turns: AtomicU64,
    /// Arcs started.
    pub arcs_started: AtomicU64,
    /// Arc stages advanced past the first.
    pub arcs_advanced: AtomicU64,
    /// Arcs completed, naturally or by choice.
    pub arcs_completed: AtomicU64,
}

impl PacingCounters {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            turns_evaluated: AtomicU64::new(0),
            rolls_won: AtomicU64::new(0),
            events_selected: AtomicU64::new(0),
            empty_candidate_turns: AtomicU64::new(0),
            arcs_started: AtomicU64::new(0),
            arcs_advanced: AtomicU64::new(0),
            arcs_completed: AtomicU64::new(0),
        }
    }

    /// Increment one counter.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            turns_evaluated: self.turns_evaluated.load(Ordering::Relaxed),
            rolls_won: self.rolls_won.load(Ordering::Relaxed),
            events_selected: self.events_selected.load(Ordering::Relaxed),
            empty_candidate_turns: self.empty_candidate_turns.load(Ordering::Relaxed),
            arcs_started: self.arcs_started.load(Ordering::Relaxed),
            arcs_advanced: self.arcs_advanced.load(Ordering::Relaxed),
            arcs_completed: self.arcs_completed.load(Ordering::Relaxed),
        }
    }
}

impl Default for PacingCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Turns evaluated.
    pub turns_evaluated: u64,
    /// Turns whose fire roll succeeded.
    pub rolls_won: u64,
    /// Single-shot events selected.
    pub events_selected: u64,
    /// Successful rolls with no eligible candidate.
    pub empty_candidate_turns: u64,
    /// Arcs started.
    pub arcs_started: u64,
    /// Arc stages advanced.
    pub arcs_advanced: u64,
    /// Arcs completed.
    pub arcs_completed: u64,
}

impl CounterSnapshot {
    /// Share of evaluated turns that produced a single-shot event.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn event_rate(&self) -> f64 {
        if self.turns_evaluated == 0 {
            return 0.0;
        }
        self.events_selected as f64 / self.turns_evaluated as f64
    }

    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "turns={} rolls_won={} events={} empty={} arcs(start/adv/done)={}/{}/{} rate={:.1}%",
            self.turns_evaluated,
            self.rolls_won,
            self.events_selected,
            self.empty_candidate_turns,
            self.arcs_started,
            self.arcs_advanced,
            self.arcs_completed,
            self.event_rate() * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Recording telemetry
// ---------------------------------------------------------------------------

/// One reported single-shot event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Event ID.
    pub id: String,
    /// Event tag.
    pub tag: String,
    /// Character age when it fired.
    pub age: u32,
}

/// Telemetry sink that remembers everything it is told.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    records: Mutex<Vec<TelemetryRecord>>,
}

impl RecordingTelemetry {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records so far, in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.lock().clone()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn record_event(&self, id: &str, tag: &str, age: u32) {
        self.records.lock().push(TelemetryRecord {
            id: id.to_string(),
            tag: tag.to_string(),
            age,
        });
    }
}

// ---------------------------------------------------------------------------
// Tracing span names
// ---------------------------------------------------------------------------

/// Span names used with `tracing::span!`.
pub mod spans {
    /// One director turn.
    pub const EVALUATE_YEAR: &str = "pacing::director::evaluate_year";
    /// Candidate gathering and scoring.
    pub const SELECT_EVENT: &str = "pacing::director::select";
    /// Arc advancement pass.
    pub const ADVANCE_ARCS: &str = "pacing::arcs::advance";
    /// Arc choice resolution.
    pub const ARC_CHOICE: &str = "pacing::arcs::choice";
}
