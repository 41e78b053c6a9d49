//! Decision trace of the last weighted selection.
//!
//! Captures the fire roll, every candidate's weight breakdown and the pick,
//! so hosts can explain or debug why an event surfaced.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::candidate::EventSource;
use crate::phase::Phase;
use crate::scoring::{ScoredCandidate, WeightFactor};

/// One candidate's contribution to a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    /// Event ID.
    pub id: String,
    /// Originating pool.
    pub source: EventSource,
    /// Pool base weight.
    pub base_weight: f64,
    /// Multipliers applied in order.
    pub factors: Vec<WeightFactor>,
    /// Weight used for the draw.
    pub final_weight: f64,
}

impl From<&ScoredCandidate<'_>> for WeightedCandidate {
    fn from(scored: &ScoredCandidate<'_>) -> Self {
        Self {
            id: scored.candidate.event.id().to_string(),
            source: scored.candidate.source,
            base_weight: scored.candidate.base_weight,
            factors: scored.factors.clone(),
            final_weight: scored.weight,
        }
    }
}

/// Record of one turn's single-shot selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTrace {
    /// Turn of the selection.
    pub turn: u32,
    /// Phase at selection time.
    pub phase: Phase,
    /// Tension at selection time.
    pub tension: f32,
    /// Fire probability for the turn.
    pub chance: f64,
    /// Uniform draw compared against `chance`.
    pub roll: f64,
    /// Candidates, heaviest first.
    pub candidates: Vec<WeightedCandidate>,
    /// ID of the selected event.
    pub chosen_id: String,
}

impl SelectionTrace {
    pub(crate) fn new(
        turn: u32,
        phase: Phase,
        tension: f32,
        chance: f64,
        roll: f64,
        scored: &[ScoredCandidate<'_>],
        chosen_id: &str,
    ) -> Self {
        let mut candidates: Vec<WeightedCandidate> = scored.iter().map(WeightedCandidate::from).collect();
        candidates.sort_by_key(|c| Reverse(OrderedFloat(c.final_weight)));
        Self {
            turn,
            phase,
            tension,
            chance,
            roll,
            candidates,
            chosen_id: chosen_id.to_string(),
        }
    }

    /// Total weight of all candidates.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.candidates.iter().map(|c| c.final_weight).sum()
    }

    /// Probability the chosen event had of being picked.
    #[must_use]
    pub fn chosen_share(&self) -> Option<f64> {
        let total = self.total_weight();
        let chosen = self.candidates.iter().find(|c| c.id == self.chosen_id)?;
        (total > 0.0).then(|| chosen.final_weight / total)
    }
}
