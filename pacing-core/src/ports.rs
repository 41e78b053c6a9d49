//! Collaborator interfaces the engine consumes.
//!
//! Optional collaborators are injected at construction time; the no-op
//! implementations here stand in when a host does not provide one.

use crate::types::{EffectBundle, TendencyScores};

/// Applies stat deltas to the host's character model.
pub trait EffectSink {
    /// Apply one bundle of deltas.
    fn apply_effects(&mut self, effects: &EffectBundle);
}

/// Fire-and-forget analytics hook, called once per selected single-shot event.
pub trait TelemetrySink: Send + Sync {
    /// Record that event `id` with `tag` fired at `age`.
    fn record_event(&self, id: &str, tag: &str, age: u32);
}

/// Supplies cumulative behavioural scores for the current character.
pub trait TendencyProvider: Send + Sync {
    /// Current scores.
    fn tendencies(&self) -> TendencyScores;
}

/// Telemetry sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record_event(&self, _id: &str, _tag: &str, _age: u32) {}
}

/// Tendency provider that always reports all-zero scores, so no tendency
/// bias ever applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralTendencies;

impl TendencyProvider for NeutralTendencies {
    fn tendencies(&self) -> TendencyScores {
        TendencyScores::default()
    }
}

/// Fixed scores, handy for tests and for hosts that compute tendencies
/// once per turn.
impl TendencyProvider for TendencyScores {
    fn tendencies(&self) -> TendencyScores {
        *self
    }
}

impl<T: TendencyProvider + ?Sized> TendencyProvider for std::sync::Arc<T> {
    fn tendencies(&self) -> TendencyScores {
        (**self).tendencies()
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for std::sync::Arc<T> {
    fn record_event(&self, id: &str, tag: &str, age: u32) {
        (**self).record_event(id, tag, age);
    }
}
