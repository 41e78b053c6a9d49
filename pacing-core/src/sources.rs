//! Candidate source adapters.
//!
//! Thin read-only views over the two event pools. Each answers "which events
//! could fire for this character right now" and normalizes the answer into
//! [`Candidate`]s. Malformed definitions are logged and skipped so one bad
//! record never costs the turn.

use tracing::warn;

use crate::candidate::{Candidate, CandidateEvent, EventSource};
use crate::config::PacingConfig;
use crate::content::{ControlledEvent, PoolEvent};
use crate::gate::{self, ControlledHistory, GateContext, Verdict};
use crate::types::{CharacterSnapshot, GameContext};

/// Tag or category of general-pool events reserved for the separate
/// stat-threshold crisis mechanism.
pub const CRISIS_TAG: &str = "crisis";

/// Everything an adapter needs besides the character.
#[derive(Debug, Clone, Copy)]
pub struct SourceContext<'a> {
    /// Host-supplied turn context.
    pub game: &'a GameContext,
    /// Single-shot events fired so far this playthrough.
    pub events_this_life: u32,
    /// Quiet turns completed since the last single-shot event.
    pub turns_since_last_event: u32,
    /// Controlled-pool firing history.
    pub history: &'a ControlledHistory,
    /// Engine configuration.
    pub config: &'a PacingConfig,
}

/// A pool that can list its currently eligible events.
pub trait CandidateSource {
    /// Eligible events, normalized and carrying their pool base weight.
    fn eligible<'a>(
        &'a self,
        character: &CharacterSnapshot,
        ctx: &SourceContext<'_>,
    ) -> Vec<Candidate<'a>>;
}

// ---------------------------------------------------------------------------
// Controlled pool
// ---------------------------------------------------------------------------

/// Hand-authored, high-impact events gated by explicit predicates.
#[derive(Debug, Clone, Default)]
pub struct ControlledPool {
    events: Vec<ControlledEvent>,
}

impl ControlledPool {
    /// Wrap a list of definitions.
    #[must_use]
    pub fn new(events: Vec<ControlledEvent>) -> Self {
        Self { events }
    }

    /// All definitions.
    #[must_use]
    pub fn events(&self) -> &[ControlledEvent] {
        &self.events
    }
}

impl CandidateSource for ControlledPool {
    fn eligible<'a>(
        &'a self,
        character: &CharacterSnapshot,
        ctx: &SourceContext<'_>,
    ) -> Vec<Candidate<'a>> {
        let gate_ctx = GateContext {
            history: ctx.history,
            turn: ctx.game.turn,
            turns_since_last_event: ctx.turns_since_last_event,
            events_this_life: ctx.events_this_life,
            max_events_per_life: ctx.config.director.max_events_per_life,
            config: &ctx.config.gate,
        };

        self.events
            .iter()
            .filter(|event| match gate::check(event, character, &gate_ctx) {
                Ok(verdict) => verdict.is_eligible(),
                Err(err) => {
                    warn!(id = %event.id, error = %err, "Excluding malformed controlled event");
                    false
                }
            })
            .map(|event| Candidate {
                source: EventSource::Controlled,
                event: CandidateEvent::Controlled(event),
                base_weight: ctx.config.scoring.controlled_base_weight,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// General pool
// ---------------------------------------------------------------------------

/// The larger data-driven pool with simple age and uniqueness filters.
#[derive(Debug, Clone, Default)]
pub struct GeneralPool {
    events: Vec<PoolEvent>,
}

impl GeneralPool {
    /// Wrap a list of definitions.
    #[must_use]
    pub fn new(events: Vec<PoolEvent>) -> Self {
        Self { events }
    }

    /// All definitions.
    #[must_use]
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    fn admits(event: &PoolEvent, character: &CharacterSnapshot, game: &GameContext) -> bool {
        if let Err(err) = event.validate() {
            warn!(id = %event.id, error = %err, "Excluding malformed pool event");
            return false;
        }
        event.age.contains(character.age)
            && !(event.unique && game.seen_unique_ids.contains(&event.id))
            && !event.has_category(CRISIS_TAG)
    }
}

impl CandidateSource for GeneralPool {
    fn eligible<'a>(
        &'a self,
        character: &CharacterSnapshot,
        ctx: &SourceContext<'_>,
    ) -> Vec<Candidate<'a>> {
        self.events
            .iter()
            .filter(|event| Self::admits(event, character, ctx.game))
            .map(|event| Candidate {
                source: EventSource::Pool,
                event: CandidateEvent::Pool(event),
                base_weight: ctx.config.scoring.pool_base_weight,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Both pools
// ---------------------------------------------------------------------------

/// The two single-shot pools the director draws from.
#[derive(Debug, Clone, Default)]
pub struct EventPools {
    /// Hand-authored pool.
    pub controlled: ControlledPool,
    /// General pool.
    pub general: GeneralPool,
}

impl EventPools {
    /// Build from raw definitions.
    #[must_use]
    pub fn new(controlled: Vec<ControlledEvent>, general: Vec<PoolEvent>) -> Self {
        Self {
            controlled: ControlledPool::new(controlled),
            general: GeneralPool::new(general),
        }
    }

    /// Eligible candidates from both pools, controlled first.
    #[must_use]
    pub fn gather<'a>(
        &'a self,
        character: &CharacterSnapshot,
        ctx: &SourceContext<'_>,
    ) -> Vec<Candidate<'a>> {
        let mut candidates = self.controlled.eligible(character, ctx);
        candidates.extend(self.general.eligible(character, ctx));
        candidates
    }
}
