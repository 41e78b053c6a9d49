//! The normalized candidate shape every scorer sees.
//!
//! Both event pools are folded into [`CandidateEvent`] at the adapter
//! boundary, so scoring never inspects pool-specific fields directly.

use serde::{Deserialize, Serialize};

use crate::arcs::ArcStep;
use crate::content::{ControlledEvent, PoolEvent, Rarity, StatTriggers};
use crate::types::Polarity;

/// Where a presented event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Hand-authored controlled pool.
    Controlled,
    /// General data-driven pool.
    Pool,
    /// A stage of a running arc.
    Arc,
}

/// Borrowed view over one definition from either pool.
#[derive(Debug, Clone, Copy)]
pub enum CandidateEvent<'a> {
    /// From the controlled pool.
    Controlled(&'a ControlledEvent),
    /// From the general pool.
    Pool(&'a PoolEvent),
}

impl<'a> CandidateEvent<'a> {
    /// Event identifier.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Controlled(e) => &e.id,
            Self::Pool(e) => &e.id,
        }
    }

    /// Tag recorded in the anti-repetition ledger.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        match self {
            Self::Controlled(e) => e.tag.as_str(),
            Self::Pool(e) => &e.tag,
        }
    }

    /// Polarity class.
    #[must_use]
    pub fn polarity(&self) -> Polarity {
        match self {
            Self::Controlled(e) => e.polarity(),
            Self::Pool(e) => e.polarity(),
        }
    }

    /// Rarity class. Controlled events count as common.
    #[must_use]
    pub fn rarity(&self) -> Rarity {
        match self {
            Self::Controlled(_) => Rarity::Common,
            Self::Pool(e) => e.rarity,
        }
    }

    /// Whether the event belongs to the career category.
    #[must_use]
    pub fn is_career(&self) -> bool {
        match self {
            Self::Controlled(e) => e.categories.iter().any(|c| c.eq_ignore_ascii_case("career")),
            Self::Pool(e) => e.has_category("career"),
        }
    }

    /// Stat triggers, for controlled events that define any.
    #[must_use]
    pub fn stat_triggers(&self) -> Option<&'a StatTriggers> {
        match self {
            Self::Controlled(e) if !e.stat_triggers.is_empty() => Some(&e.stat_triggers),
            _ => None,
        }
    }

    /// Owned copy for handing to the presentation layer.
    #[must_use]
    pub fn to_payload(&self) -> EventPayload {
        match self {
            Self::Controlled(e) => EventPayload::Controlled((*e).clone()),
            Self::Pool(e) => EventPayload::Pool((*e).clone()),
        }
    }
}

/// A candidate considered for selection this turn.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Originating pool.
    pub source: EventSource,
    /// The definition.
    pub event: CandidateEvent<'a>,
    /// Pool priority before any scoring multiplier.
    pub base_weight: f64,
}

/// Owned event handed back to the host for presentation and resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A controlled single-shot event.
    Controlled(ControlledEvent),
    /// A general-pool single-shot event.
    Pool(PoolEvent),
    /// The next stage of a running arc.
    ArcStage(ArcStep),
}

/// One event the director wants presented this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Originating pool.
    pub source: EventSource,
    /// The event itself.
    pub payload: EventPayload,
}

impl TurnEvent {
    /// Identifier of the event (the arc id for arc stages).
    #[must_use]
    pub fn id(&self) -> &str {
        match &self.payload {
            EventPayload::Controlled(e) => &e.id,
            EventPayload::Pool(e) => &e.id,
            EventPayload::ArcStage(step) => &step.arc_id,
        }
    }

    /// Whether this is an arc stage rather than a single-shot event.
    #[must_use]
    pub fn is_arc_stage(&self) -> bool {
        matches!(self.payload, EventPayload::ArcStage(_))
    }
}
