//! # Pacing Core Library
//!
//! Game-agnostic narrative director for turn-based life simulations.
//!
//! Once per simulated year the [`Director`] decides whether something
//! notable happens to the character and, if so, which event. It mixes
//! two single-shot pools (hand-authored controlled events and a general
//! data-driven pool) with long-running multi-stage arcs, and keeps the
//! rhythm watchable:
//!
//! - **Tension** — a 0–100 drama proxy driven by the character's stats
//! - **Phases** — calm → building → climax → recovery, each with its own
//!   base fire chance
//! - **Pity timer** — droughts force a near-certain event
//! - **Weighted scoring** — rarity, life stage, tension, phase, stat
//!   triggers, anti-repetition and behavioural tendencies
//! - **Arcs** — at most two concurrent story chains, each advancing at
//!   its own pace
//!
//! The core performs no I/O. All randomness comes from a caller-supplied
//! [`rand::Rng`], so runs are reproducible with a seeded generator.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arcs;
pub mod candidate;
pub mod config;
pub mod content;
pub mod director;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod phase;
pub mod ports;
pub mod probability;
pub mod scoring;
pub mod selection;
pub mod sources;
pub mod tension;
pub mod trace;
pub mod types;

pub use arcs::{ActiveArc, ArcManager, ArcManagerState, ArcStep, ChoiceOutcome};
pub use candidate::{EventPayload, EventSource, TurnEvent};
pub use config::PacingConfig;
pub use director::{Director, DirectorState};
pub use error::{PacingError, Result};
pub use phase::Phase;
pub use ports::{EffectSink, TelemetrySink, TendencyProvider};
pub use sources::EventPools;
pub use trace::SelectionTrace;
pub use types::*;
