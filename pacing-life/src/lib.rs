//! # pacing-life — Reference Life-Sim Host
//!
//! Wires the game-agnostic `pacing-core` director into a small but
//! complete year-by-year life simulation.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               Playthrough                │
//! │  ┌─────────────┐  ┌───────────────────┐  │
//! │  │LifeCharacter│◄─┤ effects (sink)    │  │
//! │  └──────┬──────┘  └─────────▲─────────┘  │
//! │         │ snapshot          │            │
//! │         ▼                   │            │
//! │    ┌─────────────────────────────────┐   │
//! │    │     pacing_core::Director       │   │
//! │    └─────────────────────────────────┘   │
//! │  Catalog (JSON) · Tendencies · Saves     │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `character` — the simulated person, snapshot view and effect sink
//! - `catalog` — controlled events, pool events and arcs from JSON
//! - `session` — the playthrough loop: advance a year, resolve choices
//! - `save` — versioned JSON save files
//! - `tendencies` — shared behavioural tendency totals
//! - `telemetry` — fired events as structured log records
//! - `logging` — subscriber setup

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod character;
pub mod error;
pub mod logging;
pub mod save;
pub mod session;
pub mod telemetry;
pub mod tendencies;

pub use catalog::Catalog;
pub use character::LifeCharacter;
pub use error::{LifeError, Result};
pub use save::SaveBundle;
pub use session::{Playthrough, Resolution};
