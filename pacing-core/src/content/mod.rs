//! Static content definitions consumed by the engine.
//!
//! The engine never authors content; it only reads these records. Hosts load
//! them from whatever data files they ship.

pub mod arc;
pub mod event;

pub use arc::{ArcChoice, ArcDefinition, ArcStage, ArcTrigger, RiskLevel};
pub use event::{AgeRange, Choice, ControlledEvent, PoolEvent, Rarity, Requirements, StatTriggers};
