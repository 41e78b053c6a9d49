//! The simulated character.
//!
//! [`LifeCharacter`] is the host's authoritative model: it owns the stats
//! the director reads through [`CharacterSnapshot`] and receives choice
//! effects through [`EffectSink`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use pacing_core::{CharacterSnapshot, EffectBundle, EffectSink};

/// Upper bound for the 0–100 stats.
pub const STAT_MAX: f32 = 100.0;

/// Extra effect keys that toggle life-status flags. A positive value sets
/// the flag, a negative value clears it, zero leaves it alone.
pub const FLAG_KEYS: [&str; 4] = ["job", "partner", "married", "car"];

/// One resolved event in the character's biography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEntry {
    /// Turn the event was resolved on.
    pub turn: u32,
    /// Age at resolution.
    pub age: u32,
    /// Event or arc ID.
    pub event_id: String,
    /// Display title.
    pub title: String,
    /// Index of the choice taken.
    pub choice_index: usize,
}

/// A simulated person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeCharacter {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// 0–100.
    pub health: f32,
    /// 0–100.
    pub happiness: f32,
    /// 0–100.
    pub stress: f32,
    /// Unbounded; may go negative (debt).
    pub money: f64,
    /// 0–100.
    pub intelligence: f32,
    /// Employed.
    pub has_job: bool,
    /// In a relationship.
    pub has_partner: bool,
    /// Married.
    pub is_married: bool,
    /// Owns a car.
    pub has_car: bool,
    /// Accumulated host-specific stats from unrecognised effect keys.
    pub extras: BTreeMap<String, f64>,
    /// Unique pool events this life has already seen.
    pub seen_unique: BTreeSet<String>,
    /// Resolved events, oldest first.
    pub history: Vec<LifeEntry>,
}

impl Default for LifeCharacter {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 0,
            health: 80.0,
            happiness: 60.0,
            stress: 20.0,
            money: 0.0,
            intelligence: 50.0,
            has_job: false,
            has_partner: false,
            is_married: false,
            has_car: false,
            extras: BTreeMap::new(),
            seen_unique: BTreeSet::new(),
            history: Vec::new(),
        }
    }
}

impl LifeCharacter {
    /// A newborn with default stats.
    #[must_use]
    pub fn newborn(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The read-only view the director evaluates.
    #[must_use]
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            age: self.age,
            health: self.health,
            happiness: self.happiness,
            stress: self.stress,
            money: self.money,
            intelligence: self.intelligence,
            has_job: self.has_job,
            has_partner: self.has_partner,
            is_married: self.is_married,
            has_car: self.has_car,
        }
    }

    /// Age by one year.
    pub fn age_up(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Append an entry to the biography.
    pub fn remember(&mut self, entry: LifeEntry) {
        self.history.push(entry);
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        let flag = match key {
            "job" => &mut self.has_job,
            "partner" => &mut self.has_partner,
            "married" => &mut self.is_married,
            "car" => &mut self.has_car,
            _ => return,
        };
        *flag = value;
    }
}

fn bounded(value: f32, delta: f32) -> f32 {
    (value + delta).clamp(0.0, STAT_MAX)
}

impl EffectSink for LifeCharacter {
    fn apply_effects(&mut self, effects: &EffectBundle) {
        self.health = bounded(self.health, effects.health);
        self.happiness = bounded(self.happiness, effects.happiness);
        self.stress = bounded(self.stress, effects.stress);
        self.intelligence = bounded(self.intelligence, effects.intelligence);
        self.money += effects.money;

        for (key, value) in &effects.extra {
            if FLAG_KEYS.contains(&key.as_str()) {
                if *value != 0.0 {
                    self.set_flag(key, *value > 0.0);
                }
            } else {
                *self.extras.entry(key.clone()).or_insert(0.0) += value;
            }
        }

        debug!(
            name = %self.name,
            health = self.health,
            happiness = self.happiness,
            stress = self.stress,
            money = self.money,
            "Effects applied"
        );
    }
}
