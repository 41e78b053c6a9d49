//! Core type definitions shared by the director, the candidate adapters and
//! the arc manager.
//!
//! All types are plain serializable data.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// Emotional valence class of an event, derived from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Good news: relief, windfalls, small joys.
    Positive,
    /// Bad news: setbacks, losses, conflict.
    Negative,
    /// Turning points that reshape the life regardless of sign.
    LifeChanging,
    /// Flavour events with no recognisable valence. No polarity bias applies.
    Neutral,
}

impl Polarity {
    /// Derive a polarity from a free-form event tag.
    ///
    /// Recognises the five controlled impact tags, `crisis`, `milestone`,
    /// and falls back to substring matching on `positive` / `negative`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "life_changing" | "milestone" => Self::LifeChanging,
            "crisis" => Self::Negative,
            t if t.contains("negative") => Self::Negative,
            t if t.contains("positive") => Self::Positive,
            _ => Self::Neutral,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::LifeChanging => "life_changing",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five impact tags carried by hand-authored controlled events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTag {
    /// Small good news.
    MinorPositive,
    /// Small bad news.
    MinorNegative,
    /// Big good news.
    MajorPositive,
    /// Big bad news.
    MajorNegative,
    /// A turning point.
    LifeChanging,
}

impl ImpactTag {
    /// Polarity class of this tag.
    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            Self::MinorPositive | Self::MajorPositive => Polarity::Positive,
            Self::MinorNegative | Self::MajorNegative => Polarity::Negative,
            Self::LifeChanging => Polarity::LifeChanging,
        }
    }

    /// Tag as written in content files and the history ledger.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinorPositive => "minor_positive",
            Self::MinorNegative => "minor_negative",
            Self::MajorPositive => "major_positive",
            Self::MajorNegative => "major_negative",
            Self::LifeChanging => "life_changing",
        }
    }
}

// ---------------------------------------------------------------------------
// Life stages
// ---------------------------------------------------------------------------

/// Coarse age bracket used for polarity biasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    /// 0–17.
    Childhood,
    /// 18–35.
    YoungAdult,
    /// 36–55.
    Midlife,
    /// 56–75.
    Senior,
    /// 76+.
    Elder,
}

impl LifeStage {
    /// Map an age in years to its stage.
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=17 => Self::Childhood,
            18..=35 => Self::YoungAdult,
            36..=55 => Self::Midlife,
            56..=75 => Self::Senior,
            _ => Self::Elder,
        }
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// Read-only view of the character the director is pacing.
///
/// Built by the host from its own character model every turn. Stats are on
/// a 0–100 scale except `money`, which is an unbounded balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSnapshot {
    /// Age in years.
    pub age: u32,
    /// Physical health.
    pub health: f32,
    /// Happiness.
    pub happiness: f32,
    /// Stress.
    pub stress: f32,
    /// Bank balance; may be negative.
    pub money: f64,
    /// Intelligence.
    pub intelligence: f32,
    /// Currently employed.
    pub has_job: bool,
    /// In a relationship.
    pub has_partner: bool,
    /// Married.
    pub is_married: bool,
    /// Owns a car.
    pub has_car: bool,
}

impl Default for CharacterSnapshot {
    fn default() -> Self {
        Self {
            age: 0,
            health: 80.0,
            happiness: 60.0,
            stress: 30.0,
            money: 0.0,
            intelligence: 50.0,
            has_job: false,
            has_partner: false,
            is_married: false,
            has_car: false,
        }
    }
}

impl CharacterSnapshot {
    /// Adult without a job.
    #[must_use]
    pub fn is_unemployed_adult(&self) -> bool {
        self.age >= 18 && !self.has_job
    }

    /// Life stage for the current age.
    #[must_use]
    pub fn life_stage(&self) -> LifeStage {
        LifeStage::from_age(self.age)
    }
}

/// Per-turn context supplied by the host alongside the character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameContext {
    /// Turn counter for the playthrough, one turn per year. Per-event
    /// cooldowns and arc stage gaps are measured on it, so hosts should
    /// advance it every year; the global gap between single-shot events
    /// is counted by the director itself.
    pub turn: u32,
    /// IDs of `unique` pool events already seen this playthrough.
    pub seen_unique_ids: HashSet<String>,
}

impl GameContext {
    /// Context for the given turn with no unique events seen yet.
    #[must_use]
    pub fn at_turn(turn: u32) -> Self {
        Self {
            turn,
            seen_unique_ids: HashSet::new(),
        }
    }

    /// Builder-style: mark unique event IDs as already seen.
    #[must_use]
    pub fn with_seen<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seen_unique_ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

// ---------------------------------------------------------------------------
// Behavioural tendencies
// ---------------------------------------------------------------------------

/// Cumulative behavioural scores built up from past choices.
///
/// Also used as a per-choice delta in content files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendencyScores {
    /// Drive toward work and advancement.
    pub career_ambition: f32,
    /// Appetite for risky choices.
    pub risk_tolerance: f32,
    /// Priority placed on family.
    pub family_focus: f32,
    /// Care taken over health.
    pub health_consciousness: f32,
}

impl TendencyScores {
    /// Add another set of scores component-wise.
    pub fn accumulate(&mut self, delta: &Self) {
        self.career_ambition += delta.career_ambition;
        self.risk_tolerance += delta.risk_tolerance;
        self.family_focus += delta.family_focus;
        self.health_consciousness += delta.health_consciousness;
    }

    /// Whether every component is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// A bundle of stat deltas requested by a choice.
///
/// The core never applies these itself; they are handed to an
/// [`EffectSink`](crate::ports::EffectSink).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectBundle {
    /// Health delta.
    pub health: f32,
    /// Happiness delta.
    pub happiness: f32,
    /// Stress delta.
    pub stress: f32,
    /// Money delta.
    pub money: f64,
    /// Intelligence delta.
    pub intelligence: f32,
    /// Host-specific named effects (e.g. `"reputation": 5.0`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, f64>,
}

impl EffectBundle {
    /// Whether the bundle changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
