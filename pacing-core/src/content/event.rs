//! Single-shot event definitions: hand-authored controlled events and the
//! general data-driven pool.

use serde::{Deserialize, Serialize};

use crate::error::{PacingError, Result};
use crate::types::{CharacterSnapshot, EffectBundle, ImpactTag, Polarity, TendencyScores};

/// Inclusive age window in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    /// Youngest eligible age.
    #[serde(default)]
    pub min: u32,
    /// Oldest eligible age.
    #[serde(default = "default_max_age")]
    pub max: u32,
}

impl AgeRange {
    /// Construct a window.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Whether `age` lies inside the window.
    #[must_use]
    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }

    fn validate(&self, id: &str) -> Result<()> {
        if self.min > self.max {
            return Err(PacingError::malformed(
                id,
                format!("age range {}..={} is empty", self.min, self.max),
            ));
        }
        Ok(())
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self::new(0, default_max_age())
    }
}

fn default_max_age() -> u32 {
    120
}

/// A choice offered by a single-shot event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Button label.
    #[serde(default)]
    pub text: String,
    /// Stat deltas applied when picked.
    #[serde(default)]
    pub effects: EffectBundle,
    /// Behavioural tendency deltas recorded when picked.
    #[serde(default)]
    pub tendencies: TendencyScores,
}

/// Boolean requirements a controlled event may impose. `true` means the
/// character must have the thing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Must be employed.
    pub job: bool,
    /// Must have a partner.
    pub partner: bool,
    /// Must be married.
    pub married: bool,
    /// Must own a car.
    pub car: bool,
}

impl Requirements {
    /// Whether the character satisfies every requirement that is set.
    #[must_use]
    pub fn satisfied_by(&self, character: &CharacterSnapshot) -> bool {
        (!self.job || character.has_job)
            && (!self.partner || character.has_partner)
            && (!self.married || character.is_married)
            && (!self.car || character.has_car)
    }
}

/// Stat thresholds that make a controlled event more likely the further the
/// character is beyond them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTriggers {
    /// Boost while health is below this.
    pub health_below: Option<f32>,
    /// Boost while money is below this.
    pub money_below: Option<f64>,
    /// Boost while stress is above this.
    pub stress_above: Option<f32>,
    /// Boost while happiness is below this.
    pub happiness_below: Option<f32>,
}

impl StatTriggers {
    /// Whether no trigger is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.health_below.is_none()
            && self.money_below.is_none()
            && self.stress_above.is_none()
            && self.happiness_below.is_none()
    }

    /// Weight multiplier: `1.0 + Σ overshoot`, where each stat contributes
    /// only when it is beyond its threshold. Point stats are scaled by 20,
    /// money by `money_scale`.
    #[must_use]
    pub fn boost(&self, character: &CharacterSnapshot, money_scale: f64) -> f64 {
        let mut boost = 1.0;
        if let Some(t) = self.health_below {
            if character.health < t {
                boost += f64::from(t - character.health) / 20.0;
            }
        }
        if let Some(t) = self.stress_above {
            if character.stress > t {
                boost += f64::from(character.stress - t) / 20.0;
            }
        }
        if let Some(t) = self.happiness_below {
            if character.happiness < t {
                boost += f64::from(t - character.happiness) / 20.0;
            }
        }
        if let Some(t) = self.money_below {
            if character.money < t && money_scale > 0.0 {
                boost += (t - character.money) / money_scale;
            }
        }
        boost
    }
}

/// A hand-authored, high-impact event with explicit trigger predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledEvent {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Impact tag; determines polarity.
    pub tag: ImpactTag,
    /// Eligible ages.
    #[serde(default)]
    pub age: AgeRange,
    /// Boolean requirements.
    #[serde(default)]
    pub requires: Requirements,
    /// Stat-trigger thresholds.
    #[serde(default)]
    pub stat_triggers: StatTriggers,
    /// Turns that must pass after this event fires before it may fire again.
    #[serde(default)]
    pub cooldown: u32,
    /// Maximum times this event may fire per playthrough.
    #[serde(default)]
    pub max_occurrences: Option<u32>,
    /// Extra categories, e.g. `career` or `family`.
    #[serde(default)]
    pub categories: Vec<String>,
    /// One or two choices.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ControlledEvent {
    /// Polarity derived from the impact tag.
    #[must_use]
    pub fn polarity(&self) -> Polarity {
        self.tag.polarity()
    }

    /// Reject definitions the engine cannot reason about.
    ///
    /// # Errors
    /// Returns [`PacingError::MalformedDefinition`] for an empty id, an empty
    /// age range or a missing choice list.
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.id, &self.age, self.choices.len())
    }
}

/// Rarity class of a general-pool event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Everyday.
    #[default]
    Common,
    /// Occasional.
    Uncommon,
    /// Seldom.
    Rare,
    /// Once-in-a-lifetime flavour.
    Special,
}

/// An event from the general, data-loaded pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form tag, e.g. `minor_positive`, `career`, `crisis`.
    pub tag: String,
    /// Explicit polarity; derived from `tag` when absent.
    #[serde(default)]
    pub polarity: Option<Polarity>,
    /// Eligible ages.
    #[serde(default)]
    pub age: AgeRange,
    /// Fires at most once per playthrough.
    #[serde(default)]
    pub unique: bool,
    /// Rarity class.
    #[serde(default)]
    pub rarity: Rarity,
    /// Extra categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Choices.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl PoolEvent {
    /// Explicit polarity, or the one derived from the tag.
    #[must_use]
    pub fn polarity(&self) -> Polarity {
        self.polarity.unwrap_or_else(|| Polarity::from_tag(&self.tag))
    }

    /// Whether the event is tagged or categorised as `name`.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.tag.eq_ignore_ascii_case(name)
            || self.categories.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// Reject definitions the engine cannot reason about.
    ///
    /// # Errors
    /// Returns [`PacingError::MalformedDefinition`] for an empty id, an empty
    /// age range or a missing choice list.
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.id, &self.age, self.choices.len())
    }
}

fn validate_common(id: &str, age: &AgeRange, choice_count: usize) -> Result<()> {
    if id.trim().is_empty() {
        return Err(PacingError::malformed(id, "missing id"));
    }
    age.validate(id)?;
    if choice_count == 0 {
        return Err(PacingError::malformed(id, "event has no choices"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> CharacterSnapshot {
        CharacterSnapshot {
            age: 30,
            health: 20.0,
            stress: 90.0,
            happiness: 50.0,
            money: -5000.0,
            ..Default::default()
        }
    }

    #[test]
    fn stat_trigger_boost_sums_overshoot() {
        let triggers = StatTriggers {
            health_below: Some(40.0),
            stress_above: Some(70.0),
            happiness_below: Some(30.0),
            money_below: Some(0.0),
        };
        // health: 20/20 = 1, stress: 20/20 = 1, happiness: not beyond, money: 5000/5000 = 1
        let boost = triggers.boost(&character(), 5000.0);
        assert!((boost - 4.0).abs() < 1e-9, "boost was {boost}");
    }

    #[test]
    fn stat_trigger_boost_is_neutral_when_not_beyond() {
        let triggers = StatTriggers {
            health_below: Some(10.0),
            ..Default::default()
        };
        assert!((triggers.boost(&character(), 5000.0) - 1.0).abs() < f64::EPSILON);
        assert!(StatTriggers::default().is_empty());
    }

    #[test]
    fn requirements_check_flags() {
        let reqs = Requirements {
            job: true,
            car: true,
            ..Default::default()
        };
        let mut ch = character();
        assert!(!reqs.satisfied_by(&ch));
        ch.has_job = true;
        ch.has_car = true;
        assert!(reqs.satisfied_by(&ch));
    }

    #[test]
    fn pool_event_parses_with_defaults() {
        let event: PoolEvent = serde_json::from_str(
            r#"{"id": "lottery", "tag": "major_positive", "rarity": "rare",
                "choices": [{"text": "Cash in", "effects": {"money": 10000}}]}"#,
        )
        .expect("valid pool event");
        assert_eq!(event.polarity(), Polarity::Positive);
        assert_eq!(event.rarity, Rarity::Rare);
        assert!(event.age.contains(99));
        assert!(!event.unique);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        let event = PoolEvent {
            id: "backwards".into(),
            title: String::new(),
            tag: "career".into(),
            polarity: None,
            age: AgeRange::new(40, 20),
            unique: false,
            rarity: Rarity::Common,
            categories: vec![],
            choices: vec![Choice::default()],
        };
        assert!(matches!(
            event.validate(),
            Err(PacingError::MalformedDefinition { .. })
        ));
    }
}
