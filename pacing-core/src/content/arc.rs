//! Multi-stage arc definitions.

use serde::{Deserialize, Serialize};

use crate::error::{PacingError, Result};
use crate::types::{CharacterSnapshot, EffectBundle, TendencyScores};

/// Trigger predicates for starting an arc. Every predicate that is present
/// must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcTrigger {
    /// Minimum age.
    pub min_age: Option<u32>,
    /// Maximum age.
    pub max_age: Option<u32>,
    /// Minimum intelligence.
    pub min_intelligence: Option<f32>,
    /// Character must be employed.
    pub requires_job: bool,
    /// Character must be single.
    pub requires_no_partner: bool,
    /// Money must not exceed this.
    pub max_money: Option<f64>,
    /// Health must not exceed this.
    pub max_health: Option<f32>,
}

impl ArcTrigger {
    /// Whether `character` satisfies every present predicate.
    #[must_use]
    pub fn matches(&self, character: &CharacterSnapshot) -> bool {
        self.min_age.is_none_or(|min| character.age >= min)
            && self.max_age.is_none_or(|max| character.age <= max)
            && self
                .min_intelligence
                .is_none_or(|min| character.intelligence >= min)
            && (!self.requires_job || character.has_job)
            && (!self.requires_no_partner || !character.has_partner)
            && self.max_money.is_none_or(|max| character.money <= max)
            && self.max_health.is_none_or(|max| character.health <= max)
    }
}

/// Risk class of a gamble-style arc choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Likely to succeed.
    Low,
    /// Coin-flip-ish.
    Medium,
    /// Long shot.
    High,
}

/// A choice inside an arc stage.
///
/// Deterministic choices carry `effects`; risk choices carry `risk` plus
/// `success` and `failure` bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcChoice {
    /// Button label.
    #[serde(default)]
    pub text: String,
    /// Direct effects for deterministic choices.
    #[serde(default)]
    pub effects: EffectBundle,
    /// Present for risk-based choices.
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    /// Applied when a risk roll succeeds.
    #[serde(default)]
    pub success: EffectBundle,
    /// Applied when a risk roll fails.
    #[serde(default)]
    pub failure: EffectBundle,
    /// `false` stalls the arc for a full minimum gap before the next stage.
    #[serde(default = "default_true")]
    pub advances_arc: bool,
    /// Ends the arc immediately.
    #[serde(default)]
    pub ends_arc: bool,
    /// Flag recorded on the arc instance for later narrative framing.
    #[serde(default)]
    pub set_flag: Option<String>,
    /// Behavioural tendency deltas recorded when picked.
    #[serde(default)]
    pub tendencies: TendencyScores,
}

impl Default for ArcChoice {
    fn default() -> Self {
        Self {
            text: String::new(),
            effects: EffectBundle::default(),
            risk: None,
            success: EffectBundle::default(),
            failure: EffectBundle::default(),
            advances_arc: true,
            ends_arc: false,
            set_flag: None,
            tendencies: TendencyScores::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One step of an arc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcStage {
    /// Stable identifier within the arc.
    pub id: String,
    /// Narrative text.
    #[serde(default)]
    pub text: String,
    /// Turns that must pass after the previous stage before this one fires.
    #[serde(default)]
    pub min_turns_since_previous: u32,
    /// One or two choices.
    #[serde(default)]
    pub choices: Vec<ArcChoice>,
}

/// A long-lived narrative chain, e.g. "startup journey".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Start predicates.
    #[serde(default)]
    pub trigger: ArcTrigger,
    /// Weight among eligible arcs, and the start gate (`roll > base × 3` blocks).
    pub base_chance: f64,
    /// Ordered stages.
    pub stages: Vec<ArcStage>,
}

impl ArcDefinition {
    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Reject definitions the arc manager cannot run.
    ///
    /// # Errors
    /// Returns [`PacingError::MalformedDefinition`] for an empty id, a
    /// negative or non-finite base chance, no stages, or a stage without
    /// choices.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PacingError::malformed(&self.id, "missing id"));
        }
        if !self.base_chance.is_finite() || self.base_chance < 0.0 {
            return Err(PacingError::malformed(
                &self.id,
                format!("base_chance {} is not a usable weight", self.base_chance),
            ));
        }
        if self.stages.is_empty() {
            return Err(PacingError::malformed(&self.id, "arc has no stages"));
        }
        if let Some(stage) = self.stages.iter().find(|s| s.choices.is_empty()) {
            return Err(PacingError::malformed(
                &self.id,
                format!("stage `{}` has no choices", stage.id),
            ));
        }
        Ok(())
    }
}
