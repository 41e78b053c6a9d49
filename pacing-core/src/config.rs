//! Configuration for the pacing director.
//!
//! Maps directly to `pacing.toml`. Every field has a default so a partial
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

/// Top-level pacing configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PacingConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Tension, phase and fire-probability tuning.
    #[serde(default)]
    pub director: DirectorConfig,
    /// Candidate weighting and anti-repetition windows.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Controlled-event eligibility gate.
    #[serde(default)]
    pub gate: GateConfig,
    /// Multi-stage arc tuning.
    #[serde(default)]
    pub arcs: ArcConfig,
}

impl PacingConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `PacingError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::PacingError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the director fires events at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Inclusive range of turns a phase lasts, drawn uniformly on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRange {
    /// Shortest duration.
    pub min: u32,
    /// Longest duration.
    pub max: u32,
}

impl TurnRange {
    /// Create a range, swapping the bounds if given in the wrong order.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

/// Tension model, phase machine and fire-probability tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Base per-turn fire chance while calm.
    #[serde(default = "default_0_20")]
    pub calm_chance: f64,
    /// Base per-turn fire chance while building.
    #[serde(default = "default_0_40")]
    pub building_chance: f64,
    /// Base per-turn fire chance during a climax.
    #[serde(default = "default_0_65")]
    pub climax_chance: f64,
    /// Base per-turn fire chance while recovering.
    #[serde(default = "default_0_25")]
    pub recovery_chance: f64,
    /// Calm phase duration.
    #[serde(default = "default_short_phase")]
    pub calm_turns: TurnRange,
    /// Building phase duration.
    #[serde(default = "default_building_phase")]
    pub building_turns: TurnRange,
    /// Climax phase duration.
    #[serde(default = "default_short_phase")]
    pub climax_turns: TurnRange,
    /// Recovery phase duration.
    #[serde(default = "default_short_phase")]
    pub recovery_turns: TurnRange,
    /// Hard cap on single-shot events per playthrough.
    #[serde(default = "default_25")]
    pub max_events_per_life: u32,
    /// Drought length (turns) after which the pity timer forces a high chance.
    #[serde(default = "default_5")]
    pub pity_force_after: u32,
    /// Fire chance forced by the pity timer.
    #[serde(default = "default_0_95")]
    pub pity_forced_chance: f64,
    /// Lower clamp for the computed fire chance.
    #[serde(default = "default_0_05")]
    pub min_chance: f64,
    /// Upper clamp for the computed fire chance.
    #[serde(default = "default_0_90")]
    pub max_chance: f64,
    /// Tension at the start of a playthrough.
    #[serde(default = "default_30_f32")]
    pub initial_tension: f32,
    /// Resting point tension drifts toward every turn.
    #[serde(default = "default_50_f32")]
    pub tension_baseline: f32,
    /// Fraction of the gap to baseline closed per turn.
    #[serde(default = "default_0_05_f32")]
    pub tension_pull: f32,
    /// Tension shift after a positive event fires.
    #[serde(default = "default_minus_12")]
    pub positive_outcome_shift: f32,
    /// Tension shift after a negative event fires.
    #[serde(default = "default_15")]
    pub negative_outcome_shift: f32,
    /// Tension shift after a life-changing event fires.
    #[serde(default = "default_8")]
    pub life_changing_outcome_shift: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            calm_chance: 0.20,
            building_chance: 0.40,
            climax_chance: 0.65,
            recovery_chance: 0.25,
            calm_turns: TurnRange::new(1, 2),
            building_turns: TurnRange::new(2, 3),
            climax_turns: TurnRange::new(1, 2),
            recovery_turns: TurnRange::new(1, 2),
            max_events_per_life: 25,
            pity_force_after: 5,
            pity_forced_chance: 0.95,
            min_chance: 0.05,
            max_chance: 0.90,
            initial_tension: 30.0,
            tension_baseline: 50.0,
            tension_pull: 0.05,
            positive_outcome_shift: -12.0,
            negative_outcome_shift: 15.0,
            life_changing_outcome_shift: 8.0,
        }
    }
}

/// Rarity multipliers for general-pool events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityWeights {
    /// Common events.
    #[serde(default = "default_1_0")]
    pub common: f64,
    /// Uncommon events.
    #[serde(default = "default_0_70")]
    pub uncommon: f64,
    /// Rare events.
    #[serde(default = "default_0_40")]
    pub rare: f64,
    /// Special events.
    #[serde(default = "default_0_20")]
    pub special: f64,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 1.0,
            uncommon: 0.7,
            rare: 0.4,
            special: 0.2,
        }
    }
}

/// Per-polarity bias weights for one life stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageBias {
    /// Weight for positive events.
    pub positive: f64,
    /// Weight for negative events.
    pub negative: f64,
    /// Weight for life-changing events.
    pub life_changing: f64,
}

impl StageBias {
    /// Construct a bias triple.
    #[must_use]
    pub const fn new(positive: f64, negative: f64, life_changing: f64) -> Self {
        Self {
            positive,
            negative,
            life_changing,
        }
    }
}

/// Life-stage bias table. The scorer multiplies by `bias × 2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeStageBiases {
    /// Ages 0–17.
    #[serde(default = "default_childhood")]
    pub childhood: StageBias,
    /// Ages 18–35.
    #[serde(default = "default_young_adult")]
    pub young_adult: StageBias,
    /// Ages 36–55.
    #[serde(default = "default_midlife")]
    pub midlife: StageBias,
    /// Ages 56–75.
    #[serde(default = "default_senior")]
    pub senior: StageBias,
    /// Ages 76 and up.
    #[serde(default = "default_elder")]
    pub elder: StageBias,
}

impl Default for LifeStageBiases {
    fn default() -> Self {
        Self {
            childhood: default_childhood(),
            young_adult: default_young_adult(),
            midlife: default_midlife(),
            senior: default_senior(),
            elder: default_elder(),
        }
    }
}

/// Candidate weighting and history windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base weight for hand-authored controlled events.
    #[serde(default = "default_3_0")]
    pub controlled_base_weight: f64,
    /// Base weight for general-pool events.
    #[serde(default = "default_1_0")]
    pub pool_base_weight: f64,
    /// Rarity multipliers.
    #[serde(default)]
    pub rarity: RarityWeights,
    /// Life-stage polarity biases.
    #[serde(default)]
    pub life_stages: LifeStageBiases,
    /// Recent-tag window length.
    #[serde(default = "default_5_usize")]
    pub tag_window: usize,
    /// Recent-ID window length.
    #[serde(default = "default_15_usize")]
    pub id_window: usize,
    /// Recent-polarity window length.
    #[serde(default = "default_5_usize")]
    pub polarity_window: usize,
    /// Minimum weight any candidate keeps after all multipliers.
    #[serde(default = "default_0_01")]
    pub weight_floor: f64,
    /// Money shortfall that counts as one unit of stat-trigger boost.
    #[serde(default = "default_5000")]
    pub money_trigger_scale: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            controlled_base_weight: 3.0,
            pool_base_weight: 1.0,
            rarity: RarityWeights::default(),
            life_stages: LifeStageBiases::default(),
            tag_window: 5,
            id_window: 15,
            polarity_window: 5,
            weight_floor: 0.01,
            money_trigger_scale: 5000.0,
        }
    }
}

/// Controlled-event eligibility gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Turns that must pass after any single-shot event before a controlled
    /// event may fire.
    #[serde(default = "default_5")]
    pub min_gap_turns: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { min_gap_turns: 5 }
    }
}

/// Multi-stage arc tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcConfig {
    /// Maximum concurrently active arcs.
    #[serde(default = "default_2_usize")]
    pub max_active: usize,
    /// Chance an eligible stage advances on a given turn.
    #[serde(default = "default_0_50")]
    pub advance_chance: f64,
    /// Chance to try a spontaneous start when no arc advanced.
    #[serde(default = "default_0_15")]
    pub spontaneous_start_chance: f64,
    /// A start is blocked when the roll exceeds `base_chance × this`.
    #[serde(default = "default_3_0")]
    pub start_gate_multiplier: f64,
    /// Success chance of a low-risk choice.
    #[serde(default = "default_0_80")]
    pub low_risk_success: f64,
    /// Success chance of a medium-risk choice.
    #[serde(default = "default_0_55")]
    pub medium_risk_success: f64,
    /// Success chance of a high-risk choice.
    #[serde(default = "default_0_35")]
    pub high_risk_success: f64,
    /// Largest success bonus granted by intelligence (at 100).
    #[serde(default = "default_0_15")]
    pub intelligence_bonus: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            max_active: 2,
            advance_chance: 0.5,
            spontaneous_start_chance: 0.15,
            start_gate_multiplier: 3.0,
            low_risk_success: 0.80,
            medium_risk_success: 0.55,
            high_risk_success: 0.35,
            intelligence_bonus: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_short_phase() -> TurnRange { TurnRange::new(1, 2) }
fn default_building_phase() -> TurnRange { TurnRange::new(2, 3) }
fn default_childhood() -> StageBias { StageBias::new(0.60, 0.30, 0.10) }
fn default_young_adult() -> StageBias { StageBias::new(0.40, 0.30, 0.30) }
fn default_midlife() -> StageBias { StageBias::new(0.35, 0.40, 0.25) }
fn default_senior() -> StageBias { StageBias::new(0.35, 0.45, 0.20) }
fn default_elder() -> StageBias { StageBias::new(0.30, 0.55, 0.15) }
fn default_0_01() -> f64 { 0.01 }
fn default_0_05() -> f64 { 0.05 }
fn default_0_15() -> f64 { 0.15 }
fn default_0_20() -> f64 { 0.20 }
fn default_0_25() -> f64 { 0.25 }
fn default_0_35() -> f64 { 0.35 }
fn default_0_40() -> f64 { 0.40 }
fn default_0_50() -> f64 { 0.50 }
fn default_0_55() -> f64 { 0.55 }
fn default_0_65() -> f64 { 0.65 }
fn default_0_70() -> f64 { 0.70 }
fn default_0_80() -> f64 { 0.80 }
fn default_0_90() -> f64 { 0.90 }
fn default_0_95() -> f64 { 0.95 }
fn default_1_0() -> f64 { 1.0 }
fn default_3_0() -> f64 { 3.0 }
fn default_5000() -> f64 { 5000.0 }
fn default_0_05_f32() -> f32 { 0.05 }
fn default_30_f32() -> f32 { 30.0 }
fn default_50_f32() -> f32 { 50.0 }
fn default_minus_12() -> f32 { -12.0 }
fn default_15() -> f32 { 15.0 }
fn default_8() -> f32 { 8.0 }
fn default_5() -> u32 { 5 }
fn default_25() -> u32 { 25 }
fn default_2_usize() -> usize { 2 }
fn default_5_usize() -> usize { 5 }
fn default_15_usize() -> usize { 15 }
