//! Weighted candidate scoring.
//!
//! Each candidate starts from its pool base weight and is multiplied, in a
//! fixed order, by rarity, life-stage bias, tension bias, phase bias,
//! stat-trigger boost, anti-repetition penalties and tendency bias. The
//! product is floored so nothing eligible ever becomes impossible.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::config::{ScoringConfig, StageBias};
use crate::content::Rarity;
use crate::ledger::HistoryLedger;
use crate::phase::Phase;
use crate::types::{CharacterSnapshot, LifeStage, Polarity, TendencyScores};

/// Tension above which positive events are favoured.
pub const HIGH_TENSION: f32 = 60.0;
/// Tension below which negative events are favoured.
pub const LOW_TENSION: f32 = 30.0;
/// Positive-event multiplier at high tension.
pub const HIGH_TENSION_RELIEF: f64 = 1.5;
/// Negative-event multiplier at low tension.
pub const LOW_TENSION_DISRUPTION: f64 = 1.4;
/// Negative or life-changing multiplier during a climax.
pub const CLIMAX_BIAS: f64 = 1.8;
/// Positive multiplier during recovery.
pub const RECOVERY_BIAS: f64 = 1.6;
/// Tag seen at least twice in the tag window.
pub const REPEATED_TAG_PENALTY: f64 = 0.15;
/// Tag seen once in the tag window.
pub const RECENT_TAG_PENALTY: f64 = 0.5;
/// Event ID still in the ID window.
pub const RECENT_ID_PENALTY: f64 = 0.01;
/// Polarity dominating the polarity window.
pub const POLARITY_STREAK_PENALTY: f64 = 0.3;
/// Occurrences in the polarity window that count as a streak.
pub const POLARITY_STREAK_LEN: usize = 3;
/// Tendency score above which a tendency bias applies.
pub const TENDENCY_THRESHOLD: f32 = 5.0;
/// Career events for ambitious characters.
pub const CAREER_AMBITION_BIAS: f64 = 1.3;
/// Negative events for risk-takers.
pub const RISK_TOLERANCE_BIAS: f64 = 1.2;
/// Life-changing events for family-focused characters.
pub const FAMILY_FOCUS_BIAS: f64 = 1.3;

/// Named multiplier in a candidate's weight breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Rarity class.
    Rarity,
    /// Life-stage polarity bias.
    LifeStage,
    /// Tension-driven relief or disruption.
    Tension,
    /// Climax or recovery bias.
    Phase,
    /// Stat-trigger boost.
    StatTrigger,
    /// Same tag fired recently.
    RecentTag,
    /// Same event fired recently.
    RecentId,
    /// Same polarity dominating recent history.
    PolarityStreak,
    /// Behavioural tendency bias.
    Tendency,
    /// Weight raised to the floor.
    Floor,
}

/// One applied multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightFactor {
    /// Which rule.
    pub factor: Factor,
    /// Multiplier applied (for [`Factor::Floor`], the floor value).
    pub value: f64,
}

/// Everything the scorer reads besides the candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Character being evaluated.
    pub character: &'a CharacterSnapshot,
    /// Current tension.
    pub tension: f32,
    /// Current phase.
    pub phase: Phase,
    /// Recent firing history.
    pub ledger: &'a HistoryLedger,
    /// Behavioural scores; all-zero when no provider is attached.
    pub tendencies: TendencyScores,
    /// Weight tables.
    pub config: &'a ScoringConfig,
}

/// A candidate with its final weight and the multipliers that produced it.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    /// The candidate.
    pub candidate: Candidate<'a>,
    /// Multipliers other than 1.0, in application order.
    pub factors: Vec<WeightFactor>,
    /// Final weight, never below the configured floor.
    pub weight: f64,
}

struct Breakdown {
    weight: f64,
    factors: Vec<WeightFactor>,
}

impl Breakdown {
    fn apply(&mut self, factor: Factor, value: f64) {
        if (value - 1.0).abs() > f64::EPSILON {
            self.weight *= value;
            self.factors.push(WeightFactor { factor, value });
        }
    }
}

/// Score one candidate.
#[must_use]
pub fn score<'a>(candidate: &Candidate<'a>, ctx: &ScoringContext<'_>) -> ScoredCandidate<'a> {
    let event = &candidate.event;
    let polarity = event.polarity();
    let mut b = Breakdown {
        weight: candidate.base_weight,
        factors: Vec::new(),
    };

    b.apply(Factor::Rarity, rarity_weight(event.rarity(), ctx.config));
    b.apply(
        Factor::LifeStage,
        stage_multiplier(ctx.character.life_stage(), polarity, ctx.config),
    );
    b.apply(Factor::Tension, tension_bias(ctx.tension, polarity));
    b.apply(Factor::Phase, phase_bias(ctx.phase, polarity));

    if let Some(triggers) = event.stat_triggers() {
        b.apply(
            Factor::StatTrigger,
            triggers.boost(ctx.character, ctx.config.money_trigger_scale),
        );
    }

    match ctx.ledger.tag_count(event.tag()) {
        0 => {}
        1 => b.apply(Factor::RecentTag, RECENT_TAG_PENALTY),
        _ => b.apply(Factor::RecentTag, REPEATED_TAG_PENALTY),
    }
    if ctx.ledger.contains_id(event.id()) {
        b.apply(Factor::RecentId, RECENT_ID_PENALTY);
    }
    if polarity != Polarity::Neutral && ctx.ledger.polarity_count(polarity) >= POLARITY_STREAK_LEN {
        b.apply(Factor::PolarityStreak, POLARITY_STREAK_PENALTY);
    }

    b.apply(
        Factor::Tendency,
        tendency_bias(&ctx.tendencies, polarity, event.is_career()),
    );

    if b.weight < ctx.config.weight_floor || b.weight.is_nan() {
        b.weight = ctx.config.weight_floor;
        b.factors.push(WeightFactor {
            factor: Factor::Floor,
            value: ctx.config.weight_floor,
        });
    }

    ScoredCandidate {
        candidate: *candidate,
        factors: b.factors,
        weight: b.weight,
    }
}

/// Score a whole candidate list, preserving order.
#[must_use]
pub fn score_all<'a>(candidates: &[Candidate<'a>], ctx: &ScoringContext<'_>) -> Vec<ScoredCandidate<'a>> {
    candidates.iter().map(|c| score(c, ctx)).collect()
}

fn rarity_weight(rarity: Rarity, config: &ScoringConfig) -> f64 {
    match rarity {
        Rarity::Common => config.rarity.common,
        Rarity::Uncommon => config.rarity.uncommon,
        Rarity::Rare => config.rarity.rare,
        Rarity::Special => config.rarity.special,
    }
}

/// `bias × 2` for the character's stage and the event's polarity. Neutral
/// events are left alone.
fn stage_multiplier(stage: LifeStage, polarity: Polarity, config: &ScoringConfig) -> f64 {
    let table = &config.life_stages;
    let bias: &StageBias = match stage {
        LifeStage::Childhood => &table.childhood,
        LifeStage::YoungAdult => &table.young_adult,
        LifeStage::Midlife => &table.midlife,
        LifeStage::Senior => &table.senior,
        LifeStage::Elder => &table.elder,
    };
    match polarity {
        Polarity::Positive => bias.positive * 2.0,
        Polarity::Negative => bias.negative * 2.0,
        Polarity::LifeChanging => bias.life_changing * 2.0,
        Polarity::Neutral => 1.0,
    }
}

fn tension_bias(tension: f32, polarity: Polarity) -> f64 {
    match polarity {
        Polarity::Positive if tension > HIGH_TENSION => HIGH_TENSION_RELIEF,
        Polarity::Negative if tension < LOW_TENSION => LOW_TENSION_DISRUPTION,
        _ => 1.0,
    }
}

fn phase_bias(phase: Phase, polarity: Polarity) -> f64 {
    match (phase, polarity) {
        (Phase::Climax, Polarity::Negative | Polarity::LifeChanging) => CLIMAX_BIAS,
        (Phase::Recovery, Polarity::Positive) => RECOVERY_BIAS,
        _ => 1.0,
    }
}

fn tendency_bias(tendencies: &TendencyScores, polarity: Polarity, is_career: bool) -> f64 {
    let mut bias = 1.0;
    if is_career && tendencies.career_ambition > TENDENCY_THRESHOLD {
        bias *= CAREER_AMBITION_BIAS;
    }
    if polarity == Polarity::Negative && tendencies.risk_tolerance > TENDENCY_THRESHOLD {
        bias *= RISK_TOLERANCE_BIAS;
    }
    if polarity == Polarity::LifeChanging && tendencies.family_focus > TENDENCY_THRESHOLD {
        bias *= FAMILY_FOCUS_BIAS;
    }
    bias
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{CandidateEvent, EventSource};
    use crate::content::{AgeRange, Choice, ControlledEvent, PoolEvent, Requirements, StatTriggers};
    use crate::types::ImpactTag;

    fn pool(id: &str, tag: &str, rarity: Rarity) -> PoolEvent {
        PoolEvent {
            id: id.into(),
            title: String::new(),
            tag: tag.into(),
            polarity: None,
            age: AgeRange::default(),
            unique: false,
            rarity,
            categories: vec![],
            choices: vec![Choice::default()],
        }
    }

    fn candidate(event: &PoolEvent) -> Candidate<'_> {
        Candidate {
            source: EventSource::Pool,
            event: CandidateEvent::Pool(event),
            base_weight: 1.0,
        }
    }

    fn adult() -> CharacterSnapshot {
        CharacterSnapshot {
            age: 30,
            ..Default::default()
        }
    }

    fn ctx<'a>(
        character: &'a CharacterSnapshot,
        ledger: &'a HistoryLedger,
        config: &'a ScoringConfig,
        phase: Phase,
        tension: f32,
    ) -> ScoringContext<'a> {
        ScoringContext {
            character,
            tension,
            phase,
            ledger,
            tendencies: TendencyScores::default(),
            config,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rarity_and_life_stage_multiply() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = adult();
        let event = pool("rare_win", "minor_positive", Rarity::Rare);
        let scored = score(&candidate(&event), &ctx(&character, &ledger, &config, Phase::Calm, 45.0));
        // 1.0 × 0.4 × (0.40 × 2)
        assert!(approx(scored.weight, 0.32), "got {}", scored.weight);
        assert_eq!(scored.factors.len(), 2);
    }

    #[test]
    fn climax_favours_negative() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = adult();
        let bad = pool("layoff", "major_negative", Rarity::Common);
        let good = pool("raise", "major_positive", Rarity::Common);
        let c = ctx(&character, &ledger, &config, Phase::Climax, 45.0);
        // 0.30 × 2 × 1.8 vs 0.40 × 2
        assert!(approx(score(&candidate(&bad), &c).weight, 1.08));
        assert!(approx(score(&candidate(&good), &c).weight, 0.8));
    }

    #[test]
    fn tension_relief_and_disruption() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = adult();
        let good = pool("raise", "minor_positive", Rarity::Common);
        let bad = pool("flat_tire", "minor_negative", Rarity::Common);
        let high = ctx(&character, &ledger, &config, Phase::Calm, 65.0);
        let low = ctx(&character, &ledger, &config, Phase::Calm, 20.0);
        assert!(approx(score(&candidate(&good), &high).weight, 0.8 * 1.5));
        assert!(approx(score(&candidate(&bad), &low).weight, 0.6 * 1.4));
    }

    #[test]
    fn immediate_repeat_is_nearly_excluded() {
        let config = ScoringConfig::default();
        let mut ledger = HistoryLedger::default();
        ledger.record("misc", "street_fair", Polarity::Neutral);
        let character = adult();
        let fair = pool("street_fair", "misc", Rarity::Common);
        let scored = score(&candidate(&fair), &ctx(&character, &ledger, &config, Phase::Calm, 45.0));
        // 1.0 × 0.5 (tag once) × 0.01 (id) = 0.005 → floor 0.01
        assert!(approx(scored.weight, 0.01));
        assert!(scored.factors.iter().any(|f| f.factor == Factor::RecentId));
        assert_eq!(scored.factors.last().map(|f| f.factor), Some(Factor::Floor));
    }

    #[test]
    fn polarity_streak_penalty() {
        let config = ScoringConfig::default();
        let mut ledger = HistoryLedger::default();
        for i in 0..3 {
            ledger.record(&format!("t{i}"), &format!("e{i}"), Polarity::Negative);
        }
        let character = adult();
        let bad = pool("fresh_bad", "minor_negative", Rarity::Common);
        let scored = score(&candidate(&bad), &ctx(&character, &ledger, &config, Phase::Calm, 45.0));
        assert!(approx(scored.weight, 0.6 * 0.3));
    }

    #[test]
    fn controlled_events_get_stat_trigger_boost() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = CharacterSnapshot {
            age: 40,
            health: 20.0,
            ..Default::default()
        };
        let event = ControlledEvent {
            id: "checkup".into(),
            title: String::new(),
            tag: ImpactTag::LifeChanging,
            age: AgeRange::default(),
            requires: Requirements::default(),
            stat_triggers: StatTriggers {
                health_below: Some(40.0),
                ..Default::default()
            },
            cooldown: 0,
            max_occurrences: None,
            categories: vec![],
            choices: vec![Choice::default()],
        };
        let cand = Candidate {
            source: EventSource::Controlled,
            event: CandidateEvent::Controlled(&event),
            base_weight: 3.0,
        };
        let scored = score(&cand, &ctx(&character, &ledger, &config, Phase::Calm, 45.0));
        // 3.0 × (0.25 × 2) × (1 + 20/20)
        assert!(approx(scored.weight, 3.0));
        assert!(scored.factors.iter().any(|f| f.factor == Factor::StatTrigger));
    }

    #[test]
    fn tendencies_bias_matching_events() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = adult();
        let mut job = pool("big_pitch", "minor_positive", Rarity::Common);
        job.categories.push("career".into());
        let mut c = ctx(&character, &ledger, &config, Phase::Calm, 45.0);
        c.tendencies.career_ambition = 6.0;
        assert!(approx(score(&candidate(&job), &c).weight, 0.8 * 1.3));
        c.tendencies.career_ambition = 5.0;
        assert!(approx(score(&candidate(&job), &c).weight, 0.8));
    }

    #[test]
    fn neutral_events_skip_polarity_rules() {
        let config = ScoringConfig::default();
        let ledger = HistoryLedger::default();
        let character = adult();
        let flavour = pool("rainy_day", "weather", Rarity::Common);
        let scored = score(&candidate(&flavour), &ctx(&character, &ledger, &config, Phase::Climax, 90.0));
        assert!(approx(scored.weight, 1.0));
        assert!(scored.factors.is_empty());
    }
}
