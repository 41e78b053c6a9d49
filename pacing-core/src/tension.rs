//! Tension model.
//!
//! Tension is a 0–100 proxy for how dramatically charged the character's
//! life is right now. Each turn it drifts toward a baseline and then picks up
//! additive pressure from the character's stats:
//!
//! | Cause                     | Delta |
//! |---------------------------|-------|
//! | health < 30 / < 50 / > 80 | +5 / +2 / −2 |
//! | money < 0 / < 1 000       | +8 / +4 |
//! | money > 200 000 / > 50 000| −4 / −2 |
//! | stress > 80 / > 60 / < 20 | +5 / +2 / −3 |
//! | happiness < 20 / > 80     | +4 / −3 |
//! | unemployed adult          | +3 |

use crate::config::DirectorConfig;
use crate::types::{CharacterSnapshot, Polarity};

/// Lower bound of tension.
pub const MIN_TENSION: f32 = 0.0;
/// Upper bound of tension.
pub const MAX_TENSION: f32 = 100.0;

/// Clamp into the valid tension range. NaN collapses to the lower bound.
#[must_use]
pub fn clamp(tension: f32) -> f32 {
    if tension.is_nan() {
        return MIN_TENSION;
    }
    tension.clamp(MIN_TENSION, MAX_TENSION)
}

/// Sum of stat-driven tension deltas for one turn.
#[must_use]
pub fn pressure(character: &CharacterSnapshot) -> f32 {
    let mut delta = 0.0;

    delta += if character.health < 30.0 {
        5.0
    } else if character.health < 50.0 {
        2.0
    } else if character.health > 80.0 {
        -2.0
    } else {
        0.0
    };

    delta += if character.money < 0.0 {
        8.0
    } else if character.money < 1_000.0 {
        4.0
    } else if character.money > 200_000.0 {
        -4.0
    } else if character.money > 50_000.0 {
        -2.0
    } else {
        0.0
    };

    delta += if character.stress > 80.0 {
        5.0
    } else if character.stress > 60.0 {
        2.0
    } else if character.stress < 20.0 {
        -3.0
    } else {
        0.0
    };

    delta += if character.happiness < 20.0 {
        4.0
    } else if character.happiness > 80.0 {
        -3.0
    } else {
        0.0
    };

    if character.is_unemployed_adult() {
        delta += 3.0;
    }

    delta
}

/// One turn of tension update: drift toward the baseline by a fraction of
/// the gap, add stat pressure, clamp.
#[must_use]
pub fn update(current: f32, character: &CharacterSnapshot, config: &DirectorConfig) -> f32 {
    let current = clamp(current);
    let drifted = current + (config.tension_baseline - current) * config.tension_pull;
    clamp(drifted + pressure(character))
}

/// Tension shift applied after an event of `polarity` fires.
#[must_use]
pub fn outcome_shift(polarity: Polarity, config: &DirectorConfig) -> f32 {
    match polarity {
        Polarity::Positive => config.positive_outcome_shift,
        Polarity::Negative => config.negative_outcome_shift,
        Polarity::LifeChanging => config.life_changing_outcome_shift,
        Polarity::Neutral => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comfortable() -> CharacterSnapshot {
        CharacterSnapshot {
            age: 30,
            health: 70.0,
            happiness: 50.0,
            stress: 40.0,
            money: 10_000.0,
            has_job: true,
            ..Default::default()
        }
    }

    #[test]
    fn neutral_character_only_drifts() {
        let config = DirectorConfig::default();
        assert!((pressure(&comfortable())).abs() < f32::EPSILON);
        let next = update(30.0, &comfortable(), &config);
        assert!((next - 31.0).abs() < 1e-4, "30 + (50-30)*0.05 = 31, got {next}");
    }

    #[test]
    fn distress_stacks() {
        let broke = CharacterSnapshot {
            age: 25,
            health: 20.0,
            happiness: 10.0,
            stress: 90.0,
            money: -100.0,
            has_job: false,
            ..Default::default()
        };
        // 5 + 8 + 5 + 4 + 3
        assert!((pressure(&broke) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wealth_relieves() {
        let rich = CharacterSnapshot {
            money: 250_000.0,
            ..comfortable()
        };
        let comfortable_rich = CharacterSnapshot {
            money: 60_000.0,
            ..comfortable()
        };
        assert!((pressure(&rich) + 4.0).abs() < f32::EPSILON);
        assert!((pressure(&comfortable_rich) + 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn update_never_leaves_bounds() {
        let config = DirectorConfig::default();
        let dire = CharacterSnapshot {
            age: 40,
            health: 0.0,
            happiness: 0.0,
            stress: 100.0,
            money: -1e9,
            ..Default::default()
        };
        let mut t = 99.0;
        for _ in 0..50 {
            t = update(t, &dire, &config);
            assert!((MIN_TENSION..=MAX_TENSION).contains(&t));
        }
        assert!((t - MAX_TENSION).abs() < f32::EPSILON);
        assert!((update(f32::NAN, &comfortable(), &config) - 2.5).abs() < 1e-4);
    }

    #[test]
    fn outcome_shifts_follow_polarity() {
        let config = DirectorConfig::default();
        assert!((outcome_shift(Polarity::Positive, &config) + 12.0).abs() < f32::EPSILON);
        assert!((outcome_shift(Polarity::Negative, &config) - 15.0).abs() < f32::EPSILON);
        assert!((outcome_shift(Polarity::LifeChanging, &config) - 8.0).abs() < f32::EPSILON);
        assert!(outcome_shift(Polarity::Neutral, &config).abs() < f32::EPSILON);
    }
}
