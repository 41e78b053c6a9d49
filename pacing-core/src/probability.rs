//! Per-turn fire probability.
//!
//! Decides whether a single-shot event fires this turn, before any candidate
//! is gathered.

use crate::config::DirectorConfig;
use crate::phase::Phase;

/// Inputs to [`fire_chance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChanceInputs {
    /// Current phase.
    pub phase: Phase,
    /// Turns since a single-shot event last fired.
    pub turns_since_last_event: u32,
    /// Current tension.
    pub tension: f32,
    /// Single-shot events fired so far this playthrough.
    pub events_this_life: u32,
}

/// Probability in `[0, 1]` that a single-shot event fires this turn.
///
/// The life cap wins over everything. A drought of `pity_force_after` turns
/// forces `pity_forced_chance` exactly, bypassing the clamp. Otherwise the
/// phase base is adjusted for drought, recency and tension, then clamped.
#[must_use]
pub fn fire_chance(inputs: &ChanceInputs, config: &DirectorConfig) -> f64 {
    if inputs.events_this_life >= config.max_events_per_life {
        return 0.0;
    }
    if inputs.turns_since_last_event >= config.pity_force_after {
        return config.pity_forced_chance;
    }

    let mut chance = inputs.phase.base_chance(config);

    chance += match inputs.turns_since_last_event {
        t if t >= 4 => 0.30,
        3 => 0.20,
        2 => 0.10,
        _ => 0.0,
    };

    chance *= match inputs.turns_since_last_event {
        0 => 0.3,
        1 => 0.6,
        _ => 1.0,
    };

    if inputs.tension > 70.0 {
        chance += 0.15;
    } else if inputs.tension > 50.0 {
        chance += 0.05;
    }

    chance.clamp(config.min_chance, config.max_chance)
}
