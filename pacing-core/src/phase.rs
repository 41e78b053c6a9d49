//! Pacing phase state machine.
//!
//! Four phases cycle strictly `Calm → Building → Climax → Recovery → Calm`.
//! Each phase lasts a duration drawn uniformly on entry and sets the base
//! per-turn fire chance.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DirectorConfig, TurnRange};

/// Arc-intensity bump on entering a climax.
pub const CLIMAX_INTENSITY_GAIN: f32 = 30.0;
/// Arc-intensity drop on entering recovery.
pub const RECOVERY_INTENSITY_DROP: f32 = 40.0;

/// Coarse pacing regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Quiet stretch.
    #[default]
    Calm,
    /// Pressure rising.
    Building,
    /// Peak drama.
    Climax,
    /// Aftermath.
    Recovery,
}

impl Phase {
    /// The phase that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Calm => Self::Building,
            Self::Building => Self::Climax,
            Self::Climax => Self::Recovery,
            Self::Recovery => Self::Calm,
        }
    }

    /// Base per-turn fire chance.
    #[must_use]
    pub fn base_chance(self, config: &DirectorConfig) -> f64 {
        match self {
            Self::Calm => config.calm_chance,
            Self::Building => config.building_chance,
            Self::Climax => config.climax_chance,
            Self::Recovery => config.recovery_chance,
        }
    }

    /// Duration range drawn on entry.
    #[must_use]
    pub fn duration(self, config: &DirectorConfig) -> TurnRange {
        match self {
            Self::Calm => config.calm_turns,
            Self::Building => config.building_turns,
            Self::Climax => config.climax_turns,
            Self::Recovery => config.recovery_turns,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Building => "building",
            Self::Climax => "climax",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase plus its countdown and the informational arc-intensity
/// accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseClock {
    /// Current phase.
    pub phase: Phase,
    /// Turns left before the phase expires (always ≥ 1 between ticks).
    pub turns_remaining: u32,
    /// +30 entering climax, −40 entering recovery, reset entering
    /// building or calm. Never negative.
    pub arc_intensity: f32,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self {
            phase: Phase::Calm,
            turns_remaining: 2,
            arc_intensity: 0.0,
        }
    }
}

impl PhaseClock {
    /// A fresh clock at the start of `phase` with a freshly drawn duration.
    pub fn starting<R: Rng + ?Sized>(phase: Phase, config: &DirectorConfig, rng: &mut R) -> Self {
        Self {
            phase,
            turns_remaining: draw_duration(phase.duration(config), rng),
            arc_intensity: 0.0,
        }
    }

    /// Count one turn down; on expiry move to the next phase. Returns the
    /// new phase when a transition happened.
    pub fn tick<R: Rng + ?Sized>(&mut self, config: &DirectorConfig, rng: &mut R) -> Option<Phase> {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        if self.turns_remaining > 0 {
            return None;
        }
        let next = self.phase.next();
        self.enter(next, config, rng);
        Some(next)
    }

    fn enter<R: Rng + ?Sized>(&mut self, phase: Phase, config: &DirectorConfig, rng: &mut R) {
        self.phase = phase;
        self.turns_remaining = draw_duration(phase.duration(config), rng);
        self.arc_intensity = match phase {
            Phase::Climax => self.arc_intensity + CLIMAX_INTENSITY_GAIN,
            Phase::Recovery => (self.arc_intensity - RECOVERY_INTENSITY_DROP).max(0.0),
            Phase::Building | Phase::Calm => 0.0,
        };
    }
}

fn draw_duration<R: Rng + ?Sized>(range: TurnRange, rng: &mut R) -> u32 {
    let range = TurnRange::new(range.min.max(1), range.max.max(1));
    rng.gen_range(range.min..=range.max)
}
