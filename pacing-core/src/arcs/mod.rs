//! Multi-stage narrative arcs.
//!
//! An arc moves `inactive → stage 0 → … → last stage → completed`. Completed
//! arcs are terminal and never restart. At most `max_active` arcs run at
//! once. Stage advancement is probabilistic and gated by each stage's
//! minimum turn gap, so arcs unfold over years rather than back to back.

mod state;

use std::sync::Arc;

use rand::Rng;
use tracing::{Level, debug, info, span, warn};

pub use state::{ActiveArc, ArcManagerState, ArcStep, ChoiceOutcome};

use crate::config::ArcConfig;
use crate::content::{ArcDefinition, RiskLevel};
use crate::error::{PacingError, Result};
use crate::metrics::{PacingCounters, spans};
use crate::ports::EffectSink;
use crate::selection::{pick_weighted, roll};
use crate::types::CharacterSnapshot;

/// Runs arc definitions against one character.
#[derive(Debug)]
pub struct ArcManager {
    definitions: Vec<ArcDefinition>,
    config: ArcConfig,
    state: ArcManagerState,
    counters: Arc<PacingCounters>,
}

impl ArcManager {
    /// Create a manager. Malformed definitions are logged and dropped.
    #[must_use]
    pub fn new(definitions: Vec<ArcDefinition>, config: ArcConfig) -> Self {
        let definitions = definitions
            .into_iter()
            .filter(|def| match def.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(id = %def.id, error = %err, "Dropping malformed arc definition");
                    false
                }
            })
            .collect();
        Self {
            definitions,
            config,
            state: ArcManagerState::default(),
            counters: Arc::new(PacingCounters::new()),
        }
    }

    /// Report arc activity into shared counters.
    #[must_use]
    pub fn with_counters(mut self, counters: Arc<PacingCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Loaded definitions.
    #[must_use]
    pub fn definitions(&self) -> &[ArcDefinition] {
        &self.definitions
    }

    /// Running arcs.
    #[must_use]
    pub fn active(&self) -> &[ActiveArc] {
        &self.state.active
    }

    /// Whether `arc_id` has ended.
    #[must_use]
    pub fn is_completed(&self, arc_id: &str) -> bool {
        self.state.completed.contains(arc_id)
    }

    /// Whether `arc_id` is running.
    #[must_use]
    pub fn is_active(&self, arc_id: &str) -> bool {
        self.state.active.iter().any(|a| a.arc_id == arc_id)
    }

    /// Snapshot for saving.
    #[must_use]
    pub fn state(&self) -> ArcManagerState {
        self.state.clone()
    }

    /// Replace progress with a saved snapshot. Records for arcs that are
    /// also marked completed are dropped, and records beyond `max_active`
    /// are discarded, newest first.
    pub fn load_state(&mut self, mut state: ArcManagerState) {
        state
            .active
            .retain(|a| !state.completed.contains(&a.arc_id));
        if state.active.len() > self.config.max_active {
            let dropped: Vec<String> = state
                .active
                .drain(self.config.max_active..)
                .map(|a| a.arc_id)
                .collect();
            warn!(
                ?dropped,
                max_active = self.config.max_active,
                "Saved state exceeds arc cap; dropping newest"
            );
        }
        self.state = state;
    }

    /// Forget all progress.
    pub fn reset(&mut self) {
        self.state = ArcManagerState::default();
    }

    /// The stage currently awaiting a choice for `arc_id`.
    #[must_use]
    pub fn current_step(&self, arc_id: &str) -> Option<ArcStep> {
        let record = self.state.active.iter().find(|a| a.arc_id == arc_id)?;
        let def = self.definitions.iter().find(|d| d.id == arc_id)?;
        ArcStep::from_record(def, record)
    }

    /// Try to start one new arc.
    ///
    /// Picks among eligible definitions weighted by base chance, then blocks
    /// the start when a roll exceeds `base_chance × start_gate_multiplier`.
    pub fn try_start_arc<R: Rng + ?Sized>(
        &mut self,
        character: &CharacterSnapshot,
        turn: u32,
        rng: &mut R,
    ) -> Option<ArcStep> {
        if self.state.active.len() >= self.config.max_active {
            return None;
        }

        let eligible: Vec<&ArcDefinition> = self
            .definitions
            .iter()
            .filter(|def| {
                !self.state.active.iter().any(|a| a.arc_id == def.id)
                    && !self.state.completed.contains(&def.id)
                    && def.trigger.matches(character)
            })
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let weights: Vec<f64> = eligible.iter().map(|def| def.base_chance).collect();
        let def = match pick_weighted(&weights, rng) {
            Ok(index) => eligible[index],
            Err(err) => {
                debug!(error = %err, "No startable arc");
                return None;
            }
        };

        let gate = def.base_chance * self.config.start_gate_multiplier;
        let draw = roll(rng);
        if draw > gate {
            debug!(arc = %def.id, draw, gate, "Arc start blocked");
            return None;
        }

        let record = ActiveArc::started(def.id.clone(), turn);
        let step = ArcStep::from_record(def, &record)?;
        info!(arc = %def.id, turn, stages = def.stage_count(), "Arc started");
        self.state.active.push(record);
        PacingCounters::bump(&self.counters.arcs_started);
        Some(step)
    }

    /// One turn of arc progress.
    ///
    /// Completes arcs that have run past their final stage, advances at most
    /// one arc whose next stage gap has elapsed, and when nothing advanced
    /// occasionally tries to start a new arc.
    pub fn advance_arcs<R: Rng + ?Sized>(
        &mut self,
        character: &CharacterSnapshot,
        turn: u32,
        rng: &mut R,
    ) -> Option<ArcStep> {
        let _span = span!(Level::DEBUG, spans::ADVANCE_ARCS, turn).entered();

        let mut finished = Vec::new();
        let mut advanced = None;

        for (pos, record) in self.state.active.iter_mut().enumerate() {
            let Some(def) = self.definitions.iter().find(|d| d.id == record.arc_id) else {
                warn!(arc = %record.arc_id, "Active arc has no definition; ending it");
                finished.push(pos);
                continue;
            };
            let next = record.current_stage_index + 1;
            let Some(next_stage) = def.stages.get(next) else {
                finished.push(pos);
                continue;
            };
            let waited = turn.saturating_sub(record.turn_of_last_stage);
            let required = record.required_wait(next_stage.min_turns_since_previous);
            if waited >= required && roll(rng) < self.config.advance_chance {
                record.current_stage_index = next;
                record.turn_of_last_stage = turn;
                record.stalled = false;
                info!(arc = %def.id, stage = next, turn, "Arc advanced");
                advanced = ArcStep::from_record(def, record);
                break;
            }
        }

        for pos in finished.into_iter().rev() {
            self.complete_at(pos);
        }

        if advanced.is_some() {
            PacingCounters::bump(&self.counters.arcs_advanced);
            return advanced;
        }
        if roll(rng) < self.config.spontaneous_start_chance {
            return self.try_start_arc(character, turn, rng);
        }
        None
    }

    /// Resolve the player's choice on the current stage of `arc_id`.
    ///
    /// Applies effects through `sink`, records the choice's flag and either
    /// ends the arc, leaves its clock running, or restarts its clock so the
    /// next stage waits a full gap.
    ///
    /// # Errors
    /// [`PacingError::ArcNotActive`] if the arc is not running,
    /// [`PacingError::UnknownArc`] if its definition is gone, and
    /// [`PacingError::UnknownChoice`] for a bad choice index. No state
    /// changes and no effects are applied on error.
    pub fn process_arc_choice<R: Rng + ?Sized>(
        &mut self,
        arc_id: &str,
        choice_index: usize,
        character: &CharacterSnapshot,
        sink: &mut dyn EffectSink,
        turn: u32,
        rng: &mut R,
    ) -> Result<ChoiceOutcome> {
        let _span = span!(Level::DEBUG, spans::ARC_CHOICE, arc = arc_id, choice_index).entered();

        let pos = self
            .state
            .active
            .iter()
            .position(|a| a.arc_id == arc_id)
            .ok_or_else(|| PacingError::ArcNotActive(arc_id.to_string()))?;
        let def = self
            .definitions
            .iter()
            .find(|d| d.id == arc_id)
            .ok_or_else(|| PacingError::UnknownArc(arc_id.to_string()))?;
        let stage_index = self.state.active[pos].current_stage_index;
        let choice = def
            .stages
            .get(stage_index)
            .and_then(|stage| stage.choices.get(choice_index))
            .ok_or_else(|| PacingError::UnknownChoice {
                arc_id: arc_id.to_string(),
                stage_index,
                choice_index,
            })?
            .clone();

        let (effects, succeeded) = match choice.risk {
            Some(risk) => {
                let chance = success_chance(risk, character.intelligence, &self.config);
                let won = roll(rng) < chance;
                debug!(arc = arc_id, ?risk, chance, won, "Arc risk roll");
                let effects = if won { choice.success } else { choice.failure };
                (effects, Some(won))
            }
            None => (choice.effects, None),
        };
        sink.apply_effects(&effects);

        let record = &mut self.state.active[pos];
        if let Some(flag) = choice.set_flag {
            record.flags.insert(flag, true);
        }
        let arc_completed = if choice.ends_arc {
            self.complete_at(pos);
            true
        } else {
            if !choice.advances_arc {
                record.turn_of_last_stage = turn;
                record.stalled = true;
                debug!(arc = arc_id, stage = stage_index, turn, "Arc stalled");
            }
            false
        };

        Ok(ChoiceOutcome {
            arc_id: arc_id.to_string(),
            stage_index,
            succeeded,
            effects,
            tendencies: choice.tendencies,
            arc_completed,
        })
    }

    fn complete_at(&mut self, pos: usize) {
        let record = self.state.active.remove(pos);
        info!(arc = %record.arc_id, stage = record.current_stage_index, "Arc completed");
        self.state.completed.insert(record.arc_id);
        PacingCounters::bump(&self.counters.arcs_completed);
    }
}

/// Success probability of a risk choice: the class base plus up to
/// `intelligence_bonus` scaled by intelligence on a 0–100 scale.
#[must_use]
pub fn success_chance(risk: RiskLevel, intelligence: f32, config: &ArcConfig) -> f64 {
    let base = match risk {
        RiskLevel::Low => config.low_risk_success,
        RiskLevel::Medium => config.medium_risk_success,
        RiskLevel::High => config.high_risk_success,
    };
    let smarts = f64::from(intelligence.clamp(0.0, 100.0)) / 100.0;
    (base + smarts * config.intelligence_bonus).clamp(0.0, 1.0)
}
