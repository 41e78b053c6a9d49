//! The narrative director.
//!
//! Once per simulated year [`Director::evaluate_year`] runs, in order:
//!
//! 1. tension update from the character's stats,
//! 2. phase clock tick,
//! 3. fire-probability roll,
//! 4. on success, candidate gathering, scoring, weighted pick, bookkeeping,
//! 5. arc advancement (independent of the roll).
//!
//! It returns pending events only. Effects are applied later, when the host
//! resolves the player's choice.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, span, warn};

use crate::arcs::ArcManager;
use crate::candidate::{EventPayload, EventSource, TurnEvent};
use crate::config::PacingConfig;
use crate::content::ArcDefinition;
use crate::error::Result;
use crate::gate::ControlledHistory;
use crate::ledger::HistoryLedger;
use crate::metrics::{CounterSnapshot, PacingCounters, spans};
use crate::phase::{Phase, PhaseClock};
use crate::ports::{NeutralTendencies, NoopTelemetry, TelemetrySink, TendencyProvider};
use crate::probability::{ChanceInputs, fire_chance};
use crate::scoring::{self, ScoringContext};
use crate::selection::{pick_weighted, roll};
use crate::sources::{EventPools, SourceContext};
use crate::tension;
use crate::trace::SelectionTrace;
use crate::types::{CharacterSnapshot, GameContext, Polarity};

/// Persistent per-playthrough director state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorState {
    /// Current tension, 0–100.
    pub tension: f32,
    /// Turns since a single-shot event last fired.
    pub turns_since_last_event: u32,
    /// Single-shot events fired this playthrough.
    pub events_this_life: u32,
    /// Phase, its countdown and arc intensity.
    pub clock: PhaseClock,
    /// Recent tags, IDs and polarities.
    pub ledger: HistoryLedger,
    /// Controlled-pool firing history.
    pub controlled_history: ControlledHistory,
}

impl Default for DirectorState {
    fn default() -> Self {
        Self {
            tension: 30.0,
            turns_since_last_event: 0,
            events_this_life: 0,
            clock: PhaseClock::default(),
            ledger: HistoryLedger::default(),
            controlled_history: ControlledHistory::default(),
        }
    }
}

impl DirectorState {
    /// Fresh state for a new playthrough.
    #[must_use]
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            tension: tension::clamp(config.director.initial_tension),
            ledger: HistoryLedger::from_config(&config.scoring),
            ..Self::default()
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.clock.phase
    }

    /// Encode as JSON.
    ///
    /// # Errors
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns a serialization error for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Owned facts about the event picked this turn, captured before the
/// candidate borrows end.
struct Fired {
    event: TurnEvent,
    tag: String,
    polarity: Polarity,
    trace: SelectionTrace,
}

/// Decides, once per year, whether and which events fire.
pub struct Director {
    config: PacingConfig,
    pools: EventPools,
    arcs: ArcManager,
    state: DirectorState,
    telemetry: Box<dyn TelemetrySink>,
    tendencies: Box<dyn TendencyProvider>,
    counters: Arc<PacingCounters>,
    last_trace: Option<SelectionTrace>,
}

impl fmt::Debug for Director {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("state", &self.state)
            .field("controlled_events", &self.pools.controlled.events().len())
            .field("pool_events", &self.pools.general.events().len())
            .field("arcs", &self.arcs.active())
            .finish_non_exhaustive()
    }
}

impl Director {
    /// Build a director over the given content with no-op collaborators.
    #[must_use]
    pub fn new(config: PacingConfig, pools: EventPools, arcs: Vec<ArcDefinition>) -> Self {
        let counters = Arc::new(PacingCounters::new());
        let arcs = ArcManager::new(arcs, config.arcs.clone()).with_counters(Arc::clone(&counters));
        Self {
            state: DirectorState::from_config(&config),
            config,
            pools,
            arcs,
            telemetry: Box::new(NoopTelemetry),
            tendencies: Box::new(NeutralTendencies),
            counters,
            last_trace: None,
        }
    }

    /// Attach a telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: impl TelemetrySink + 'static) -> Self {
        self.telemetry = Box::new(telemetry);
        self
    }

    /// Attach a tendency provider.
    #[must_use]
    pub fn with_tendencies(mut self, tendencies: impl TendencyProvider + 'static) -> Self {
        self.tendencies = Box::new(tendencies);
        self
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    /// Event pools.
    #[must_use]
    pub fn pools(&self) -> &EventPools {
        &self.pools
    }

    /// Arc manager.
    #[must_use]
    pub fn arcs(&self) -> &ArcManager {
        &self.arcs
    }

    /// Arc manager, for resolving arc choices.
    pub fn arcs_mut(&mut self) -> &mut ArcManager {
        &mut self.arcs
    }

    /// Current state, borrowed.
    #[must_use]
    pub fn current(&self) -> &DirectorState {
        &self.state
    }

    /// Snapshot for saving.
    #[must_use]
    pub fn state(&self) -> DirectorState {
        self.state.clone()
    }

    /// Replace state with a saved snapshot. Tension is clamped and ledger
    /// windows are re-sized to the current configuration.
    pub fn load_state(&mut self, mut state: DirectorState) {
        state.tension = tension::clamp(state.tension);
        state.clock.turns_remaining = state.clock.turns_remaining.max(1);
        state.ledger.resize(&self.config.scoring);
        self.state = state;
        self.last_trace = None;
    }

    /// Start a new playthrough: fresh director and arc state.
    pub fn reset(&mut self) {
        self.state = DirectorState::from_config(&self.config);
        self.arcs.reset();
        self.last_trace = None;
    }

    /// Weight breakdown of the most recent selection, if the last turn made one.
    #[must_use]
    pub fn last_trace(&self) -> Option<&SelectionTrace> {
        self.last_trace.as_ref()
    }

    /// Counter values so far.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Evaluate one simulated year and return the events to present, single
    /// shot first, then at most one arc stage.
    pub fn evaluate_year<R: Rng + ?Sized>(
        &mut self,
        character: &CharacterSnapshot,
        context: &GameContext,
        rng: &mut R,
    ) -> Vec<TurnEvent> {
        let _span = span!(Level::DEBUG, spans::EVALUATE_YEAR, turn = context.turn).entered();
        self.last_trace = None;
        if !self.config.general.enabled {
            return Vec::new();
        }
        PacingCounters::bump(&self.counters.turns_evaluated);

        self.state.tension = tension::update(self.state.tension, character, &self.config.director);
        if let Some(phase) = self.state.clock.tick(&self.config.director, rng) {
            debug!(%phase, intensity = self.state.clock.arc_intensity, "Phase changed");
        }

        let mut events = Vec::with_capacity(2);

        let chance = fire_chance(
            &ChanceInputs {
                phase: self.state.clock.phase,
                turns_since_last_event: self.state.turns_since_last_event,
                tension: self.state.tension,
                events_this_life: self.state.events_this_life,
            },
            &self.config.director,
        );
        let draw = roll(rng);
        debug!(chance, draw, tension = self.state.tension, phase = %self.state.clock.phase, "Fire roll");

        let fired = if draw < chance {
            PacingCounters::bump(&self.counters.rolls_won);
            self.select(character, context, chance, draw, rng)
        } else {
            None
        };

        match fired {
            Some(fired) => {
                self.record_fired(&fired, character, context.turn);
                self.last_trace = Some(fired.trace);
                events.push(fired.event);
            }
            None => {
                self.state.turns_since_last_event = self.state.turns_since_last_event.saturating_add(1);
            }
        }

        if let Some(step) = self.arcs.advance_arcs(character, context.turn, rng) {
            events.push(TurnEvent {
                source: EventSource::Arc,
                payload: EventPayload::ArcStage(step),
            });
        }

        events
    }

    fn select<R: Rng + ?Sized>(
        &self,
        character: &CharacterSnapshot,
        context: &GameContext,
        chance: f64,
        draw: f64,
        rng: &mut R,
    ) -> Option<Fired> {
        let _span = span!(Level::DEBUG, spans::SELECT_EVENT).entered();

        let source_ctx = SourceContext {
            game: context,
            events_this_life: self.state.events_this_life,
            turns_since_last_event: self.state.turns_since_last_event,
            history: &self.state.controlled_history,
            config: &self.config,
        };
        let candidates = self.pools.gather(character, &source_ctx);
        if candidates.is_empty() {
            PacingCounters::bump(&self.counters.empty_candidate_turns);
            debug!("No eligible candidates");
            return None;
        }

        let scoring_ctx = ScoringContext {
            character,
            tension: self.state.tension,
            phase: self.state.clock.phase,
            ledger: &self.state.ledger,
            tendencies: self.tendencies.tendencies(),
            config: &self.config.scoring,
        };
        let scored = scoring::score_all(&candidates, &scoring_ctx);
        let weights: Vec<f64> = scored.iter().map(|s| s.weight).collect();
        let index = match pick_weighted(&weights, rng) {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, candidates = scored.len(), "Skipping selection");
                return None;
            }
        };

        let chosen = &scored[index];
        let event = chosen.candidate.event;
        debug!(
            id = event.id(),
            weight = chosen.weight,
            candidates = scored.len(),
            "Selected event"
        );
        Some(Fired {
            event: TurnEvent {
                source: chosen.candidate.source,
                payload: event.to_payload(),
            },
            tag: event.tag().to_string(),
            polarity: event.polarity(),
            trace: SelectionTrace::new(
                context.turn,
                self.state.clock.phase,
                self.state.tension,
                chance,
                draw,
                &scored,
                event.id(),
            ),
        })
    }

    fn record_fired(&mut self, fired: &Fired, character: &CharacterSnapshot, turn: u32) {
        let id = fired.event.id();
        self.state.events_this_life += 1;
        self.state.turns_since_last_event = 0;
        self.state.ledger.record(&fired.tag, id, fired.polarity);
        self.state.tension = tension::clamp(
            self.state.tension + tension::outcome_shift(fired.polarity, &self.config.director),
        );
        let controlled_id = (fired.event.source == EventSource::Controlled).then_some(id);
        self.state.controlled_history.record(controlled_id, turn);
        self.telemetry.record_event(id, &fired.tag, character.age);
        PacingCounters::bump(&self.counters.events_selected);
    }
}
