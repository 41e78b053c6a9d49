//! A single life, played year by year.
//!
//! [`Playthrough`] ties the pieces together: each call to
//! [`advance_year`](Playthrough::advance_year) ages the character, asks the
//! director for this year's events and holds them until the player picks a
//! choice through [`resolve`](Playthrough::resolve).
//!
//! Randomness is derived from the session seed and the turn number, so a
//! restored save continues exactly as the original would have.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pacing_core::content::Choice;
use pacing_core::metrics::CounterSnapshot;
use pacing_core::{
    Director, EffectBundle, EffectSink, EventPayload, EventSource, GameContext, PacingConfig,
    TurnEvent,
};

use crate::catalog::Catalog;
use crate::character::{LifeCharacter, LifeEntry};
use crate::error::{LifeError, Result};
use crate::save::{SAVE_FORMAT_VERSION, SaveBundle};
use crate::telemetry::TracingTelemetry;
use crate::tendencies::TendencyTracker;

const YEAR_SALT: u64 = 0x5945_4152;
const CHOICE_SALT: u64 = 0x4348_4f49;

/// What resolving one event did.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Event or arc ID.
    pub event_id: String,
    /// Where the event came from.
    pub source: EventSource,
    /// Choice taken.
    pub choice_index: usize,
    /// Effects applied to the character.
    pub effects: EffectBundle,
    /// Outcome of a risk roll, for risky arc choices.
    pub succeeded: Option<bool>,
    /// Whether the choice finished its arc.
    pub arc_completed: bool,
}

enum Pending {
    Single {
        source: EventSource,
        title: String,
        choice: Choice,
    },
    Arc {
        title: String,
    },
}

/// One character's life.
#[derive(Debug)]
pub struct Playthrough {
    id: Uuid,
    seed: u64,
    turn: u32,
    character: LifeCharacter,
    director: Director,
    tendencies: TendencyTracker,
    pending: Vec<TurnEvent>,
}

impl Playthrough {
    /// Start a new life over `catalog`.
    #[must_use]
    pub fn new(catalog: &Catalog, config: PacingConfig, character: LifeCharacter, seed: u64) -> Self {
        let tendencies = TendencyTracker::default();
        let director = catalog
            .director(config)
            .with_telemetry(TracingTelemetry)
            .with_tendencies(tendencies.clone());
        let id = Uuid::new_v4();
        info!(playthrough = %id, name = %character.name, seed, "Playthrough started");
        Self {
            id,
            seed,
            turn: 0,
            character,
            director,
            tendencies,
            pending: Vec::new(),
        }
    }

    /// Resume from a save.
    #[must_use]
    pub fn restore(catalog: &Catalog, config: PacingConfig, bundle: SaveBundle) -> Self {
        let tendencies = TendencyTracker::with_scores(bundle.tendencies);
        let mut director = catalog
            .director(config)
            .with_telemetry(TracingTelemetry)
            .with_tendencies(tendencies.clone());
        director.load_state(bundle.director);
        director.arcs_mut().load_state(bundle.arcs);
        info!(
            playthrough = %bundle.playthrough_id,
            save_id = %bundle.save_id,
            turn = bundle.turn,
            "Playthrough restored"
        );
        Self {
            id: bundle.playthrough_id,
            seed: bundle.seed,
            turn: bundle.turn,
            character: bundle.character,
            director,
            tendencies,
            pending: bundle.pending,
        }
    }

    /// Capture the full session state.
    #[must_use]
    pub fn save(&self) -> SaveBundle {
        SaveBundle {
            save_id: Uuid::new_v4(),
            playthrough_id: self.id,
            saved_at: chrono::Utc::now(),
            format_version: SAVE_FORMAT_VERSION,
            seed: self.seed,
            turn: self.turn,
            character: self.character.clone(),
            tendencies: self.tendencies.snapshot(),
            director: self.director.state(),
            arcs: self.director.arcs().state(),
            pending: self.pending.clone(),
        }
    }

    /// Playthrough ID.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Years simulated so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The character.
    #[must_use]
    pub fn character(&self) -> &LifeCharacter {
        &self.character
    }

    /// The director, for inspection.
    #[must_use]
    pub fn director(&self) -> &Director {
        &self.director
    }

    /// Current tendency totals.
    #[must_use]
    pub fn tendencies(&self) -> pacing_core::TendencyScores {
        self.tendencies.snapshot()
    }

    /// Events awaiting a choice.
    #[must_use]
    pub fn pending(&self) -> &[TurnEvent] {
        &self.pending
    }

    /// Engine counters.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.director.counters()
    }

    /// Simulate one year and return the events to present. Events left
    /// unresolved from the previous year are dropped.
    pub fn advance_year(&mut self) -> &[TurnEvent] {
        if !self.pending.is_empty() {
            warn!(count = self.pending.len(), turn = self.turn, "Discarding unresolved events");
            self.pending.clear();
        }

        self.turn = self.turn.saturating_add(1);
        self.character.age_up();

        let context = GameContext {
            turn: self.turn,
            seen_unique_ids: self.character.seen_unique.iter().cloned().collect(),
        };
        let mut rng = self.rng(YEAR_SALT);
        let events = self
            .director
            .evaluate_year(&self.character.snapshot(), &context, &mut rng);

        for event in &events {
            if let EventPayload::Pool(e) = &event.payload {
                if e.unique {
                    self.character.seen_unique.insert(e.id.clone());
                }
            }
        }
        debug!(turn = self.turn, age = self.character.age, events = events.len(), "Year simulated");
        self.pending = events;
        &self.pending
    }

    /// Resolve a pending event with the choice at `choice_index`.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::NotPending`] if no presented event has this ID,
    /// [`LifeError::NoSuchChoice`] for a bad index on a single-shot event,
    /// and engine errors for arc stages. The event stays pending on error.
    pub fn resolve(&mut self, event_id: &str, choice_index: usize) -> Result<Resolution> {
        let pos = self
            .pending
            .iter()
            .position(|e| e.id() == event_id)
            .ok_or_else(|| LifeError::NotPending(event_id.to_string()))?;

        let no_such_choice = || LifeError::NoSuchChoice {
            event_id: event_id.to_string(),
            choice_index,
        };
        let event = &self.pending[pos];
        let pending = match &event.payload {
            EventPayload::Controlled(e) => Pending::Single {
                source: event.source,
                title: e.title.clone(),
                choice: e.choices.get(choice_index).cloned().ok_or_else(no_such_choice)?,
            },
            EventPayload::Pool(e) => Pending::Single {
                source: event.source,
                title: e.title.clone(),
                choice: e.choices.get(choice_index).cloned().ok_or_else(no_such_choice)?,
            },
            EventPayload::ArcStage(step) => Pending::Arc {
                title: step.arc_title.clone(),
            },
        };

        let (title, resolution) = match pending {
            Pending::Single { source, title, choice } => {
                self.character.apply_effects(&choice.effects);
                self.tendencies.record(&choice.tendencies);
                let resolution = Resolution {
                    event_id: event_id.to_string(),
                    source,
                    choice_index,
                    effects: choice.effects,
                    succeeded: None,
                    arc_completed: false,
                };
                (title, resolution)
            }
            Pending::Arc { title } => {
                let snapshot = self.character.snapshot();
                let mut rng = self.rng(CHOICE_SALT.wrapping_add(self.character.history.len() as u64));
                let outcome = self.director.arcs_mut().process_arc_choice(
                    event_id,
                    choice_index,
                    &snapshot,
                    &mut self.character,
                    self.turn,
                    &mut rng,
                )?;
                self.tendencies.record(&outcome.tendencies);
                let resolution = Resolution {
                    event_id: event_id.to_string(),
                    source: EventSource::Arc,
                    choice_index,
                    effects: outcome.effects,
                    succeeded: outcome.succeeded,
                    arc_completed: outcome.arc_completed,
                };
                (title, resolution)
            }
        };

        self.pending.remove(pos);
        self.character.remember(LifeEntry {
            turn: self.turn,
            age: self.character.age,
            event_id: event_id.to_string(),
            title,
            choice_index,
        });
        info!(
            event = event_id,
            choice = choice_index,
            succeeded = ?resolution.succeeded,
            "Event resolved"
        );
        Ok(resolution)
    }

    /// Simulate `years` years, resolving every event with `choose`.
    ///
    /// # Errors
    ///
    /// Stops at the first resolution error.
    pub fn live_years<F>(&mut self, years: u32, mut choose: F) -> Result<Vec<Resolution>>
    where
        F: FnMut(&TurnEvent) -> usize,
    {
        let mut resolutions = Vec::new();
        for _ in 0..years {
            let picks: Vec<(String, usize)> = self
                .advance_year()
                .iter()
                .map(|event| (event.id().to_string(), choose(event)))
                .collect();
            for (id, choice) in picks {
                resolutions.push(self.resolve(&id, choice)?);
            }
        }
        Ok(resolutions)
    }

    fn rng(&self, salt: u64) -> StdRng {
        let turn = u64::from(self.turn).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.seed ^ turn ^ salt.rotate_left(32))
    }
}
