//! Controlled-event eligibility gate.
//!
//! Checks run in a fixed order and stop at the first failure:
//! life cap → global gap → age window → cooldown → occurrence cap →
//! requirement flags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::content::ControlledEvent;
use crate::error::Result;
use crate::types::CharacterSnapshot;

/// Per-playthrough firing history for the controlled pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlledHistory {
    /// Times each controlled event has fired.
    pub occurrences: HashMap<String, u32>,
    /// Turn on which each controlled event last fired.
    pub last_fired: HashMap<String, u32>,
    /// Turn on which any single-shot event last fired.
    pub last_event_turn: Option<u32>,
}

impl ControlledHistory {
    /// Note that a single-shot event fired. `controlled_id` is set only when
    /// the event came from the controlled pool.
    pub fn record(&mut self, controlled_id: Option<&str>, turn: u32) {
        self.last_event_turn = Some(turn);
        if let Some(id) = controlled_id {
            *self.occurrences.entry(id.to_string()).or_insert(0) += 1;
            self.last_fired.insert(id.to_string(), turn);
        }
    }

    /// Times `id` has fired.
    #[must_use]
    pub fn occurrences_of(&self, id: &str) -> u32 {
        self.occurrences.get(id).copied().unwrap_or(0)
    }
}

/// Why a controlled event was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The playthrough-wide event cap is reached.
    LifeCapReached,
    /// Another event fired too recently.
    TooSoonAfterLastEvent,
    /// Character is outside the age window.
    OutsideAgeRange,
    /// This event fired too recently.
    CoolingDown {
        /// Turns until the cooldown lapses.
        turns_left: u32,
    },
    /// This event has fired as often as it may.
    OccurrenceCapReached,
    /// A requirement flag is not met.
    RequirementsUnmet,
}

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// May be offered.
    Eligible,
    /// Turned away.
    Blocked(BlockReason),
}

impl Verdict {
    /// Whether the event may be offered.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Inputs the gate needs beyond the event and character.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    /// Firing history.
    pub history: &'a ControlledHistory,
    /// Current turn.
    pub turn: u32,
    /// Quiet turns completed since the last single-shot event.
    pub turns_since_last_event: u32,
    /// Single-shot events fired so far this playthrough.
    pub events_this_life: u32,
    /// Playthrough-wide cap.
    pub max_events_per_life: u32,
    /// Gap settings.
    pub config: &'a GateConfig,
}

/// Evaluate one controlled event.
///
/// # Errors
/// Returns [`PacingError::MalformedDefinition`](crate::PacingError) when the
/// definition itself is unusable; callers exclude such events.
pub fn check(
    event: &ControlledEvent,
    character: &CharacterSnapshot,
    ctx: &GateContext<'_>,
) -> Result<Verdict> {
    event.validate()?;

    if ctx.events_this_life >= ctx.max_events_per_life {
        return Ok(Verdict::Blocked(BlockReason::LifeCapReached));
    }
    // The current turn is the (quiet + 1)th since the last event.
    if ctx.history.last_event_turn.is_some()
        && ctx.turns_since_last_event.saturating_add(1) < ctx.config.min_gap_turns
    {
        return Ok(Verdict::Blocked(BlockReason::TooSoonAfterLastEvent));
    }
    if !event.age.contains(character.age) {
        return Ok(Verdict::Blocked(BlockReason::OutsideAgeRange));
    }
    if let Some(&last) = ctx.history.last_fired.get(&event.id) {
        let elapsed = ctx.turn.saturating_sub(last);
        if elapsed < event.cooldown {
            return Ok(Verdict::Blocked(BlockReason::CoolingDown {
                turns_left: event.cooldown - elapsed,
            }));
        }
    }
    if let Some(cap) = event.max_occurrences {
        if ctx.history.occurrences_of(&event.id) >= cap {
            return Ok(Verdict::Blocked(BlockReason::OccurrenceCapReached));
        }
    }
    if !event.requires.satisfied_by(character) {
        return Ok(Verdict::Blocked(BlockReason::RequirementsUnmet));
    }
    Ok(Verdict::Eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AgeRange, Choice, Requirements, StatTriggers};
    use crate::types::ImpactTag;

    fn event() -> ControlledEvent {
        ControlledEvent {
            id: "promotion".into(),
            title: "A promotion".into(),
            tag: ImpactTag::MajorPositive,
            age: AgeRange::new(20, 60),
            requires: Requirements {
                job: true,
                ..Default::default()
            },
            stat_triggers: StatTriggers::default(),
            cooldown: 4,
            max_occurrences: Some(2),
            categories: vec!["career".into()],
            choices: vec![Choice::default()],
        }
    }

    fn worker() -> CharacterSnapshot {
        CharacterSnapshot {
            age: 30,
            has_job: true,
            ..Default::default()
        }
    }

    fn quiet_turns(history: &ControlledHistory, turn: u32) -> u32 {
        history
            .last_event_turn
            .map_or(0, |last| turn.saturating_sub(last).saturating_sub(1))
    }

    fn verdict(history: &ControlledHistory, turn: u32, events_this_life: u32) -> Verdict {
        let config = GateConfig::default();
        let ctx = GateContext {
            history,
            turn,
            turns_since_last_event: quiet_turns(history, turn),
            events_this_life,
            max_events_per_life: 25,
            config: &config,
        };
        check(&event(), &worker(), &ctx).expect("well-formed event")
    }

    #[test]
    fn fresh_history_is_eligible() {
        assert_eq!(verdict(&ControlledHistory::default(), 10, 0), Verdict::Eligible);
    }

    #[test]
    fn life_cap_checked_first() {
        let mut history = ControlledHistory::default();
        history.record(None, 10);
        assert_eq!(
            verdict(&history, 10, 25),
            Verdict::Blocked(BlockReason::LifeCapReached)
        );
    }

    #[test]
    fn global_gap_blocks_for_five_turns() {
        let mut history = ControlledHistory::default();
        history.record(None, 10);
        assert_eq!(
            verdict(&history, 14, 1),
            Verdict::Blocked(BlockReason::TooSoonAfterLastEvent)
        );
        assert_eq!(verdict(&history, 15, 1), Verdict::Eligible);
    }

    #[test]
    fn global_gap_counts_quiet_turns_not_host_clock() {
        let config = GateConfig::default();
        let mut history = ControlledHistory::default();
        history.record(None, 0);
        let ctx = |quiet| GateContext {
            history: &history,
            turn: 0,
            turns_since_last_event: quiet,
            events_this_life: 1,
            max_events_per_life: 25,
            config: &config,
        };
        assert_eq!(
            check(&event(), &worker(), &ctx(3)).expect("valid"),
            Verdict::Blocked(BlockReason::TooSoonAfterLastEvent)
        );
        assert_eq!(check(&event(), &worker(), &ctx(4)).expect("valid"), Verdict::Eligible);
    }

    #[test]
    fn own_cooldown_and_occurrence_cap() {
        let config = GateConfig { min_gap_turns: 0 };
        let mut history = ControlledHistory::default();
        history.record(Some("promotion"), 10);
        let ctx = GateContext {
            history: &history,
            turn: 12,
            turns_since_last_event: 1,
            events_this_life: 1,
            max_events_per_life: 25,
            config: &config,
        };
        assert_eq!(
            check(&event(), &worker(), &ctx).expect("valid"),
            Verdict::Blocked(BlockReason::CoolingDown { turns_left: 2 })
        );

        history.record(Some("promotion"), 20);
        let ctx = GateContext {
            history: &history,
            turn: 40,
            turns_since_last_event: 19,
            events_this_life: 2,
            max_events_per_life: 25,
            config: &config,
        };
        assert_eq!(
            check(&event(), &worker(), &ctx).expect("valid"),
            Verdict::Blocked(BlockReason::OccurrenceCapReached)
        );
    }

    #[test]
    fn age_and_requirements() {
        let config = GateConfig::default();
        let history = ControlledHistory::default();
        let ctx = GateContext {
            history: &history,
            turn: 0,
            turns_since_last_event: 0,
            events_this_life: 0,
            max_events_per_life: 25,
            config: &config,
        };
        let teen = CharacterSnapshot {
            age: 15,
            has_job: true,
            ..Default::default()
        };
        assert_eq!(
            check(&event(), &teen, &ctx).expect("valid"),
            Verdict::Blocked(BlockReason::OutsideAgeRange)
        );
        let idle = CharacterSnapshot {
            age: 30,
            ..Default::default()
        };
        assert_eq!(
            check(&event(), &idle, &ctx).expect("valid"),
            Verdict::Blocked(BlockReason::RequirementsUnmet)
        );
    }

    #[test]
    fn malformed_event_is_an_error() {
        let config = GateConfig::default();
        let history = ControlledHistory::default();
        let ctx = GateContext {
            history: &history,
            turn: 0,
            turns_since_last_event: 0,
            events_this_life: 0,
            max_events_per_life: 25,
            config: &config,
        };
        let mut broken = event();
        broken.choices.clear();
        assert!(check(&broken, &worker(), &ctx).is_err());
    }
}
