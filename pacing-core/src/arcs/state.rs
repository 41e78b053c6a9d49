//! Persisted arc progress and the stage payload handed to hosts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::content::{ArcDefinition, ArcStage};
use crate::error::Result;
use crate::types::{EffectBundle, TendencyScores};

/// Progress record of one running arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveArc {
    /// Definition ID.
    pub arc_id: String,
    /// Index of the stage last presented.
    pub current_stage_index: usize,
    /// Turn the current stage was presented (or its clock last restarted).
    pub turn_of_last_stage: u32,
    /// Flags set by resolved choices.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Set by a choice that holds the arc back; the next stage then waits
    /// an extra full gap.
    #[serde(default)]
    pub stalled: bool,
}

impl ActiveArc {
    /// A fresh record at stage 0.
    #[must_use]
    pub fn started(arc_id: impl Into<String>, turn: u32) -> Self {
        Self {
            arc_id: arc_id.into(),
            current_stage_index: 0,
            turn_of_last_stage: turn,
            flags: BTreeMap::new(),
            stalled: false,
        }
    }

    /// Turns that must pass since `turn_of_last_stage` before a stage with
    /// minimum gap `gap` may follow.
    #[must_use]
    pub fn required_wait(&self, gap: u32) -> u32 {
        if self.stalled {
            gap.saturating_add(gap.max(1))
        } else {
            gap
        }
    }
}

/// Everything the arc manager persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcManagerState {
    /// Running arcs, in start order.
    pub active: Vec<ActiveArc>,
    /// IDs of arcs that have ended. They never restart.
    pub completed: BTreeSet<String>,
}

impl ArcManagerState {
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

/// One arc stage ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcStep {
    /// Arc definition ID.
    pub arc_id: String,
    /// Arc display title.
    pub arc_title: String,
    /// Index of this stage.
    pub stage_index: usize,
    /// Stage count of the arc.
    pub total_stages: usize,
    /// The stage itself.
    pub stage: ArcStage,
    /// Flags accumulated so far, for narrative framing.
    pub flags: BTreeMap<String, bool>,
}

impl ArcStep {
    pub(crate) fn from_record(definition: &ArcDefinition, record: &ActiveArc) -> Option<Self> {
        let stage = definition.stages.get(record.current_stage_index)?;
        Some(Self {
            arc_id: definition.id.clone(),
            arc_title: definition.title.clone(),
            stage_index: record.current_stage_index,
            total_stages: definition.stage_count(),
            stage: stage.clone(),
            flags: record.flags.clone(),
        })
    }

    /// Whether this is the opening stage.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.stage_index == 0
    }
}

/// Result of resolving an arc choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    /// Arc resolved.
    pub arc_id: String,
    /// Stage the choice belonged to.
    pub stage_index: usize,
    /// `Some` for risk choices: whether the roll succeeded.
    pub succeeded: Option<bool>,
    /// Effects that were applied.
    pub effects: EffectBundle,
    /// Tendency deltas the host may accumulate.
    pub tendencies: TendencyScores,
    /// Whether the arc ended as a result.
    pub arc_completed: bool,
}
