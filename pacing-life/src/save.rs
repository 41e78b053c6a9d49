//! Save files.
//!
//! A [`SaveBundle`] carries everything needed to resume a playthrough
//! exactly: character, tendencies, director and arc state, unresolved
//! events and the session seed. It is stored as pretty-printed JSON.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use pacing_core::{ArcManagerState, DirectorState, TendencyScores, TurnEvent};

use crate::character::LifeCharacter;
use crate::error::{LifeError, Result};

/// Format version written by this build.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Serialized playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBundle {
    /// Unique ID of this save.
    pub save_id: Uuid,
    /// Playthrough the save belongs to.
    pub playthrough_id: Uuid,
    /// Wall-clock time of saving.
    pub saved_at: DateTime<Utc>,
    /// Layout version.
    pub format_version: u32,
    /// Session seed.
    pub seed: u64,
    /// Years simulated so far.
    pub turn: u32,
    /// The character.
    pub character: LifeCharacter,
    /// Cumulative tendency totals.
    pub tendencies: TendencyScores,
    /// Director pacing state.
    pub director: DirectorState,
    /// Running and completed arcs.
    pub arcs: ArcManagerState,
    /// Events presented but not yet resolved.
    #[serde(default)]
    pub pending: Vec<TurnEvent>,
}

impl SaveBundle {
    /// Encode as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and check the format version.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or was written by an
    /// incompatible version.
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(json)?;
        if bundle.format_version != SAVE_FORMAT_VERSION {
            return Err(LifeError::SaveVersion {
                found: bundle.format_version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        Ok(bundle)
    }

    /// Write to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or I/O failure.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        info!(
            save_id = %self.save_id,
            turn = self.turn,
            path = %path.display(),
            "Playthrough saved"
        );
        Ok(())
    }

    /// Read a save from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or is from an
    /// incompatible version.
    pub fn read_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let bundle = Self::from_json(&json)?;
        info!(save_id = %bundle.save_id, turn = bundle.turn, "Save loaded");
        Ok(bundle)
    }
}
