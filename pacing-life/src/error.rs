//! Error types for the life-sim host.

use thiserror::Error;

/// Errors raised by playthrough sessions, catalogs and saves.
#[derive(Error, Debug)]
pub enum LifeError {
    /// Engine error.
    #[error(transparent)]
    Pacing(#[from] pacing_core::PacingError),

    /// No pending event has this ID.
    #[error("No pending event `{0}`")]
    NotPending(String),

    /// The event has no choice at this index.
    #[error("Event `{event_id}` has no choice {choice_index}")]
    NoSuchChoice {
        /// Event being resolved.
        event_id: String,
        /// Requested choice.
        choice_index: usize,
    },

    /// The save was written by an incompatible format version.
    #[error("Unsupported save format version {found} (expected {expected})")]
    SaveVersion {
        /// Version in the file.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging could not be initialised.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, LifeError>;
