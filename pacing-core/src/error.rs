//! Error types for the pacing core.

use thiserror::Error;

/// Top-level error type for all pacing operations.
#[derive(Error, Debug)]
pub enum PacingError {
    /// An event or arc definition is missing data the engine relies on.
    #[error("Malformed definition `{id}`: {reason}")]
    MalformedDefinition {
        /// Identifier of the offending definition (may be empty).
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A weighted draw was attempted over weights that cannot be sampled.
    #[error("Invalid selection weights (total: {total})")]
    InvalidWeights {
        /// Sum of the supplied weights.
        total: f64,
    },

    /// The referenced arc is not currently active.
    #[error("Arc not active: {0}")]
    ArcNotActive(String),

    /// The referenced arc has no definition in the loaded catalog.
    #[error("Unknown arc definition: {0}")]
    UnknownArc(String),

    /// The stage has no choice at the requested index.
    #[error("Arc `{arc_id}` stage {stage_index} has no choice {choice_index}")]
    UnknownChoice {
        /// Arc being resolved.
        arc_id: String,
        /// Stage index within the arc.
        stage_index: usize,
        /// Requested choice index.
        choice_index: usize,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacingError {
    /// Shorthand for [`PacingError::MalformedDefinition`].
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PacingError>;
