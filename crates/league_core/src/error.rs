use thiserror::Error;

use crate::models::{Owner, Phase};
use crate::projector::FieldKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeagueError {
    #[error("Unknown {kind} field: {name}")]
    UnknownField { kind: FieldKind, name: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Unknown index {index} on {collection}")]
    UnknownIndex { collection: &'static str, index: String },

    #[error("Illegal phase transition: {from} -> {to}")]
    IllegalTransition { from: Phase, to: Phase },

    #[error("Cannot leave {phase}: {reason}")]
    PhasePrecondition { phase: Phase, reason: String },

    #[error("Missing draft class {0}")]
    MissingDraftClass(Owner),

    #[error("Another league mutation is in progress")]
    TransitionInProgress,

    #[error("Invalid {name} parameter: {value}")]
    InvalidParameter { name: String, value: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Negotiation error: {0}")]
    Negotiation(String),

    #[error("Draft error: {0}")]
    Draft(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LeagueError {
    pub fn precondition(phase: Phase, reason: impl Into<String>) -> Self {
        LeagueError::PhasePrecondition { phase, reason: reason.into() }
    }

    /// Errors the operator can fix by acting on the league (signing, drafting,
    /// finishing games) rather than by changing code or configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LeagueError::PhasePrecondition { .. }
                | LeagueError::TransitionInProgress
                | LeagueError::Negotiation(_)
                | LeagueError::Draft(_)
        )
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> Self {
        LeagueError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for LeagueError {
    fn from(err: serde_yaml::Error) -> Self {
        LeagueError::InvalidSettings(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
