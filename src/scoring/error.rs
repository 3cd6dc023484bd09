use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::models::jornada::MatchStatus;

/// Everything that can go wrong while selecting, scoring or persisting.
/// Only `ActiveRoundsUnavailable` aborts a whole run; the rest end up in a round report.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Data unavailable for round {round_number}: {reason}")]
    DataUnavailable { round_number: i32, reason: String },

    #[error("No result found for {home_team} vs {away_team} (match {match_id})")]
    UnresolvedTeamIdentity {
        match_id: Uuid,
        home_team: String,
        away_team: String,
    },

    #[error("Match {match_id} cannot be scored while {status}")]
    PreconditionViolation { match_id: Uuid, status: MatchStatus },

    #[error("Failed to persist score for prediction {prediction_id}: {reason}")]
    PersistenceFailure { prediction_id: Uuid, reason: String },

    #[error("Failed to load active rounds: {0}")]
    ActiveRoundsUnavailable(String),
}

impl ScoringError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::DataUnavailable { .. } => "data_unavailable",
            ScoringError::UnresolvedTeamIdentity { .. } => "unresolved_team_identity",
            ScoringError::PreconditionViolation { .. } => "precondition_violation",
            ScoringError::PersistenceFailure { .. } => "persistence_failure",
            ScoringError::ActiveRoundsUnavailable(_) => "active_rounds_unavailable",
        }
    }
}
