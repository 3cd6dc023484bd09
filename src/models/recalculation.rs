use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::scoring::error::ScoringError;

/// A prediction (or round) that could not be scored, as it appears in a report.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssue {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}

impl ReportIssue {
    pub fn from_error(error: &ScoringError, prediction_id: Option<Uuid>) -> Self {
        let match_id = match error {
            ScoringError::UnresolvedTeamIdentity { match_id, .. }
            | ScoringError::PreconditionViolation { match_id, .. } => Some(*match_id),
            _ => None,
        };
        let prediction_id = match error {
            ScoringError::PersistenceFailure { prediction_id, .. } => Some(*prediction_id),
            _ => prediction_id,
        };
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            prediction_id,
            match_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Success,
    Failed,
}

/// Outcome of recomputing one round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundReport {
    pub round_number: i32,
    pub status: RoundStatus,
    /// Predictions whose record was written (inserted, updated or confirmed unchanged).
    pub scored: usize,
    /// Of `scored`, the records that already held the same points.
    pub unchanged: usize,
    /// Predictions on matches that are not finished yet.
    pub pending: usize,
    pub total_points: i64,
    pub errors: Vec<ReportIssue>,
}

impl RoundReport {
    pub fn empty(round_number: i32) -> Self {
        Self {
            round_number,
            status: RoundStatus::Success,
            scored: 0,
            unchanged: 0,
            pending: 0,
            total_points: 0,
            errors: Vec::new(),
        }
    }

    pub fn failed(round_number: i32, error: &ScoringError) -> Self {
        Self {
            status: RoundStatus::Failed,
            errors: vec![ReportIssue::from_error(error, None)],
            ..Self::empty(round_number)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RoundStatus::Success
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round {}: {:?}, {} scored ({} unchanged), {} pending, {} points, {} errors",
            self.round_number, self.status, self.scored, self.unchanged,
            self.pending, self.total_points, self.errors.len())
    }
}
