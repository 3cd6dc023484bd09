//! Storage seam for the recalculation engine.
//!
//! Matches, predictions and feed rows are read-only here; score records are the
//! only thing written. Implementations must make `upsert_score` atomic per
//! prediction id, since overlapping runs rely on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::models::jornada::{FeedResult, Match, Prediction, RoundScore, UpsertOutcome};

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ScoringStore: Send + Sync {
    /// Matches whose kickoff is at or before `now`, in any status.
    async fn fetch_matches_due(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError>;

    /// Rounds holding a finished match with at least one prediction lacking a score record.
    async fn fetch_rounds_with_unscored_finished(&self) -> Result<Vec<i32>, StoreError>;

    async fn fetch_round_matches(&self, round_number: i32) -> Result<Vec<Match>, StoreError>;

    async fn fetch_round_predictions(&self, round_number: i32) -> Result<Vec<Prediction>, StoreError>;

    async fn fetch_feed_results(&self, round_number: i32) -> Result<Vec<FeedResult>, StoreError>;

    /// Insert or overwrite the record for `prediction_id`. A record already holding
    /// `points` is left untouched, `computed_at` included.
    async fn upsert_score(
        &self,
        prediction_id: Uuid,
        points: i32,
        computed_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Stored records for a round, highest points first.
    async fn fetch_round_scores(&self, round_number: i32) -> Result<Vec<RoundScore>, StoreError>;
}
