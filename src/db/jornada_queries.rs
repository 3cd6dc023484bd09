use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;
use tracing::debug;

use crate::db::store::{ScoringStore, StoreError};
use crate::models::jornada::{FeedResult, Match, Prediction, RoundScore, UpsertOutcome};

/// Postgres-backed `ScoringStore`.
#[derive(Debug, Clone)]
pub struct JornadaQueries {
    pool: PgPool,
}

impl JornadaQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MATCH_COLUMNS: &str = r#"
    m.id, r.number AS round_number, m.home_team, m.away_team,
    m.scheduled_time, m.status, m.home_goals, m.away_goals
"#;

#[async_trait]
impl ScoringStore for JornadaQueries {
    async fn fetch_matches_due(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches m
            JOIN rounds r ON r.id = m.round_id
            WHERE m.scheduled_time <= $1
            ORDER BY r.number ASC, m.scheduled_time ASC
            "#
        );
        let matches = sqlx::query_as::<_, Match>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        debug!("Found {} matches due at {}", matches.len(), now);
        Ok(matches)
    }

    async fn fetch_rounds_with_unscored_finished(&self) -> Result<Vec<i32>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT r.number AS round_number
            FROM matches m
            JOIN rounds r ON r.id = m.round_id
            JOIN predictions p ON p.match_id = m.id
            LEFT JOIN score_records s ON s.prediction_id = p.id
            WHERE m.status = 'finished' AND s.prediction_id IS NULL
            ORDER BY r.number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get::<i32, _>("round_number")).collect())
    }

    async fn fetch_round_matches(&self, round_number: i32) -> Result<Vec<Match>, StoreError> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches m
            JOIN rounds r ON r.id = m.round_id
            WHERE r.number = $1
            ORDER BY m.scheduled_time ASC, m.id ASC
            "#
        );
        let matches = sqlx::query_as::<_, Match>(&query)
            .bind(round_number)
            .fetch_all(&self.pool)
            .await?;

        Ok(matches)
    }

    async fn fetch_round_predictions(&self, round_number: i32) -> Result<Vec<Prediction>, StoreError> {
        let predictions = sqlx::query_as::<_, Prediction>(
            r#"
            SELECT p.id, p.user_id, p.match_id, p.sign, p.home_goals, p.away_goals
            FROM predictions p
            JOIN matches m ON m.id = p.match_id
            JOIN rounds r ON r.id = m.round_id
            WHERE r.number = $1
            ORDER BY p.id ASC
            "#,
        )
        .bind(round_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(predictions)
    }

    async fn fetch_feed_results(&self, round_number: i32) -> Result<Vec<FeedResult>, StoreError> {
        let rows = sqlx::query_as::<_, FeedResult>(
            r#"
            SELECT round_number, home_team, away_team, home_goals, away_goals
            FROM feed_results
            WHERE round_number = $1
            "#,
        )
        .bind(round_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_score(
        &self,
        prediction_id: Uuid,
        points: i32,
        computed_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        // The WHERE clause skips the update when points are unchanged, so no row
        // comes back and the record keeps its original computed_at.
        let row = sqlx::query(
            r#"
            INSERT INTO score_records (prediction_id, points, computed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (prediction_id) DO UPDATE SET
                points = EXCLUDED.points,
                computed_at = EXCLUDED.computed_at
            WHERE score_records.points IS DISTINCT FROM EXCLUDED.points
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(prediction_id)
        .bind(points)
        .bind(computed_at)
        .fetch_optional(&self.pool)
        .await?;

        let outcome = match row {
            Some(row) if row.get::<bool, _>("inserted") => UpsertOutcome::Inserted,
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Unchanged,
        };
        Ok(outcome)
    }

    async fn fetch_round_scores(&self, round_number: i32) -> Result<Vec<RoundScore>, StoreError> {
        let scores = sqlx::query_as::<_, RoundScore>(
            r#"
            SELECT s.prediction_id, p.user_id, p.match_id, s.points, s.computed_at
            FROM score_records s
            JOIN predictions p ON p.id = s.prediction_id
            JOIN matches m ON m.id = p.match_id
            JOIN rounds r ON r.id = m.round_id
            WHERE r.number = $1
            ORDER BY s.points DESC, s.prediction_id ASC
            "#,
        )
        .bind(round_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }
}
