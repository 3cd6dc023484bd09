//! In-process `ScoringStore` for tests and for embedding the engine without Postgres.
//! Failures can be injected per round, per prediction upsert, or for the active
//! round lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::{ScoringStore, StoreError};
use crate::models::jornada::{
    FeedResult, Match, MatchStatus, Prediction, RoundScore, ScoreRecord, UpsertOutcome,
};

#[derive(Debug, Default)]
struct State {
    matches: Vec<Match>,
    predictions: Vec<Prediction>,
    feed: Vec<FeedResult>,
    scores: BTreeMap<Uuid, ScoreRecord>,
    failing_rounds: HashSet<i32>,
    // prediction id -> upserts left to fail
    failing_upserts: HashMap<Uuid, u32>,
    upsert_attempts: HashMap<Uuid, u32>,
    active_rounds_down: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_match(&self, fixture: Match) {
        self.state.write().await.matches.push(fixture);
    }

    pub async fn insert_prediction(&self, prediction: Prediction) {
        self.state.write().await.predictions.push(prediction);
    }

    pub async fn insert_feed_result(&self, row: FeedResult) {
        self.state.write().await.feed.push(row);
    }

    /// Mark a match finished with its final goals.
    pub async fn finish_match(&self, match_id: Uuid, home_goals: i32, away_goals: i32) {
        let mut state = self.state.write().await;
        if let Some(fixture) = state.matches.iter_mut().find(|m| m.id == match_id) {
            fixture.status = MatchStatus::Finished;
            fixture.home_goals = Some(home_goals);
            fixture.away_goals = Some(away_goals);
        }
    }

    /// Every read for this round fails until cleared.
    pub async fn fail_round(&self, round_number: i32) {
        self.state.write().await.failing_rounds.insert(round_number);
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.failing_rounds.clear();
        state.failing_upserts.clear();
        state.active_rounds_down = false;
    }

    /// The next `times` upserts for this prediction fail.
    pub async fn fail_upserts(&self, prediction_id: Uuid, times: u32) {
        self.state.write().await.failing_upserts.insert(prediction_id, times);
    }

    pub async fn fail_active_rounds(&self) {
        self.state.write().await.active_rounds_down = true;
    }

    pub async fn score_records(&self) -> BTreeMap<Uuid, ScoreRecord> {
        self.state.read().await.scores.clone()
    }

    pub async fn upsert_attempts(&self, prediction_id: Uuid) -> u32 {
        self.state
            .read()
            .await
            .upsert_attempts
            .get(&prediction_id)
            .copied()
            .unwrap_or(0)
    }
}

impl State {
    fn check_round(&self, round_number: i32) -> Result<(), StoreError> {
        if self.failing_rounds.contains(&round_number) {
            return Err(StoreError::Unavailable(format!("round {round_number} is unreachable")));
        }
        Ok(())
    }

    fn round_match_ids(&self, round_number: i32) -> HashSet<Uuid> {
        self.matches
            .iter()
            .filter(|m| m.round_number == round_number)
            .map(|m| m.id)
            .collect()
    }
}

#[async_trait]
impl ScoringStore for InMemoryStore {
    async fn fetch_matches_due(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError> {
        let state = self.state.read().await;
        if state.active_rounds_down {
            return Err(StoreError::Unavailable("match table is unreachable".to_string()));
        }
        Ok(state
            .matches
            .iter()
            .filter(|m| m.has_kicked_off(now))
            .cloned()
            .collect())
    }

    async fn fetch_rounds_with_unscored_finished(&self) -> Result<Vec<i32>, StoreError> {
        let state = self.state.read().await;
        if state.active_rounds_down {
            return Err(StoreError::Unavailable("match table is unreachable".to_string()));
        }
        let rounds: BTreeSet<i32> = state
            .matches
            .iter()
            .filter(|m| m.is_finished())
            .filter(|m| {
                state
                    .predictions
                    .iter()
                    .any(|p| p.match_id == m.id && !state.scores.contains_key(&p.id))
            })
            .map(|m| m.round_number)
            .collect();
        Ok(rounds.into_iter().collect())
    }

    async fn fetch_round_matches(&self, round_number: i32) -> Result<Vec<Match>, StoreError> {
        let state = self.state.read().await;
        state.check_round(round_number)?;
        let mut matches: Vec<Match> = state
            .matches
            .iter()
            .filter(|m| m.round_number == round_number)
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.scheduled_time.cmp(&b.scheduled_time).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    async fn fetch_round_predictions(&self, round_number: i32) -> Result<Vec<Prediction>, StoreError> {
        let state = self.state.read().await;
        state.check_round(round_number)?;
        let match_ids = state.round_match_ids(round_number);
        let mut predictions: Vec<Prediction> = state
            .predictions
            .iter()
            .filter(|p| match_ids.contains(&p.match_id))
            .cloned()
            .collect();
        predictions.sort_by_key(|p| p.id);
        Ok(predictions)
    }

    async fn fetch_feed_results(&self, round_number: i32) -> Result<Vec<FeedResult>, StoreError> {
        let state = self.state.read().await;
        state.check_round(round_number)?;
        Ok(state
            .feed
            .iter()
            .filter(|row| row.round_number == round_number)
            .cloned()
            .collect())
    }

    async fn upsert_score(
        &self,
        prediction_id: Uuid,
        points: i32,
        computed_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut state = self.state.write().await;
        *state.upsert_attempts.entry(prediction_id).or_insert(0) += 1;

        if let Some(left) = state.failing_upserts.get_mut(&prediction_id) {
            if *left > 0 {
                *left -= 1;
                return Err(StoreError::Unavailable(format!(
                    "score write rejected for prediction {prediction_id}"
                )));
            }
        }

        let outcome = match state.scores.get(&prediction_id) {
            None => UpsertOutcome::Inserted,
            Some(existing) if existing.points == points => return Ok(UpsertOutcome::Unchanged),
            Some(_) => UpsertOutcome::Updated,
        };
        state.scores.insert(
            prediction_id,
            ScoreRecord {
                prediction_id,
                points,
                computed_at,
            },
        );
        Ok(outcome)
    }

    async fn fetch_round_scores(&self, round_number: i32) -> Result<Vec<RoundScore>, StoreError> {
        let state = self.state.read().await;
        state.check_round(round_number)?;
        let match_ids = state.round_match_ids(round_number);
        let mut scores: Vec<RoundScore> = state
            .predictions
            .iter()
            .filter(|p| match_ids.contains(&p.match_id))
            .filter_map(|p| {
                state.scores.get(&p.id).map(|record| RoundScore {
                    prediction_id: p.id,
                    user_id: p.user_id,
                    match_id: p.match_id,
                    points: record.points,
                    computed_at: record.computed_at,
                })
            })
            .collect();
        scores.sort_by(|a, b| b.points.cmp(&a.points).then(a.prediction_id.cmp(&b.prediction_id)));
        Ok(scores)
    }
}
