use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::settings::ScoringSettings;
use crate::db::{ScoringStore, StoreError};
use crate::models::jornada::{Match, RoundScore, UpsertOutcome};
use crate::models::recalculation::{ReportIssue, RoundReport};
use crate::scoring::result_matcher::resolve_from_feed;
use crate::scoring::{NameNormalizer, ScoringEngine, ScoringError};
use crate::services::jornada_selector::JornadaActivitySelector;

/// Drives recomputation of score records, one round at a time.
pub struct RecalculationService {
    store: Arc<dyn ScoringStore>,
    selector: JornadaActivitySelector,
    engine: ScoringEngine,
    normalizer: NameNormalizer,
    cross_reference_feed: bool,
}

impl RecalculationService {
    pub fn new(store: Arc<dyn ScoringStore>, settings: &ScoringSettings) -> Self {
        Self {
            selector: JornadaActivitySelector::new(store.clone())
                .with_unscored_finished(settings.include_unscored_finished),
            engine: ScoringEngine::new(settings.rules()),
            normalizer: NameNormalizer::with_extra_prefixes(&settings.ambiguous_prefixes),
            cross_reference_feed: settings.cross_reference_feed,
            store,
        }
    }

    /// Recompute every active round. Fails only if the active rounds cannot be determined;
    /// a failing round is reported and the next one is still processed.
    #[tracing::instrument(name = "Recalculate all rounds", skip(self))]
    pub async fn recalculate_all(&self, now: DateTime<Utc>) -> Result<Vec<RoundReport>, ScoringError> {
        let rounds = self.selector.select_active_rounds(now).await?;
        if rounds.is_empty() {
            tracing::info!("🎯 [RECALC] No rounds need recomputation");
            return Ok(Vec::new());
        }
        tracing::info!("🎯 [RECALC] Recomputing {} rounds: {:?}", rounds.len(), rounds);

        let mut reports = Vec::with_capacity(rounds.len());
        for round_number in rounds {
            reports.push(self.recalculate_round(round_number, now).await);
        }

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        tracing::info!("✅ [RECALC] Completed {} rounds ({} failed)", reports.len(), failed);
        Ok(reports)
    }

    /// Recompute a single round, bypassing the selector.
    #[tracing::instrument(name = "Recalculate round", skip(self, now))]
    pub async fn recalculate_round(&self, round_number: i32, now: DateTime<Utc>) -> RoundReport {
        match self.try_recalculate_round(round_number, now).await {
            Ok(report) => {
                tracing::info!("✅ [RECALC] {}", report);
                report
            }
            Err(e) => {
                tracing::error!("❌ [RECALC] Round {} failed: {}", round_number, e);
                RoundReport::failed(round_number, &e)
            }
        }
    }

    pub async fn round_scores(&self, round_number: i32) -> Result<Vec<RoundScore>, ScoringError> {
        self.store
            .fetch_round_scores(round_number)
            .await
            .map_err(|e| data_unavailable(round_number, e))
    }

    async fn try_recalculate_round(&self, round_number: i32, now: DateTime<Utc>) -> Result<RoundReport, ScoringError> {
        let matches = self
            .store
            .fetch_round_matches(round_number)
            .await
            .map_err(|e| data_unavailable(round_number, e))?;
        if matches.is_empty() {
            return Err(ScoringError::DataUnavailable {
                round_number,
                reason: "round has no matches".to_string(),
            });
        }

        let predictions = self
            .store
            .fetch_round_predictions(round_number)
            .await
            .map_err(|e| data_unavailable(round_number, e))?;

        let feed = if self.cross_reference_feed {
            self.store
                .fetch_feed_results(round_number)
                .await
                .map_err(|e| data_unavailable(round_number, e))?
        } else {
            Vec::new()
        };

        let matches_by_id: HashMap<Uuid, &Match> = matches.iter().map(|m| (m.id, m)).collect();
        let mut report = RoundReport::empty(round_number);

        for prediction in &predictions {
            let Some(fixture) = matches_by_id.get(&prediction.match_id) else {
                // Match row not visible in this read, e.g. inserted after the matches were loaded
                let e = ScoringError::DataUnavailable {
                    round_number,
                    reason: format!("match {} not found in round", prediction.match_id),
                };
                tracing::warn!("⚠️  [RECALC] Prediction {} left unscored: {}", prediction.id, e);
                report.errors.push(ReportIssue::from_error(&e, Some(prediction.id)));
                continue;
            };
            if !fixture.is_finished() {
                report.pending += 1;
                continue;
            }

            let points = if self.cross_reference_feed {
                resolve_from_feed(fixture, &feed, &self.normalizer)
                    .and_then(|result| self.engine.score_with_result(prediction, fixture, result))
            } else {
                self.engine.score(prediction, fixture)
            };

            let outcome = match points {
                Ok(points) => self
                    .persist(prediction.id, points, now)
                    .await
                    .map(|outcome| (points, outcome)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok((points, outcome)) => {
                    report.scored += 1;
                    report.total_points += i64::from(points);
                    if outcome == UpsertOutcome::Unchanged {
                        report.unchanged += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️  [RECALC] Prediction {} left unscored: {}", prediction.id, e);
                    report.errors.push(ReportIssue::from_error(&e, Some(prediction.id)));
                }
            }
        }

        Ok(report)
    }

    /// Upsert with one immediate retry.
    async fn persist(&self, prediction_id: Uuid, points: i32, now: DateTime<Utc>) -> Result<UpsertOutcome, ScoringError> {
        match self.store.upsert_score(prediction_id, points, now).await {
            Ok(outcome) => Ok(outcome),
            Err(first) => {
                tracing::warn!("Retrying score write for prediction {}: {}", prediction_id, first);
                self.store
                    .upsert_score(prediction_id, points, now)
                    .await
                    .map_err(|e| ScoringError::PersistenceFailure {
                        prediction_id,
                        reason: e.to_string(),
                    })
            }
        }
    }
}

fn data_unavailable(round_number: i32, error: StoreError) -> ScoringError {
    ScoringError::DataUnavailable {
        round_number,
        reason: error.to_string(),
    }
}
