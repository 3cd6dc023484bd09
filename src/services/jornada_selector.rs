use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::ScoringStore;
use crate::scoring::ScoringError;

/// Decides which jornadas still need a recomputation pass.
pub struct JornadaActivitySelector {
    store: Arc<dyn ScoringStore>,
    include_unscored_finished: bool,
}

impl JornadaActivitySelector {
    pub fn new(store: Arc<dyn ScoringStore>) -> Self {
        Self {
            store,
            include_unscored_finished: false,
        }
    }

    /// Also pick rounds where a finished match still has predictions without a score record.
    pub fn with_unscored_finished(mut self, enabled: bool) -> Self {
        self.include_unscored_finished = enabled;
        self
    }

    /// Rounds with at least one match that kicked off at or before `now` and is not finished.
    /// Either the whole set is returned or an error; never a partial set.
    pub async fn select_active_rounds(&self, now: DateTime<Utc>) -> Result<BTreeSet<i32>, ScoringError> {
        let due = self
            .store
            .fetch_matches_due(now)
            .await
            .map_err(|e| ScoringError::ActiveRoundsUnavailable(e.to_string()))?;

        let mut rounds: BTreeSet<i32> = due
            .iter()
            .filter(|m| m.has_kicked_off(now) && !m.is_finished())
            .map(|m| m.round_number)
            .collect();

        if self.include_unscored_finished {
            let unscored = self
                .store
                .fetch_rounds_with_unscored_finished()
                .await
                .map_err(|e| ScoringError::ActiveRoundsUnavailable(e.to_string()))?;
            rounds.extend(unscored);
        }

        tracing::debug!("🔍 [SELECTOR] {} active rounds at {}: {:?}", rounds.len(), now, rounds);
        Ok(rounds)
    }
}
