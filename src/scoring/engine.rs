use serde::{Deserialize, Serialize};

use crate::models::jornada::{FinalScore, Match, Prediction};
use crate::scoring::error::ScoringError;

/// Points awarded per rule. First matching rule wins, rules never stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub exact_points: i32,
    pub sign_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            exact_points: 3,
            sign_points: 1,
        }
    }
}

/// Pure scoring: no clock, no I/O. Same inputs, same points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    /// Score a prediction against the result stored on the match itself.
    pub fn score(&self, prediction: &Prediction, fixture: &Match) -> Result<i32, ScoringError> {
        let result = fixture
            .final_score()
            .filter(|_| fixture.is_finished())
            .ok_or(ScoringError::PreconditionViolation {
                match_id: fixture.id,
                status: fixture.status,
            })?;
        Ok(self.points_for(prediction, result))
    }

    /// Score against a result resolved from another source (the official feed).
    /// The match must still be finished in our own storage.
    pub fn score_with_result(
        &self,
        prediction: &Prediction,
        fixture: &Match,
        result: FinalScore,
    ) -> Result<i32, ScoringError> {
        if !fixture.is_finished() {
            return Err(ScoringError::PreconditionViolation {
                match_id: fixture.id,
                status: fixture.status,
            });
        }
        Ok(self.points_for(prediction, result))
    }

    pub fn points_for(&self, prediction: &Prediction, result: FinalScore) -> i32 {
        if prediction.scoreline() == Some(result) {
            return self.rules.exact_points;
        }
        match prediction.effective_sign() {
            Some(sign) if sign == result.sign() => self.rules.sign_points,
            _ => 0,
        }
    }
}
