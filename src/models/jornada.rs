// src/models/jornada.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;

/// A scheduled fixture as stored by the match persistence layer.
/// `home_goals`/`away_goals` are only set once the match is finished.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: Uuid,
    pub round_number: i32,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "in_progress" => MatchStatus::InProgress,
            "finished" => MatchStatus::Finished,
            _ => MatchStatus::Scheduled,
        }
    }
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final scoreline of a finished match, whichever source it came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub home_goals: i32,
    pub away_goals: i32,
}

impl FinalScore {
    pub fn new(home_goals: i32, away_goals: i32) -> Self {
        Self { home_goals, away_goals }
    }

    pub fn sign(&self) -> Sign {
        Sign::from_goals(self.home_goals, self.away_goals)
    }
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Goals as stored on the match row. `None` unless both sides are present.
    pub fn final_score(&self) -> Option<FinalScore> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(FinalScore::new(home, away)),
            _ => None,
        }
    }

    pub fn has_kicked_off(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_time <= now
    }
}

/// Outcome category of a match ("signo").
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    HomeWin,
    Draw,
    AwayWin,
}

impl Sign {
    pub fn from_goals(home_goals: i32, away_goals: i32) -> Self {
        if home_goals > away_goals {
            Sign::HomeWin
        } else if home_goals < away_goals {
            Sign::AwayWin
        } else {
            Sign::Draw
        }
    }
}

/// A user's guess for one match. Owned by the submission subsystem.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub sign: Option<Sign>,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

impl Prediction {
    pub fn scoreline(&self) -> Option<FinalScore> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(FinalScore::new(home, away)),
            _ => None,
        }
    }

    /// Stored sign wins; otherwise derive it from the predicted goals.
    pub fn effective_sign(&self) -> Option<Sign> {
        self.sign.or_else(|| self.scoreline().map(|s| s.sign()))
    }
}

/// Points computed for one prediction. Upserted by `prediction_id`.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub prediction_id: Uuid,
    pub points: i32,
    pub computed_at: DateTime<Utc>,
}

/// What an upsert did to the stored record.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// A row of the official results feed, with team names as the feed spells them.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedResult {
    pub round_number: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i32,
    pub away_goals: i32,
}

impl FeedResult {
    pub fn final_score(&self) -> FinalScore {
        FinalScore::new(self.home_goals, self.away_goals)
    }
}

/// Score record joined with its prediction, as exposed by the round scores endpoint.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RoundScore {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub points: i32,
    pub computed_at: DateTime<Utc>,
}
