use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use quiniela_backend::db::InMemoryStore;
use quiniela_backend::models::jornada::{FeedResult, Match, MatchStatus, Prediction, Sign};

pub fn kicked_off(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(3)
}

pub fn upcoming(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(2)
}

/// Insert a match. Goals are only meaningful for finished matches.
pub async fn add_match(
    store: &InMemoryStore,
    round_number: i32,
    teams: (&str, &str),
    scheduled_time: DateTime<Utc>,
    status: MatchStatus,
    goals: Option<(i32, i32)>,
) -> Match {
    let fixture = Match {
        id: Uuid::new_v4(),
        round_number,
        home_team: teams.0.to_string(),
        away_team: teams.1.to_string(),
        scheduled_time,
        status,
        home_goals: goals.map(|g| g.0),
        away_goals: goals.map(|g| g.1),
    };
    store.insert_match(fixture.clone()).await;
    fixture
}

pub async fn add_finished_match(
    store: &InMemoryStore,
    round_number: i32,
    teams: (&str, &str),
    now: DateTime<Utc>,
    goals: (i32, i32),
) -> Match {
    add_match(store, round_number, teams, kicked_off(now), MatchStatus::Finished, Some(goals)).await
}

pub async fn add_live_match(
    store: &InMemoryStore,
    round_number: i32,
    teams: (&str, &str),
    now: DateTime<Utc>,
) -> Match {
    add_match(store, round_number, teams, kicked_off(now), MatchStatus::InProgress, None).await
}

pub async fn add_prediction(
    store: &InMemoryStore,
    match_id: Uuid,
    sign: Option<Sign>,
    goals: Option<(i32, i32)>,
) -> Prediction {
    let prediction = Prediction {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        match_id,
        sign,
        home_goals: goals.map(|g| g.0),
        away_goals: goals.map(|g| g.1),
    };
    store.insert_prediction(prediction.clone()).await;
    prediction
}

pub async fn add_feed_result(
    store: &InMemoryStore,
    round_number: i32,
    teams: (&str, &str),
    goals: (i32, i32),
) {
    store
        .insert_feed_result(FeedResult {
            round_number,
            home_team: teams.0.to_string(),
            away_team: teams.1.to_string(),
            home_goals: goals.0,
            away_goals: goals.1,
        })
        .await;
}

/// Round 10: Team X vs Team Y ends 3-0. One exact guess, one right sign, one miss.
pub struct RoundTen {
    pub fixture: Match,
    pub exact: Prediction,
    pub sign_only: Prediction,
    pub miss: Prediction,
}

pub async fn seed_round_ten(store: &InMemoryStore, now: DateTime<Utc>) -> RoundTen {
    let fixture = add_finished_match(store, 10, ("Team X", "Team Y"), now, (3, 0)).await;

    RoundTen {
        exact: add_prediction(store, fixture.id, None, Some((3, 0))).await,
        sign_only: add_prediction(store, fixture.id, Some(Sign::HomeWin), Some((1, 0))).await,
        miss: add_prediction(store, fixture.id, Some(Sign::Draw), None).await,
        fixture,
    }
}
