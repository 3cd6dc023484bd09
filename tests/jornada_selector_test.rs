use chrono::{Duration, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

mod common;
use common::jornada_helpers::{
    add_finished_match, add_live_match, add_match, add_prediction, kicked_off, upcoming,
};

use quiniela_backend::db::InMemoryStore;
use quiniela_backend::models::jornada::{MatchStatus, Sign};
use quiniela_backend::scoring::ScoringError;
use quiniela_backend::services::JornadaActivitySelector;

fn selector(store: &Arc<InMemoryStore>) -> JornadaActivitySelector {
    JornadaActivitySelector::new(store.clone())
}

#[tokio::test]
async fn only_rounds_with_a_live_match_are_selected() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    // R1: everything finished
    add_finished_match(&store, 1, ("Boca Juniors", "River Plate"), now, (2, 1)).await;
    add_finished_match(&store, 1, ("Lanús", "Banfield"), now, (0, 0)).await;
    // R2: one match underway, one still to come
    add_live_match(&store, 2, ("Independiente", "Racing Club"), now).await;
    add_match(&store, 2, ("Huracán", "Tigre"), upcoming(now), MatchStatus::Scheduled, None).await;

    let rounds = selector(&store).select_active_rounds(now).await.unwrap();

    assert_eq!(rounds, BTreeSet::from([2]));
}

#[tokio::test]
async fn scheduled_match_past_kickoff_counts_as_active() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    // Status not yet flipped by the live feed
    add_match(&store, 4, ("Talleres", "Belgrano"), kicked_off(now), MatchStatus::Scheduled, None).await;

    let rounds = selector(&store).select_active_rounds(now).await.unwrap();

    assert_eq!(rounds, BTreeSet::from([4]));
}

#[tokio::test]
async fn future_kickoffs_are_not_active() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    add_match(&store, 5, ("Talleres", "Belgrano"), upcoming(now), MatchStatus::Scheduled, None).await;

    let rounds = selector(&store).select_active_rounds(now).await.unwrap();
    assert!(rounds.is_empty());

    // Same data, evaluated once the kickoff has passed
    let later = upcoming(now) + Duration::minutes(1);
    let rounds = selector(&store).select_active_rounds(later).await.unwrap();
    assert_eq!(rounds, BTreeSet::from([5]));
}

#[tokio::test]
async fn kickoff_exactly_now_is_active() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    add_match(&store, 6, ("Gimnasia", "Estudiantes"), now, MatchStatus::Scheduled, None).await;

    let rounds = selector(&store).select_active_rounds(now).await.unwrap();
    assert_eq!(rounds, BTreeSet::from([6]));
}

#[tokio::test]
async fn rounds_are_deduplicated_and_ordered() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    add_live_match(&store, 9, ("Unión", "Colón"), now).await;
    add_live_match(&store, 3, ("Platense", "Sarmiento"), now).await;
    add_live_match(&store, 9, ("Rosario Central", "Newell's"), now).await;
    add_live_match(&store, 3, ("Vélez", "Argentinos"), now).await;

    let rounds = selector(&store).select_active_rounds(now).await.unwrap();

    assert_eq!(rounds.into_iter().collect::<Vec<_>>(), vec![3, 9]);
}

#[tokio::test]
async fn empty_store_selects_nothing() {
    let store = Arc::new(InMemoryStore::new());

    let rounds = selector(&store).select_active_rounds(Utc::now()).await.unwrap();

    assert!(rounds.is_empty());
}

#[tokio::test]
async fn store_failure_is_reported_not_swallowed() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    add_live_match(&store, 2, ("Independiente", "Racing Club"), now).await;
    store.fail_active_rounds().await;

    let result = selector(&store).select_active_rounds(now).await;

    assert!(matches!(result, Err(ScoringError::ActiveRoundsUnavailable(_))));
}

#[tokio::test]
async fn unscored_finished_rounds_are_opt_in() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();

    let finished = add_finished_match(&store, 7, ("Boca Juniors", "River Plate"), now, (1, 0)).await;
    add_prediction(&store, finished.id, Some(Sign::HomeWin), None).await;
    add_live_match(&store, 8, ("Lanús", "Banfield"), now).await;

    let strict = selector(&store).select_active_rounds(now).await.unwrap();
    assert_eq!(strict, BTreeSet::from([8]));

    let looser = selector(&store)
        .with_unscored_finished(true)
        .select_active_rounds(now)
        .await
        .unwrap();
    assert_eq!(looser, BTreeSet::from([7, 8]));
}
