use crate::models::jornada::{FeedResult, FinalScore, Match};
use crate::scoring::error::ScoringError;
use crate::scoring::normalizer::NameNormalizer;

/// Find the feed row for a match by comparing normalized home and away names.
/// No row is an `UnresolvedTeamIdentity`, not a zero score.
pub fn resolve_from_feed(
    fixture: &Match,
    feed: &[FeedResult],
    normalizer: &NameNormalizer,
) -> Result<FinalScore, ScoringError> {
    feed.iter()
        .filter(|row| row.round_number == fixture.round_number)
        .find(|row| {
            normalizer.same_team(&row.home_team, &fixture.home_team)
                && normalizer.same_team(&row.away_team, &fixture.away_team)
        })
        .map(FeedResult::final_score)
        .ok_or_else(|| ScoringError::UnresolvedTeamIdentity {
            match_id: fixture.id,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jornada::MatchStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn fixture(home: &str, away: &str) -> Match {
        Match {
            id: Uuid::new_v4(),
            round_number: 7,
            home_team: home.to_string(),
            away_team: away.to_string(),
            scheduled_time: Utc::now(),
            status: MatchStatus::Finished,
            home_goals: None,
            away_goals: None,
        }
    }

    fn row(round_number: i32, home: &str, away: &str, goals: (i32, i32)) -> FeedResult {
        FeedResult {
            round_number,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: goals.0,
            away_goals: goals.1,
        }
    }

    #[test]
    fn matches_names_across_spellings() {
        let feed = vec![
            row(7, "Racing Club", "Boca Juniors", (0, 0)),
            row(7, "CENTRAL CORDOBA DE SANTIAGO", "Vélez Sarsfield", (2, 1)),
        ];
        let result = resolve_from_feed(
            &fixture("Central Córdoba", "Velez  Sarsfield"),
            &feed,
            &NameNormalizer::default(),
        );
        assert_eq!(result, Ok(FinalScore::new(2, 1)));
    }

    #[test]
    fn swapped_sides_or_other_rounds_do_not_match() {
        let feed = vec![
            row(7, "Boca Juniors", "Racing Club", (1, 0)),
            row(8, "Racing Club", "Boca Juniors", (3, 3)),
        ];
        let err = resolve_from_feed(
            &fixture("Racing Club", "Boca Juniors"),
            &feed,
            &NameNormalizer::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "unresolved_team_identity");
    }

    #[test]
    fn substring_names_stay_unresolved() {
        let feed = vec![row(7, "Racing", "Boca Juniors", (1, 0))];
        let result = resolve_from_feed(
            &fixture("Racing Club", "Boca Juniors"),
            &feed,
            &NameNormalizer::default(),
        );
        assert!(result.is_err());
    }
}
