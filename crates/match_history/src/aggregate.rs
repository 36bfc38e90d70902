//! Recent form, head-to-head and map pool for one team against a rival.

use tracing::debug;

use crate::model::{MatchRecord, TeamId};
use crate::summary::{FormEntry, MatchOutcome, TeamStatSummary, UNKNOWN_SCORE};
use crate::totals::{extract_round_totals, extract_series_totals};

pub const RECENT_FORM_LEN: usize = 5;

/// Aggregates `history` (most recent first) for `subject` against `rival`.
///
/// Total over any normalized history: entries the subject does not appear in
/// are skipped for form and map purposes, and missing optional fields only
/// drop the affected datum.
pub fn aggregate(history: &[MatchRecord], subject: TeamId, rival: TeamId) -> TeamStatSummary {
    let mut summary = TeamStatSummary::empty(subject, rival);
    let mut foreign = 0usize;

    for record in history {
        let won = record.winner_id == Some(subject);

        if record.involves(rival) {
            summary.head_to_head.played += 1;
            if won {
                summary.head_to_head.won += 1;
            }
        }

        let Some(opponent) = record.opponent_of(subject) else {
            foreign += 1;
            continue;
        };

        if summary.recent_form.len() < RECENT_FORM_LEN {
            summary.recent_form.push(FormEntry {
                outcome: if won { MatchOutcome::Win } else { MatchOutcome::Loss },
                opponent_name: opponent.name.clone(),
                score_text: record
                    .score_text()
                    .unwrap_or_else(|| UNKNOWN_SCORE.to_string()),
            });
        }

        for game in record.games.iter().filter(|g| g.is_countable()) {
            let (Some(map), Some(winner)) = (game.map_name.as_ref(), game.winner_id) else {
                continue;
            };
            let entry = summary.map_stats.entry(map.clone()).or_default();
            entry.played += 1;
            if winner == subject {
                entry.wins += 1;
            }
        }
    }

    if foreign > 0 {
        debug!(subject, "{} history entries did not involve the subject team", foreign);
    }

    summary.series_over_rate = extract_series_totals(history);
    summary.round_totals = extract_round_totals(history);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameRecord, SideScore, TeamRef};
    use crate::summary::{HeadToHead, MapRecord, RoundTotals, SeriesOverRate};

    const T: TeamId = 1;
    const R: TeamId = 2;

    fn team(id: TeamId) -> TeamRef {
        TeamRef { id, name: format!("team-{id}") }
    }

    fn record(opp: TeamId, winner: Option<TeamId>) -> MatchRecord {
        MatchRecord {
            id: None,
            winner_id: winner,
            opponents: [team(T), team(opp)],
            results: None,
            games: Vec::new(),
            number_of_games: Some(3),
            league_name: None,
            begin_at: None,
        }
    }

    fn game(map: &str, winner: TeamId) -> GameRecord {
        GameRecord {
            finished: true,
            winner_id: Some(winner),
            map_name: Some(map.to_string()),
            round_score: None,
        }
    }

    fn results(a: u32, b: u32) -> Option<[SideScore; 2]> {
        Some([
            SideScore { team_id: Some(T), score: a },
            SideScore { team_id: None, score: b },
        ])
    }

    #[test]
    fn empty_history_is_all_zero() {
        let s = aggregate(&[], T, R);
        assert!(s.recent_form.is_empty());
        assert_eq!(s.head_to_head, HeadToHead::default());
        assert!(s.map_stats.is_empty());
        assert_eq!(s.series_over_rate, SeriesOverRate::default());
        assert_eq!(s.round_totals, RoundTotals::Unavailable);
    }

    #[test]
    fn single_win_fills_form_and_maps() {
        let mut rec = record(3, Some(T));
        rec.results = results(2, 1);
        rec.games = vec![game("Mirage", T), game("Inferno", T)];

        let s = aggregate(&[rec], T, R);
        assert_eq!(
            s.recent_form,
            vec![FormEntry {
                outcome: MatchOutcome::Win,
                opponent_name: "team-3".into(),
                score_text: "2-1".into(),
            }]
        );
        assert_eq!(s.map_stats.len(), 2);
        assert_eq!(s.map_stats["Mirage"], MapRecord { played: 1, wins: 1 });
        assert_eq!(s.map_stats["Inferno"], MapRecord { played: 1, wins: 1 });
    }

    #[test]
    fn head_to_head_only_counts_rival() {
        let history = vec![record(3, Some(T)), record(R, Some(R)), record(4, Some(T))];
        let s = aggregate(&history, T, R);
        assert_eq!(s.head_to_head, HeadToHead { played: 1, won: 0 });
    }

    #[test]
    fn form_capped_at_five_in_walk_order() {
        let history: Vec<_> = (10..17).map(|opp| record(opp, Some(T))).collect();
        let s = aggregate(&history, T, R);
        let names: Vec<_> = s.recent_form.iter().map(|f| f.opponent_name.as_str()).collect();
        assert_eq!(names, ["team-10", "team-11", "team-12", "team-13", "team-14"]);
    }

    #[test]
    fn head_to_head_scans_past_form_window() {
        let mut history: Vec<_> = (10..16).map(|opp| record(opp, Some(T))).collect();
        history.push(record(R, Some(T)));
        let s = aggregate(&history, T, R);
        assert_eq!(s.recent_form.len(), RECENT_FORM_LEN);
        assert_eq!(s.head_to_head, HeadToHead { played: 1, won: 1 });
    }

    #[test]
    fn missing_results_use_placeholder() {
        let s = aggregate(&[record(3, None)], T, R);
        assert_eq!(s.recent_form[0].outcome, MatchOutcome::Loss);
        assert_eq!(s.recent_form[0].score_text, UNKNOWN_SCORE);
    }

    #[test]
    fn foreign_entries_skipped_for_form_and_maps() {
        let mut foreign = record(3, Some(3));
        foreign.opponents = [team(3), team(R)];
        foreign.games = vec![game("Nuke", 3)];

        let s = aggregate(&[foreign, record(4, Some(T))], T, R);
        assert_eq!(s.recent_form.len(), 1);
        assert_eq!(s.recent_form[0].opponent_name, "team-4");
        assert!(s.map_stats.is_empty());
        // rival membership alone still counts toward head-to-head
        assert_eq!(s.head_to_head, HeadToHead { played: 1, won: 0 });
    }

    #[test]
    fn unfinished_or_partial_games_are_ignored() {
        let mut rec = record(3, Some(T));
        rec.games = vec![
            game("Ancient", T),
            GameRecord { finished: false, ..game("Ancient", T) },
            GameRecord { winner_id: None, ..game("Ancient", T) },
            GameRecord { map_name: None, ..game("Ancient", T) },
            game("Ancient", 3),
        ];
        let s = aggregate(&[rec], T, R);
        assert_eq!(s.map_stats["Ancient"], MapRecord { played: 2, wins: 1 });
    }

    #[test]
    fn aggregation_is_idempotent() {
        let mut a = record(R, Some(T));
        a.results = results(2, 1);
        a.games = vec![game("Mirage", T), game("Nuke", R), game("Anubis", T)];
        let mut b = record(5, Some(5));
        b.results = results(0, 2);
        b.games = vec![game("Mirage", 5), game("Vertigo", 5)];
        let history = vec![a, b];

        assert_eq!(aggregate(&history, T, R), aggregate(&history, T, R));
    }
}
