//! Series and round totals for over/under lines.

use crate::model::MatchRecord;
use crate::summary::{RoundTotals, SeriesOverRate, ROUND_LINE_HIGH, ROUND_LINE_LOW};

/// Counts best-of-3 series and how many of them "went the distance".
///
/// A series counts as eligible when both sides won at least one map. This is
/// a deliberately coarse proxy for over 2.5 maps and is kept as is. Series
/// without complete results are left out of both counts.
pub fn extract_series_totals(history: &[MatchRecord]) -> SeriesOverRate {
    let mut totals = SeriesOverRate::default();

    for record in history {
        if record.number_of_games != Some(3) {
            continue;
        }
        let Some([a, b]) = record.results else {
            continue;
        };

        totals.matches_considered += 1;
        if a.score > 0 && b.score > 0 {
            totals.eligible += 1;
        }
    }

    totals
}

/// Round totals per finished map, where the upstream tier exposes them.
pub fn extract_round_totals(history: &[MatchRecord]) -> RoundTotals {
    let mut maps = 0u32;
    let mut total_rounds = 0u32;
    let mut over_21_5 = 0u32;
    let mut over_22_5 = 0u32;

    let rounds = history
        .iter()
        .flat_map(|record| record.games.iter())
        .filter(|game| game.finished)
        .filter_map(|game| game.total_rounds());

    for rounds in rounds {
        maps += 1;
        total_rounds = total_rounds.saturating_add(rounds);
        if rounds as f64 > ROUND_LINE_LOW {
            over_21_5 += 1;
        }
        if rounds as f64 > ROUND_LINE_HIGH {
            over_22_5 += 1;
        }
    }

    if maps == 0 {
        return RoundTotals::Unavailable;
    }
    RoundTotals::Available { maps, total_rounds, over_21_5, over_22_5 }
}
