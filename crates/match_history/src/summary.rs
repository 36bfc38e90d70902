//! Output shapes handed to report renderers, and the contract renderers
//! implement.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{MatchRecord, TeamId, TeamRef};

/// Score text used when a match has no complete results.
pub const UNKNOWN_SCORE: &str = "unknown";
/// Rendered in place of an empty map pool.
pub const NO_MAP_DATA: &str = "No recent map data";
/// Rendered when round-level detail is missing upstream.
pub const ROUNDS_UNAVAILABLE: &str = "unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Win,
    Loss,
}

impl MatchOutcome {
    pub fn label(self) -> &'static str {
        match self {
            MatchOutcome::Win  => "W",
            MatchOutcome::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormEntry {
    pub outcome:       MatchOutcome,
    pub opponent_name: String,
    pub score_text:    String,
}

impl FormEntry {
    pub fn label(&self) -> &'static str {
        self.outcome.label()
    }
}

impl fmt::Display for FormEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {} ({})", self.label(), self.opponent_name, self.score_text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub played: u32,
    pub won:    u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MapRecord {
    pub played: u32,
    pub wins:   u32,
}

impl MapRecord {
    pub fn win_rate_pct(&self) -> Option<f64> {
        (self.played > 0).then(|| self.wins as f64 / self.played as f64 * 100.0)
    }
}

/// Best-of-3 series that went to a third map, by the "both sides scored" proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesOverRate {
    pub eligible:           u32,
    pub matches_considered: u32,
}

impl SeriesOverRate {
    pub fn rate_pct(&self) -> Option<f64> {
        (self.matches_considered > 0)
            .then(|| self.eligible as f64 / self.matches_considered as f64 * 100.0)
    }
}

/// Standard CS2 MR12 total-rounds lines.
pub const ROUND_LINE_LOW: f64 = 21.5;
pub const ROUND_LINE_HIGH: f64 = 22.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundTotals {
    /// No game in the history carried round scores. Not the same as zero.
    Unavailable,
    Available {
        maps:         u32,
        total_rounds: u32,
        over_21_5:    u32,
        over_22_5:    u32,
    },
}

impl RoundTotals {
    pub fn is_available(&self) -> bool {
        matches!(self, RoundTotals::Available { .. })
    }

    pub fn average_rounds(&self) -> Option<f64> {
        match *self {
            RoundTotals::Available { maps, total_rounds, .. } if maps > 0 => {
                Some(total_rounds as f64 / maps as f64)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStatSummary {
    pub subject:          TeamId,
    pub rival:            TeamId,
    /// Most recent first, at most five entries.
    pub recent_form:      Vec<FormEntry>,
    pub head_to_head:     HeadToHead,
    pub map_stats:        BTreeMap<String, MapRecord>,
    pub series_over_rate: SeriesOverRate,
    pub round_totals:     RoundTotals,
}

impl TeamStatSummary {
    pub fn empty(subject: TeamId, rival: TeamId) -> Self {
        Self {
            subject,
            rival,
            recent_form: Vec::new(),
            head_to_head: HeadToHead::default(),
            map_stats: BTreeMap::new(),
            series_over_rate: SeriesOverRate::default(),
            round_totals: RoundTotals::Unavailable,
        }
    }

    /// Map entries with at least one game, in map-name order.
    pub fn played_maps(&self) -> impl Iterator<Item = (&str, &MapRecord)> {
        self.map_stats
            .iter()
            .filter(|(_, rec)| rec.played > 0)
            .map(|(name, rec)| (name.as_str(), rec))
    }
}

/// Descriptive metadata of the fixture a pair of summaries is rendered for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matchup {
    pub match_id:        Option<u64>,
    pub team_a:          TeamRef,
    pub team_b:          TeamRef,
    pub league_name:     Option<String>,
    pub number_of_games: Option<u32>,
    pub begin_at:        Option<DateTime<Utc>>,
}

impl Matchup {
    pub fn from_record(record: &MatchRecord) -> Self {
        let [a, b] = &record.opponents;
        Self {
            match_id: record.id,
            team_a: a.clone(),
            team_b: b.clone(),
            league_name: record.league_name.clone(),
            number_of_games: record.number_of_games,
            begin_at: record.begin_at,
        }
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.team_a.name, self.team_b.name)
    }
}

/// Contract for anything that turns summaries into report text.
///
/// Implementations must cope with an empty `map_stats` (render
/// [`NO_MAP_DATA`]), a `recent_form` shorter than five entries, a
/// `head_to_head.played` of zero (render 0/0, never divide), and
/// [`RoundTotals::Unavailable`].
pub trait SummaryFormatter {
    /// One team's block, `rival` being the team it is compared against.
    /// Renderers that print the team name in a heading may ignore `team`.
    fn render_team(&self, team: &TeamRef, rival: &TeamRef, summary: &TeamStatSummary) -> String;

    /// Full block for one fixture.
    fn render_matchup(
        &self,
        matchup: &Matchup,
        team_a: &TeamStatSummary,
        team_b: &TeamStatSummary,
    ) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_played_has_no_rate() {
        assert_eq!(MapRecord::default().win_rate_pct(), None);
        assert_eq!(SeriesOverRate::default().rate_pct(), None);
        let rec = MapRecord { played: 3, wins: 2 };
        assert_eq!(rec.win_rate_pct().map(|p| p.round()), Some(67.0));
    }

    #[test]
    fn form_entry_display() {
        let entry = FormEntry {
            outcome: MatchOutcome::Loss,
            opponent_name: "Vitality".to_string(),
            score_text: UNKNOWN_SCORE.to_string(),
        };
        assert_eq!(entry.to_string(), "L vs Vitality (unknown)");
    }

    #[test]
    fn round_totals_average() {
        assert_eq!(RoundTotals::Unavailable.average_rounds(), None);
        let totals = RoundTotals::Available { maps: 2, total_rounds: 45, over_21_5: 2, over_22_5: 1 };
        assert_eq!(totals.average_rounds(), Some(22.5));
        assert!(totals.is_available());
    }

    #[test]
    fn round_totals_serialize_with_status_tag() {
        let json = serde_json::to_value(RoundTotals::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unavailable" }));
    }
}
