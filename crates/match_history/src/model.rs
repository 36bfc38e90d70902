//! Typed match records normalized from loosely-structured PandaScore JSON.
//!
//! Every accessor here tolerates missing or oddly-typed fields: a missing
//! substructure degrades to its default (`None` / empty), and only a match
//! without exactly two identifiable opponents is rejected outright.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub type TeamId = u64;
pub type MatchId = u64;

/// Display name used when an opponent entry carries no name.
pub const UNKNOWN_TEAM_NAME: &str = "Unknown";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("malformed match record: {0}")]
    Malformed(&'static str),
    #[error("expected exactly 2 opponents, found {found}")]
    InvalidMatchShape { found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id:   TeamId,
    pub name: String,
}

/// One side of a score pair: map wins in a series, or rounds in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SideScore {
    pub team_id: Option<TeamId>,
    pub score:   u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub finished:    bool,
    pub winner_id:   Option<TeamId>,
    pub map_name:    Option<String>,
    /// Per-side round score, only exposed on some data tiers.
    pub round_score: Option<[SideScore; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id:              Option<MatchId>,
    pub winner_id:       Option<TeamId>,
    pub opponents:       [TeamRef; 2],
    pub results:         Option<[SideScore; 2]>,
    pub games:           Vec<GameRecord>,
    pub number_of_games: Option<u32>,
    pub league_name:     Option<String>,
    pub begin_at:        Option<DateTime<Utc>>,
}

impl MatchRecord {
    /// Builds a record from one raw match object.
    pub fn from_value(raw: &Value) -> Result<Self, RecordRejection> {
        if !raw.is_object() {
            return Err(RecordRejection::Malformed("match entry is not an object"));
        }

        let opponents = parse_opponents(raw.get("opponents"))?;

        let games = raw
            .get("games")
            .and_then(Value::as_array)
            .map(|games| games.iter().filter_map(GameRecord::from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            id: raw.get("id").and_then(Value::as_u64),
            winner_id: raw.get("winner_id").and_then(Value::as_u64),
            opponents,
            results: parse_score_pair(raw.get("results")),
            games,
            number_of_games: raw
                .get("number_of_games")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            league_name: raw
                .pointer("/league/name")
                .and_then(Value::as_str)
                .map(str::to_string),
            begin_at: raw
                .get("begin_at")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.opponents.iter().any(|t| t.id == team)
    }

    /// Resolves the other side by elimination. `None` when `team` is not
    /// exactly one of the two opponents.
    pub fn opponent_of(&self, team: TeamId) -> Option<&TeamRef> {
        match (&self.opponents[0], &self.opponents[1]) {
            (a, b) if a.id == team && b.id != team => Some(b),
            (a, b) if b.id == team && a.id != team => Some(a),
            _ => None,
        }
    }

    /// Final map score in results order, e.g. `"2-1"`.
    pub fn score_text(&self) -> Option<String> {
        self.results
            .map(|[a, b]| format!("{}-{}", a.score, b.score))
    }
}

impl GameRecord {
    /// Returns `None` for entries that are not objects; every other field
    /// degrades individually.
    pub fn from_value(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            debug!("skipping malformed game entry: {}", raw);
            return None;
        }

        let winner_id = raw
            .pointer("/winner/id")
            .and_then(Value::as_u64)
            .or_else(|| raw.get("winner_id").and_then(Value::as_u64));

        Some(Self {
            finished: raw.get("finished").and_then(Value::as_bool).unwrap_or(false),
            winner_id,
            map_name: raw
                .pointer("/map/name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            round_score: parse_score_pair(raw.get("results")),
        })
    }

    /// Finished, with both winner and map known.
    pub fn is_countable(&self) -> bool {
        self.finished && self.winner_id.is_some() && self.map_name.is_some()
    }

    /// `None` without round detail or when the pair cannot be a real score.
    pub fn total_rounds(&self) -> Option<u32> {
        self.round_score.and_then(|[a, b]| a.score.checked_add(b.score))
    }
}

/// Normalizes a whole API response, dropping rejected entries.
pub fn normalize_history(raw: &[Value]) -> Vec<MatchRecord> {
    let mut out = Vec::with_capacity(raw.len());
    let mut rejected = 0usize;

    for entry in raw {
        match MatchRecord::from_value(entry) {
            Ok(record) => out.push(record),
            Err(reason) => {
                rejected += 1;
                debug!(
                    match_id = entry.get("id").and_then(serde_json::Value::as_u64),
                    "match excluded: {}",
                    reason
                );
            }
        }
    }

    if rejected > 0 {
        debug!("normalized {} matches, excluded {}", out.len(), rejected);
    }
    out
}

fn parse_opponents(raw: Option<&Value>) -> Result<[TeamRef; 2], RecordRejection> {
    let list = match raw.and_then(Value::as_array) {
        Some(list) => list,
        None => return Err(RecordRejection::InvalidMatchShape { found: 0 }),
    };
    if list.len() != 2 {
        return Err(RecordRejection::InvalidMatchShape { found: list.len() });
    }

    let a = parse_team_ref(&list[0]).ok_or(RecordRejection::Malformed("opponent without id"))?;
    let b = parse_team_ref(&list[1]).ok_or(RecordRejection::Malformed("opponent without id"))?;
    Ok([a, b])
}

// Upstream wraps each side as {"type": "Team", "opponent": {...}}; accept the
// bare team object as well.
fn parse_team_ref(entry: &Value) -> Option<TeamRef> {
    let team = entry.get("opponent").unwrap_or(entry);
    let id = team.get("id").and_then(Value::as_u64)?;
    let name = team
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TEAM_NAME)
        .to_string();
    Some(TeamRef { id, name })
}

// Complete only when there are exactly two sides with integer scores.
fn parse_score_pair(raw: Option<&Value>) -> Option<[SideScore; 2]> {
    let list = raw.and_then(Value::as_array)?;
    if list.len() != 2 {
        return None;
    }
    let side = |v: &Value| -> Option<SideScore> {
        let score = v.get("score").and_then(Value::as_u64)?;
        Some(SideScore {
            team_id: v.get("team_id").and_then(Value::as_u64),
            score:   u32::try_from(score).ok()?,
        })
    };
    Some([side(&list[0])?, side(&list[1])?])
}
