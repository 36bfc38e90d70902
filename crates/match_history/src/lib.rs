//! CS2 match-history aggregation
//!
//! Pure, synchronous statistics over a team's recent PandaScore history:
//! recent form, head-to-head against a rival, map pool, and series/round
//! totals for over/under lines. No I/O, no clock, no shared state.

pub mod aggregate;
pub mod model;
pub mod summary;
pub mod totals;

pub use aggregate::{aggregate, RECENT_FORM_LEN};
pub use model::{normalize_history, GameRecord, MatchRecord, RecordRejection, SideScore, TeamId, TeamRef};
pub use summary::{
    FormEntry, HeadToHead, MapRecord, MatchOutcome, Matchup, RoundTotals, SeriesOverRate,
    SummaryFormatter, TeamStatSummary, NO_MAP_DATA, ROUNDS_UNAVAILABLE, UNKNOWN_SCORE,
};
pub use totals::{extract_round_totals, extract_series_totals};
