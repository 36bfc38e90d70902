//! Plain-text intelligence packs built on [`SummaryFormatter`].

use anyhow::{Context, Result};
use chrono::NaiveDate;
use match_history::{
    HeadToHead, Matchup, RoundTotals, SeriesOverRate, SummaryFormatter, TeamRef, TeamStatSummary,
    NO_MAP_DATA, ROUNDS_UNAVAILABLE,
};
use std::fs;
use std::path::{Path, PathBuf};

const SEPARATOR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    DailyIntel,
    OverUnder,
}

impl PackKind {
    pub fn slug(self) -> &'static str {
        match self {
            PackKind::DailyIntel => "daily_intel",
            PackKind::OverUnder  => "over_under",
        }
    }

    fn header(self, date: NaiveDate) -> String {
        match self {
            PackKind::DailyIntel => format!(
                "🧠 DAILY CS2 INTELLIGENCE PACK - {date}\n\
                 INSTRUCTIONS: Analyze Map Pools and H2H to find value bets.\n\n"
            ),
            PackKind::OverUnder => format!(
                "📉 OVER/UNDER DATA PACK - {date}\n\
                 INSTRUCTIONS: Use 'Avg Rounds' to bet Over/Under 21.5 Rounds. \
                 Use 'O2.5 Maps' for Series bets.\n\n"
            ),
        }
    }
}

// ── Shared fragments ─────────────────────────────────────────────────────────

/// `Mirage: 67% (2/3), Nuke: 100% (2/2)` or [`NO_MAP_DATA`].
pub fn format_map_stats(summary: &TeamStatSummary) -> String {
    let parts: Vec<String> = summary
        .played_maps()
        .filter_map(|(name, rec)| {
            rec.win_rate_pct()
                .map(|pct| format!("{name}: {pct:.0}% ({}/{})", rec.wins, rec.played))
        })
        .collect();

    if parts.is_empty() {
        NO_MAP_DATA.to_string()
    } else {
        parts.join(", ")
    }
}

pub fn format_recent_form(summary: &TeamStatSummary) -> String {
    if summary.recent_form.is_empty() {
        return "no recent matches".to_string();
    }
    summary
        .recent_form
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn format_recent_scores(summary: &TeamStatSummary) -> String {
    if summary.recent_form.is_empty() {
        return "none".to_string();
    }
    summary
        .recent_form
        .iter()
        .map(|f| format!("{} {}", f.label(), f.score_text))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_head_to_head(h2h: &HeadToHead) -> String {
    format!("Won {} of {}", h2h.won, h2h.played)
}

pub fn format_series(rate: &SeriesOverRate) -> String {
    match rate.rate_pct() {
        Some(pct) => format!("{}/{} ({pct:.0}%)", rate.eligible, rate.matches_considered),
        None => "0/0".to_string(),
    }
}

pub fn format_round_totals(totals: &RoundTotals) -> String {
    match *totals {
        RoundTotals::Unavailable => ROUNDS_UNAVAILABLE.to_string(),
        RoundTotals::Available { maps, over_21_5, over_22_5, .. } => {
            let avg = totals.average_rounds().unwrap_or_default();
            format!(
                "Avg Rounds {avg:.1} over {maps} maps | O21.5: {over_21_5}/{maps} | O22.5: {over_22_5}/{maps}"
            )
        }
    }
}

fn best_of(matchup: &Matchup) -> String {
    matchup
        .number_of_games
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

// ── Formatters ───────────────────────────────────────────────────────────────

/// Map pool + head-to-head pack.
pub struct DailyIntelFormatter {
    pub history_depth: u32,
}

impl SummaryFormatter for DailyIntelFormatter {
    fn render_team(&self, _team: &TeamRef, rival: &TeamRef, summary: &TeamStatSummary) -> String {
        format!(
            "   • Last 5: {}\n   • H2H vs {}: {}\n   • MAP POOL (Last {}): {}\n",
            format_recent_form(summary),
            rival.name,
            format_head_to_head(&summary.head_to_head),
            self.history_depth,
            format_map_stats(summary),
        )
    }

    fn render_matchup(&self, matchup: &Matchup, team_a: &TeamStatSummary, team_b: &TeamStatSummary) -> String {
        let league = matchup.league_name.as_deref().unwrap_or("Unknown league");
        let mut out = format!("⚔️ MATCH: {}\n", matchup.title());
        out += &format!("🏆 League: {league} (Best of {})\n", best_of(matchup));

        out += &format!("\n📊 TEAM A: {}\n", matchup.team_a.name);
        out += &self.render_team(&matchup.team_a, &matchup.team_b, team_a);
        out += &format!("\n📊 TEAM B: {}\n", matchup.team_b.name);
        out += &self.render_team(&matchup.team_b, &matchup.team_a, team_b);

        out += "\n💰 ODDS: [ENTER ODDS HERE]\n";
        out += &separator();
        out += "\n\n";
        out
    }
}

/// Series and round totals pack.
pub struct OverUnderFormatter;

impl SummaryFormatter for OverUnderFormatter {
    fn render_team(&self, team: &TeamRef, _rival: &TeamRef, summary: &TeamStatSummary) -> String {
        format!(
            "📊 {} Recent Scores: {}\n   • O2.5 Maps (Bo3): {}\n   • Rounds: {}\n",
            team.name,
            format_recent_scores(summary),
            format_series(&summary.series_over_rate),
            format_round_totals(&summary.round_totals),
        )
    }

    fn render_matchup(&self, matchup: &Matchup, team_a: &TeamStatSummary, team_b: &TeamStatSummary) -> String {
        let mut out = format!("⚔️ {} (Best of {})\n", matchup.title(), best_of(matchup));
        out += &self.render_team(&matchup.team_a, &matchup.team_b, team_a);
        out += &self.render_team(&matchup.team_b, &matchup.team_a, team_b);
        out += "💰 OVER/UNDER ODDS: [Over 21.5: _____ | Under 21.5: _____]\n";
        out += &separator();
        out += "\n";
        out
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Report {
    pub kind:         PackKind,
    pub date:         NaiveDate,
    pub window_hours: i64,
    pub upcoming:     usize,
    pub listed:       usize,
    pub skipped:      usize,
    body:             String,
}

impl Report {
    pub fn new(kind: PackKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            window_hours: 24,
            upcoming: 0,
            listed: 0,
            skipped: 0,
            body: String::new(),
        }
    }

    pub fn push_block(&mut self, block: String) {
        self.listed += 1;
        self.body.push_str(&block);
    }

    pub fn mark_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn render(&self) -> String {
        let mut out = self.kind.header(self.date);
        if self.upcoming == 0 && self.listed == 0 {
            out += &format!("No matches found for the next {} hours.", self.window_hours);
        } else if self.listed == 0 {
            out += &format!("All {} fixtures skipped (history unavailable).", self.upcoming);
        } else {
            out += &self.body;
        }
        out
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}.txt", self.kind.slug(), self.date)
    }

    /// Writes the rendered pack under `dir`, returning the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("create report dir {}", dir.display()))?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.render()).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
