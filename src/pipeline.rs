//! Fetch → normalize → aggregate → render, for one pack run.

use anyhow::{Context, Result};
use chrono::Utc;
use futures_util::{stream, StreamExt};
use logger::{now_iso, EventLogger, PackGeneratedEvent, TeamAnalyzedEvent};
use match_history::{aggregate, MatchRecord, Matchup, SummaryFormatter, TeamRef, TeamStatSummary};
use pandascore::PandaScoreClient;
use tracing::{info, warn};

use crate::report::{PackKind, Report};

/// Both sides of one fixture, aggregated against each other.
#[derive(Debug, Clone)]
pub struct MatchupAnalysis {
    pub matchup: Matchup,
    pub team_a:  TeamStatSummary,
    pub team_b:  TeamStatSummary,
}

pub async fn analyze_team(
    client: &PandaScoreClient,
    logger: &EventLogger,
    match_id: Option<u64>,
    team: &TeamRef,
    rival: &TeamRef,
) -> Result<TeamStatSummary> {
    let history = client.team_history(team.id).await?;
    let summary = aggregate(&history, team.id, rival.id);

    logger.log_quiet(&TeamAnalyzedEvent {
        ts:                now_iso(),
        event:             "TEAM_ANALYZED",
        match_id,
        team:              team.name.clone(),
        rival:             rival.name.clone(),
        history_len:       history.len(),
        form_len:          summary.recent_form.len(),
        h2h_played:        summary.head_to_head.played,
        h2h_won:           summary.head_to_head.won,
        maps_tracked:      summary.map_stats.len(),
        series_eligible:   summary.series_over_rate.eligible,
        series_considered: summary.series_over_rate.matches_considered,
        rounds_available:  summary.round_totals.is_available(),
    });

    Ok(summary)
}

/// Fetches both histories concurrently; either failing fails the matchup.
pub async fn analyze_matchup(
    client: &PandaScoreClient,
    logger: &EventLogger,
    record: &MatchRecord,
) -> Result<MatchupAnalysis> {
    let matchup = Matchup::from_record(record);
    info!("Analyzing {}...", matchup.title());

    let (team_a, team_b) = tokio::try_join!(
        analyze_team(client, logger, matchup.match_id, &matchup.team_a, &matchup.team_b),
        analyze_team(client, logger, matchup.match_id, &matchup.team_b, &matchup.team_a),
    )?;

    Ok(MatchupAnalysis { matchup, team_a, team_b })
}

/// Builds a whole pack from the upcoming window.
pub async fn build_pack<F: SummaryFormatter>(
    client: &PandaScoreClient,
    logger: &EventLogger,
    formatter: &F,
    kind: PackKind,
    concurrency: usize,
) -> Result<Report> {
    let mut report = Report::new(kind, Utc::now().date_naive());
    report.window_hours = client.config().upcoming_window_hours;

    let upcoming = client
        .upcoming_matches()
        .await
        .context("upcoming matches fetch failed")?;
    report.upcoming = upcoming.len();

    let analyses: Vec<Result<MatchupAnalysis>> = stream::iter(upcoming.iter())
        .map(|record| analyze_matchup(client, logger, record))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (record, analysis) in upcoming.iter().zip(analyses) {
        match analysis {
            Ok(a) => report.push_block(formatter.render_matchup(&a.matchup, &a.team_a, &a.team_b)),
            Err(e) => {
                warn!("Skipping match {:?}: {:#}", record.id, e);
                report.mark_skipped();
            }
        }
    }

    info!(
        pack = kind.slug(),
        "Pack built: {} listed, {} skipped of {} upcoming",
        report.listed, report.skipped, report.upcoming
    );
    Ok(report)
}

pub fn log_pack(logger: &EventLogger, report: &Report, path: Option<&std::path::Path>) {
    logger.log_quiet(&PackGeneratedEvent {
        ts:               now_iso(),
        event:            "PACK_GENERATED",
        pack:             report.kind.slug().to_string(),
        upcoming:         report.upcoming,
        matchups_listed:  report.listed,
        matchups_skipped: report.skipped,
        report_path:      path.map(|p| p.display().to_string()),
    });
}
