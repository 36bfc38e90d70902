/// CS2 Intel — Logger
/// JSONL event stream, one file per UTC day

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("cannot create log dir {:?}: {}", dir, e);
        }
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event).context("event serialize failed")?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    /// Logs and swallows failures; diagnostics must never stop a run.
    pub fn log_quiet<T: Serialize>(&self, event: &T) {
        if let Err(e) = self.log(event) {
            tracing::warn!("event log write failed: {e:#}");
        }
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ──────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ApiStatusEvent {
    pub ts:           String,
    pub event:        &'static str,   // "API_STATUS"
    pub source:       String,         // "pandascore"
    pub scope:        String,         // "upcoming" | "team_history"
    pub ok:           bool,
    pub status_code:  Option<u16>,
    pub message:      String,
    pub items_logged: usize,
}

impl ApiStatusEvent {
    pub fn ok(source: &str, scope: &str, items: usize) -> Self {
        Self {
            ts:           now_iso(),
            event:        "API_STATUS",
            source:       source.to_string(),
            scope:        scope.to_string(),
            ok:           true,
            status_code:  Some(200),
            message:      "ok".to_string(),
            items_logged: items,
        }
    }

    pub fn failed(source: &str, scope: &str, status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            ts:           now_iso(),
            event:        "API_STATUS",
            source:       source.to_string(),
            scope:        scope.to_string(),
            ok:           false,
            status_code,
            message:      message.into(),
            items_logged: 0,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct TeamAnalyzedEvent {
    pub ts:                 String,
    pub event:              &'static str,   // "TEAM_ANALYZED"
    pub match_id:           Option<u64>,
    pub team:               String,
    pub rival:              String,
    pub history_len:        usize,
    pub form_len:           usize,
    pub h2h_played:         u32,
    pub h2h_won:            u32,
    pub maps_tracked:       usize,
    pub series_eligible:    u32,
    pub series_considered:  u32,
    pub rounds_available:   bool,
}

#[derive(Serialize, Debug)]
pub struct PackGeneratedEvent {
    pub ts:               String,
    pub event:            &'static str,   // "PACK_GENERATED"
    pub pack:             String,         // "daily_intel" | "over_under"
    pub upcoming:         usize,
    pub matchups_listed:  usize,
    pub matchups_skipped: usize,
    pub report_path:      Option<String>,
}
