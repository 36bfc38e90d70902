//! Process-level settings and start-up shared by both binaries.

use anyhow::{Context, Result};
use std::env;
use std::fs::File;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_MATCH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_dir:           PathBuf,
    pub report_dir:        PathBuf,
    /// Upcoming fixtures analyzed at once; each one issues two history requests.
    pub match_concurrency: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let match_concurrency = match get("MATCH_CONCURRENCY") {
            None => DEFAULT_MATCH_CONCURRENCY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!("MATCH_CONCURRENCY={raw:?} is not valid, using {DEFAULT_MATCH_CONCURRENCY}");
                    DEFAULT_MATCH_CONCURRENCY
                }
            },
        };

        Self {
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
            report_dir: get("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("reports")),
            match_concurrency,
        }
    }
}

pub fn init_tracing() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();
}

/// Lock file guarding against two concurrent runs of the same binary.
pub fn lock_file(name: &str) -> Result<File> {
    let path = env::temp_dir().join(format!("cs2_intel_{name}.lock"));
    File::create(&path).with_context(|| format!("failed to create lock file at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
        assert_eq!(cfg.report_dir, PathBuf::from("reports"));
        assert_eq!(cfg.match_concurrency, DEFAULT_MATCH_CONCURRENCY);

        let cfg = AppConfig::from_lookup(|key| match key {
            "REPORT_DIR" => Some("/tmp/packs".to_string()),
            "MATCH_CONCURRENCY" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(cfg.report_dir, PathBuf::from("/tmp/packs"));
        assert_eq!(cfg.match_concurrency, DEFAULT_MATCH_CONCURRENCY);
    }
}
