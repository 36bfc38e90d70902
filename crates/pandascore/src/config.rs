use anyhow::{anyhow, Result};
use std::env;
use std::num::NonZeroU32;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.pandascore.co";
pub const DEFAULT_HISTORY_DEPTH: u32 = 30;
pub const DEFAULT_UPCOMING_WINDOW_HOURS: i64 = 24;
pub const MAX_UPCOMING_WINDOW_HOURS: i64 = 24 * 14;
pub const DEFAULT_REQUESTS_PER_SEC: u32 = 2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the retrieval client. The aggregation core needs none of this.
#[derive(Debug, Clone)]
pub struct PandaScoreConfig {
    pub api_key:               String,
    pub base_url:              String,
    /// Matches requested per team history (`per_page`).
    pub history_depth:         u32,
    pub upcoming_window_hours: i64,
    pub requests_per_sec:      NonZeroU32,
    pub timeout_secs:          u64,
}

impl PandaScoreConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key:               api_key.into(),
            base_url:              DEFAULT_BASE_URL.to_string(),
            history_depth:         DEFAULT_HISTORY_DEPTH,
            upcoming_window_hours: DEFAULT_UPCOMING_WINDOW_HOURS,
            requests_per_sec:      NonZeroU32::new(DEFAULT_REQUESTS_PER_SEC).unwrap_or(NonZeroU32::MIN),
            timeout_secs:          DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `PANDASCORE_KEY` is required; everything else falls back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("PANDASCORE_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("PANDASCORE_KEY is not set"))?;

        let mut cfg = Self::new(api_key);

        if let Some(url) = get("PANDASCORE_BASE_URL").filter(|u| !u.trim().is_empty()) {
            cfg.base_url = url.trim().trim_end_matches('/').to_string();
        }
        cfg.history_depth = parse_or(&get, "MATCH_HISTORY_DEPTH", cfg.history_depth)
            .clamp(1, 100); // PandaScore per_page ceiling
        cfg.upcoming_window_hours = parse_or(&get, "UPCOMING_WINDOW_HOURS", cfg.upcoming_window_hours)
            .clamp(1, MAX_UPCOMING_WINDOW_HOURS);
        cfg.requests_per_sec = NonZeroU32::new(parse_or(
            &get,
            "PANDASCORE_REQUESTS_PER_SEC",
            cfg.requests_per_sec.get(),
        ))
        .unwrap_or(cfg.requests_per_sec);
        cfg.timeout_secs = parse_or(&get, "PANDASCORE_TIMEOUT_SECS", cfg.timeout_secs).max(1);

        Ok(cfg)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match get(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!("{key}={raw:?} is not valid, using {default}");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn key_is_required() {
        assert!(PandaScoreConfig::from_lookup(lookup(&[])).is_err());
        assert!(PandaScoreConfig::from_lookup(lookup(&[("PANDASCORE_KEY", "  ")])).is_err());
    }

    #[test]
    fn defaults_apply() {
        let cfg = PandaScoreConfig::from_lookup(lookup(&[("PANDASCORE_KEY", "abc")])).unwrap();
        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.history_depth, 30);
        assert_eq!(cfg.upcoming_window_hours, 24);
        assert_eq!(cfg.requests_per_sec.get(), DEFAULT_REQUESTS_PER_SEC);
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = PandaScoreConfig::from_lookup(lookup(&[
            ("PANDASCORE_KEY", "abc"),
            ("PANDASCORE_BASE_URL", "http://localhost:9000/"),
            ("MATCH_HISTORY_DEPTH", "500"),
            ("UPCOMING_WINDOW_HOURS", "twelve"),
            ("PANDASCORE_REQUESTS_PER_SEC", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:9000");
        assert_eq!(cfg.history_depth, 100);
        assert_eq!(cfg.upcoming_window_hours, 24);
        assert_eq!(cfg.requests_per_sec.get(), DEFAULT_REQUESTS_PER_SEC);
    }

    #[test]
    fn window_is_bounded() {
        let cfg = PandaScoreConfig::from_lookup(lookup(&[
            ("PANDASCORE_KEY", "abc"),
            ("UPCOMING_WINDOW_HOURS", "9223372036854775807"),
        ]))
        .unwrap();
        assert_eq!(cfg.upcoming_window_hours, MAX_UPCOMING_WINDOW_HOURS);

        let cfg = PandaScoreConfig::from_lookup(lookup(&[
            ("PANDASCORE_KEY", "abc"),
            ("UPCOMING_WINDOW_HOURS", "-5"),
        ]))
        .unwrap();
        assert_eq!(cfg.upcoming_window_hours, 1);
    }
}
