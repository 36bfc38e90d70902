use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use logger::{ApiStatusEvent, EventLogger};
use match_history::{normalize_history, MatchRecord, TeamId};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{PandaScoreConfig, MAX_UPCOMING_WINDOW_HOURS};

const SOURCE: &str = "pandascore";
const RANGE_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Thin PandaScore CS2 client. Every request waits on a shared rate limiter.
pub struct PandaScoreClient {
    client:  reqwest::Client,
    config:  PandaScoreConfig,
    limiter: DefaultDirectRateLimiter,
    logger:  EventLogger,
}

impl PandaScoreClient {
    pub fn new(config: PandaScoreConfig, logger: EventLogger) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let limiter = RateLimiter::direct(Quota::per_second(config.requests_per_sec));

        Ok(Self { client, config, limiter, logger })
    }

    pub fn config(&self) -> &PandaScoreConfig {
        &self.config
    }

    /// Upcoming CS2 matches starting within the configured window from `now`.
    pub fn upcoming_url(&self, now: DateTime<Utc>) -> String {
        let window = self.config.upcoming_window_hours.clamp(1, MAX_UPCOMING_WINDOW_HOURS);
        let until = now + ChronoDuration::hours(window);
        format!(
            "{}/csgo/matches/upcoming?sort=begin_at&range[begin_at]={},{}",
            self.config.base_url,
            now.format(RANGE_FMT),
            until.format(RANGE_FMT),
        )
    }

    /// Finished matches of one team, newest first.
    pub fn team_history_url(&self, team_id: TeamId) -> String {
        format!(
            "{}/csgo/teams/{}/matches?per_page={}&finished=true&sort=-begin_at",
            self.config.base_url, team_id, self.config.history_depth,
        )
    }

    pub async fn upcoming_matches(&self) -> Result<Vec<MatchRecord>> {
        let url = self.upcoming_url(Utc::now());
        let raw = self.get_match_list(&url, "upcoming").await?;
        let records = normalize_history(&raw);
        info!("PandaScore upcoming: {} fixtures ({} with two opponents)", raw.len(), records.len());
        Ok(records)
    }

    pub async fn team_history(&self, team_id: TeamId) -> Result<Vec<MatchRecord>> {
        let url = self.team_history_url(team_id);
        let raw = self
            .get_match_list(&url, "team_history")
            .await
            .with_context(|| format!("history fetch failed for team {team_id}"))?;
        Ok(normalize_history(&raw))
    }

    async fn get_match_list(&self, url: &str, scope: &str) -> Result<Vec<Value>> {
        self.limiter.until_ready().await;
        debug!("GET {url}");

        let resp = match self
            .client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                self.logger.log_quiet(&ApiStatusEvent::failed(SOURCE, scope, None, e.to_string()));
                return Err(anyhow!(e).context("PandaScore request failed"));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            warn!("PandaScore {scope} failed {status}: {snippet}");
            self.logger.log_quiet(&ApiStatusEvent::failed(
                SOURCE,
                scope,
                Some(status.as_u16()),
                format!("http_{status}"),
            ));
            return Err(anyhow!("PandaScore HTTP {status}"));
        }

        let body = resp.text().await.context("PandaScore body read failed")?;
        let list = parse_match_list(&body)?;
        self.logger.log_quiet(&ApiStatusEvent::ok(SOURCE, scope, list.len()));
        Ok(list)
    }
}

/// A JSON array of matches. Anything else that parses (null, an error
/// object) is read as an empty list.
pub fn parse_match_list(body: &str) -> Result<Vec<Value>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Value = serde_json::from_str(trimmed).context("PandaScore JSON parse failed")?;
    match parsed {
        Value::Array(items) => Ok(items),
        other => {
            debug!("non-array PandaScore body: {}", other);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> PandaScoreClient {
        let tmp = std::env::temp_dir().join("pandascore-client-tests");
        let mut cfg = PandaScoreConfig::new("key");
        cfg.base_url = "https://api.test".to_string();
        cfg.history_depth = 30;
        PandaScoreClient::new(cfg, EventLogger::new(tmp)).unwrap()
    }

    #[test]
    fn upcoming_url_spans_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 0).unwrap();
        assert_eq!(
            client().upcoming_url(now),
            "https://api.test/csgo/matches/upcoming?sort=begin_at\
             &range[begin_at]=2024-06-01T09:05:00Z,2024-06-02T09:05:00Z"
        );
    }

    #[test]
    fn oversized_window_is_capped() {
        let mut client = client();
        client.config.upcoming_window_hours = i64::MAX;
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(client.upcoming_url(now).ends_with("2024-06-01T00:00:00Z,2024-06-15T00:00:00Z"));
    }

    #[test]
    fn history_url_requests_finished_newest_first() {
        assert_eq!(
            client().team_history_url(3212),
            "https://api.test/csgo/teams/3212/matches?per_page=30&finished=true&sort=-begin_at"
        );
    }

    #[test]
    fn non_array_bodies_are_empty() {
        assert!(parse_match_list("null").unwrap().is_empty());
        assert!(parse_match_list("").unwrap().is_empty());
        assert!(parse_match_list(r#"{"error":"Forbidden"}"#).unwrap().is_empty());
        assert_eq!(parse_match_list("[{}, {}]").unwrap().len(), 2);
        assert!(parse_match_list("{not json").is_err());
    }
}
