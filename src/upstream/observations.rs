//! Raw METAR / TAF retrieval

use anyhow::{Context, bail};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::http_client;
use crate::Result;
use crate::config::UpstreamConfig;
use crate::models::StationIdentifier;
use crate::models::station::comma_joined;

/// Report family served by the raw-text API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    Metar,
    Taf,
}

impl ReportKind {
    fn path(self) -> &'static str {
        match self {
            ReportKind::Metar => "metar",
            ReportKind::Taf => "taf",
        }
    }

    /// Lookback window used when the caller has no preference
    #[must_use]
    pub fn default_hours(self) -> u32 {
        match self {
            ReportKind::Metar => 2,
            ReportKind::Taf => 24,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Metar => f.write_str("METAR"),
            ReportKind::Taf => f.write_str("TAF"),
        }
    }
}

/// Fetches opaque raw report text; decoding is left to the generator
#[derive(Debug, Clone)]
pub struct ObservationFetcher {
    client: Client,
    base_url: String,
}

impl ObservationFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&config.user_agent, config.timeout())?,
            base_url: config.data_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// One request for all identifiers; any failure yields an empty string
    #[instrument(skip(self, identifiers), fields(stations = %comma_joined(identifiers)))]
    pub async fn fetch_reports(
        &self,
        kind: ReportKind,
        identifiers: &[StationIdentifier],
        lookback_hours: u32,
    ) -> String {
        if identifiers.is_empty() {
            return String::new();
        }

        let start_time = Instant::now();
        match self.request(kind, identifiers, lookback_hours).await {
            Ok(text) => {
                info!(
                    "Retrieved {} {} line(s) in {:.3}s",
                    text.lines().count(),
                    kind,
                    start_time.elapsed().as_secs_f64()
                );
                text
            }
            Err(e) => {
                warn!("{} fetch failed, continuing without it: {:#}", kind, e);
                String::new()
            }
        }
    }

    async fn request(
        &self,
        kind: ReportKind,
        identifiers: &[StationIdentifier],
        lookback_hours: u32,
    ) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.base_url, kind.path());
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "raw".to_string()),
                ("hours", lookback_hours.to_string()),
                ("ids", comma_joined(identifiers)),
            ])
            .send()
            .await
            .with_context(|| format!("{kind} request failed"))?;

        if response.status() != StatusCode::OK {
            bail!("{} source returned {}", kind, response.status());
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read {kind} response body"))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows() {
        assert_eq!(ReportKind::Metar.default_hours(), 2);
        assert_eq!(ReportKind::Taf.default_hours(), 24);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig {
            data_api_url: "http://localhost:9/api/data/".to_string(),
            ..UpstreamConfig::default()
        };
        let fetcher = ObservationFetcher::new(&config).unwrap();
        assert_eq!(fetcher.base_url, "http://localhost:9/api/data");
    }

    #[tokio::test]
    async fn test_empty_identifiers_skip_request() {
        let config = UpstreamConfig {
            data_api_url: "http://127.0.0.1:9".to_string(),
            ..UpstreamConfig::default()
        };
        let fetcher = ObservationFetcher::new(&config).unwrap();
        assert_eq!(fetcher.fetch_reports(ReportKind::Metar, &[], 2).await, "");
    }
}
