//! Client for the station-metadata / hazard data server

use anyhow::{Context, bail};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use super::http_client;
use crate::Result;
use crate::config::UpstreamConfig;

/// Thin JSON retrieval wrapper shared by the station directory and the hazard fetcher
#[derive(Debug, Clone)]
pub struct DataServerClient {
    client: Client,
    url: String,
}

impl DataServerClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&config.user_agent, config.timeout())?,
            url: config.dataserver_url.clone(),
        })
    }

    /// `GET ?datasource=..&requesttype=retrieve&format=json` plus source-specific filters
    pub async fn retrieve(&self, datasource: &str, filters: &[(&str, String)]) -> anyhow::Result<Value> {
        let start_time = Instant::now();
        let mut params: Vec<(&str, String)> = vec![
            ("datasource", datasource.to_string()),
            ("requesttype", "retrieve".to_string()),
            ("format", "json".to_string()),
        ];
        params.extend(filters.iter().cloned());

        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Data server request for '{datasource}' failed"))?;

        if response.status() != StatusCode::OK {
            bail!(
                "Data server returned {} for '{}'",
                response.status(),
                datasource
            );
        }

        let payload: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse data server response for '{datasource}'"))?;

        let elapsed = start_time.elapsed();
        debug!(
            datasource,
            elapsed_ms = elapsed.as_millis() as u64,
            "Data server responded"
        );
        if elapsed.as_secs() > 5 {
            warn!(
                "Slow data server response for '{}': {:.3}s",
                datasource,
                elapsed.as_secs_f64()
            );
        }

        Ok(payload)
    }
}
