//! Free-text geocoding used as a coordinate fallback
//!
//! Public geocoders publish usage policies (Nominatim: at most one request per second), so
//! every lookup passes through a shared spacing limiter.

use anyhow::{Context, bail};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::http_client;
use super::payload::first_number;
use crate::Result;
use crate::config::{GeocodingConfig, UpstreamConfig};

/// One lookup per `min_interval`; `None` when spacing is disabled
fn spacing_limiter(min_interval: Duration) -> Option<DefaultDirectRateLimiter> {
    Quota::with_period(min_interval).map(RateLimiter::direct)
}

pub struct Geocoder {
    client: Client,
    url: String,
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl Geocoder {
    pub fn new(upstream: &UpstreamConfig, config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&upstream.user_agent, config.timeout())?,
            url: config.url.clone(),
            rate_limiter: spacing_limiter(config.min_interval()),
        })
    }

    /// `(latitude, longitude)` of the best match; `None` on no match or any failure
    #[instrument(skip(self))]
    pub async fn locate(&self, query: &str) -> Option<(f64, f64)> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        match self.search(query).await {
            Ok(found) => {
                debug!(found = found.is_some(), "Geocoding finished");
                found
            }
            Err(e) => {
                debug!("Geocoding failed: {:#}", e);
                None
            }
        }
    }

    async fn search(&self, query: &str) -> anyhow::Result<Option<(f64, f64)>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .context("Geocoding request failed")?;

        if response.status() != StatusCode::OK {
            bail!("Geocoder returned {}", response.status());
        }

        let results: Value = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;
        Ok(first_result_point(&results))
    }
}

/// Coordinates of the first array element, if it carries both
fn first_result_point(results: &Value) -> Option<(f64, f64)> {
    let first = results.as_array()?.first()?.as_object()?;
    let lat = first_number(first, &["lat", "latitude"])?;
    let lon = first_number(first, &["lon", "longitude"])?;
    Some((lat, lon))
}
