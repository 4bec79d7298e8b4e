//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::{GenerationRequest, TextGenerator};
use crate::config::{GenerationConfig, UpstreamConfig};
use crate::upstream::http_client;
use crate::{BriefingError, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    pub fn new(upstream: &UpstreamConfig, config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&upstream.user_agent, config.timeout())?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BriefingError::generation("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set.")
        })?;

        let start_time = Instant::now();
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.rendered_prompt()),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                BriefingError::generation(format!("Generation request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Generation API returned {}: {}", status, error_text);
            return Err(BriefingError::generation(format!(
                "Generation API error {status}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            BriefingError::generation(format!(
                "Failed to parse generation response: {}",
                e.without_url()
            ))
        })?;

        let text = parsed.text().trim().to_string();
        if text.is_empty() {
            return Err(BriefingError::generation(
                "The generation service returned no text.",
            ));
        }
        info!(
            "Generated {} chars in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}
