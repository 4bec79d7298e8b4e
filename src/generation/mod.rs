//! Text generation collaborator
//!
//! Briefing and report conversion both hand a prompt to an opaque text generator and take back
//! a string. The generator is a trait object so tests can substitute canned output.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Structured hints that bias report conversion towards known field values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFieldBias {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
}

impl ReportFieldBias {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problem_type.is_none()
            && self.location.is_none()
            && self.aircraft_model.is_none()
            && self.altitude.is_none()
    }
}

/// Single generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub bias: Option<ReportFieldBias>,
}

impl GenerationRequest {
    #[must_use]
    pub fn text(prompt: String) -> Self {
        Self { prompt, bias: None }
    }

    #[must_use]
    pub fn with_bias(prompt: String, bias: Option<ReportFieldBias>) -> Self {
        Self {
            prompt,
            bias: bias.filter(|b| !b.is_empty()),
        }
    }

    /// Prompt with any structured hints appended as a JSON block
    #[must_use]
    pub fn rendered_prompt(&self) -> String {
        match self
            .bias
            .as_ref()
            .and_then(|bias| serde_json::to_string_pretty(bias).ok())
        {
            Some(hints) => format!(
                "{}\n\nStructured field hints (prefer these values when consistent with the text):\n{}",
                self.prompt, hints
            ),
            None => self.prompt.clone(),
        }
    }
}

/// Text-in / text-out generation. No retry, no streaming; failures surface as errors.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_prompt_without_bias() {
        let request = GenerationRequest::text("hello".to_string());
        assert_eq!(request.rendered_prompt(), "hello");
    }

    #[test]
    fn test_empty_bias_is_dropped() {
        let request =
            GenerationRequest::with_bias("p".to_string(), Some(ReportFieldBias::default()));
        assert!(request.bias.is_none());
    }

    #[test]
    fn test_rendered_prompt_with_bias() {
        let bias = ReportFieldBias {
            aircraft_model: Some("C172".to_string()),
            altitude: Some("8000".to_string()),
            ..ReportFieldBias::default()
        };
        let rendered = GenerationRequest::with_bias("p".to_string(), Some(bias)).rendered_prompt();
        assert!(rendered.starts_with("p\n\nStructured field hints"));
        assert!(rendered.contains("\"aircraft_model\": \"C172\""));
        assert!(!rendered.contains("problem_type"));
    }
}
