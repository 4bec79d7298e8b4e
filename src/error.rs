//! Error types and handling for `wxbrief`

use thiserror::Error;

/// Main error type for the briefing service
///
/// Upstream transport problems never reach this type on the briefing path: fetchers degrade
/// to empty values at their own boundary. What remains are the request-level failures.
#[derive(Error, Debug)]
pub enum BriefingError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No weather source returned any data
    #[error("Weather data unavailable: {message}")]
    Unavailable { message: String },

    /// The text generation collaborator failed
    #[error("Generation error: {message}")]
    Generation { message: String },
}

impl BriefingError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new data-unavailable error
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BriefingError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            BriefingError::Validation { message } => message.clone(),
            BriefingError::Unavailable { .. } => {
                "Failed to fetch METAR/TAF/AIRMET/SIGMET data. Please try again later.".to_string()
            }
            BriefingError::Generation { message } => message.clone(),
        }
    }
}
