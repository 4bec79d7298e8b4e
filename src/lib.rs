//! `wxbrief` - Pre-flight aviation weather briefings
//!
//! This library gathers METAR, TAF and SIGMET/AIRMET text for a list of ICAO stations,
//! resolves station names and coordinates, and turns everything into a sectioned HTML
//! briefing through a text generation collaborator.

pub mod api;
pub mod briefing;
pub mod config;
pub mod error;
pub mod generation;
pub mod identifiers;
pub mod models;
pub mod pirep;
pub mod service;
pub mod telemetry;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use briefing::{BriefingAssembler, LookbackWindows, SectionNormalizer};
pub use config::WxBriefConfig;
pub use error::BriefingError;
pub use generation::{GeminiClient, GenerationRequest, ReportFieldBias, TextGenerator};
pub use models::{BriefingDocument, PilotProfile, StationIdentifier, StationRecord, WeatherBundle};
pub use pirep::PirepConverter;
pub use service::{BriefingService, ProcessOutcome};
pub use upstream::{HazardFetcher, ObservationFetcher, StationDirectory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, BriefingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
