//! Request-level service
//!
//! Classifies incoming text, runs the briefing or report-conversion flow and turns the
//! outcome into the downstream contract: a briefing document, a coded report line, or an error.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::briefing::{BriefingAssembler, LookbackWindows};
use crate::config::WxBriefConfig;
use crate::generation::{GeminiClient, ReportFieldBias, TextGenerator};
use crate::identifiers;
use crate::models::{BriefingDocument, PilotProfile, RouteLeg, StationIdentifier, StationRecord, measured_legs};
use crate::pirep::PirepConverter;
use crate::upstream::{HazardFetcher, ObservationFetcher, StationDirectory};
use crate::{BriefingError, Result};

const EMPTY_INPUT: &str = "Please enter ICAO codes or a PIREP in plain English.";
const EMPTY_CODES: &str = "Please enter 4-letter ICAO codes.";
const INVALID_CODES: &str = "Please enter valid 4-letter ICAO codes (e.g., VABB VOMM).";

/// Completed briefing for a validated identifier list
#[derive(Debug, Clone, Serialize)]
pub struct Briefing {
    pub identifiers: Vec<StationIdentifier>,
    pub profile: PilotProfile,
    pub document: BriefingDocument,
}

/// Result of routing free-form input
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Briefing(Briefing),
    Report(String),
}

/// Station coordinates plus the legs between them
#[derive(Debug, Clone, Serialize)]
pub struct RouteCoordinates {
    pub coords: Vec<StationRecord>,
    pub legs: Vec<RouteLeg>,
}

pub struct BriefingService {
    assembler: BriefingAssembler,
    directory: Arc<StationDirectory>,
    pirep: PirepConverter,
    default_profile: String,
}

impl BriefingService {
    /// Service backed by the configured Gemini model
    pub fn from_config(config: &WxBriefConfig) -> Result<Self> {
        let generator = Arc::new(GeminiClient::new(&config.upstream, &config.generation)?);
        Self::new(config, generator)
    }

    /// Service with an explicit generator
    pub fn new(config: &WxBriefConfig, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        let directory = Arc::new(StationDirectory::new(config)?);
        let assembler = BriefingAssembler::new(
            ObservationFetcher::new(&config.upstream)?,
            HazardFetcher::new(&config.upstream)?,
            Arc::clone(&directory),
            Arc::clone(&generator),
            LookbackWindows::from(&config.briefing),
        );

        Ok(Self {
            assembler,
            directory,
            pirep: PirepConverter::new(generator),
            default_profile: config.briefing.default_pilot_profile.clone(),
        })
    }

    fn profile(&self, requested: Option<&str>) -> PilotProfile {
        PilotProfile::from_request(requested, &self.default_profile)
    }

    /// Route free-form input to the briefing or the report-conversion flow
    #[instrument(skip(self, text, profile))]
    pub async fn process(&self, text: &str, profile: Option<&str>) -> Result<ProcessOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BriefingError::validation(EMPTY_INPUT));
        }

        if identifiers::classify(text) {
            info!("Input classified as identifier list");
            let briefing = self.brief(text, profile).await?;
            Ok(ProcessOutcome::Briefing(briefing))
        } else {
            info!("Input classified as free-text report");
            let line = self.pirep.convert(text, None).await?;
            Ok(ProcessOutcome::Report(line))
        }
    }

    /// Briefing for an identifier list given as text
    pub async fn brief(&self, text: &str, profile: Option<&str>) -> Result<Briefing> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BriefingError::validation(EMPTY_CODES));
        }
        if !identifiers::classify(text) {
            return Err(BriefingError::validation(INVALID_CODES));
        }

        let identifiers = identifiers::normalize(text)?;
        let profile = self.profile(profile);
        let document = self.assembler.assemble(&identifiers, &profile).await?;

        Ok(Briefing {
            identifiers,
            profile,
            document,
        })
    }

    /// Coded PIREP line for a plain-English report
    pub async fn convert_report(&self, text: &str, bias: Option<ReportFieldBias>) -> Result<String> {
        self.pirep.convert(text, bias).await
    }

    /// Coordinates for each station in request order, with leg distances
    pub async fn coordinates(&self, identifiers: &[StationIdentifier]) -> RouteCoordinates {
        let coords = self.directory.resolve_coordinates(identifiers).await;
        let legs = measured_legs(identifiers, &coords);
        RouteCoordinates { coords, legs }
    }
}
