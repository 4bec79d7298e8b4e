//! Briefing assembly: gather every source concurrently, build one prompt, normalize the answer

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::SectionNormalizer;
use crate::config::BriefingConfig;
use crate::generation::{GenerationRequest, TextGenerator};
use crate::models::station::comma_joined;
use crate::models::{
    BriefingDocument, PilotProfile, SectionId, StationIdentifier, StationNames, WeatherBundle,
    legs,
};
use crate::upstream::{HazardFetcher, ObservationFetcher, ReportKind, StationDirectory};
use crate::{BriefingError, Result};

/// Lookback windows for one briefing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindows {
    pub metar_hours: u32,
    pub taf_hours: u32,
    pub hazard_hours: u32,
}

impl Default for LookbackWindows {
    fn default() -> Self {
        Self {
            metar_hours: ReportKind::Metar.default_hours(),
            taf_hours: ReportKind::Taf.default_hours(),
            hazard_hours: 6,
        }
    }
}

impl From<&BriefingConfig> for LookbackWindows {
    fn from(config: &BriefingConfig) -> Self {
        Self {
            metar_hours: config.metar_hours,
            taf_hours: config.taf_hours,
            hazard_hours: config.hazard_hours,
        }
    }
}

pub struct BriefingAssembler {
    observations: ObservationFetcher,
    hazards: HazardFetcher,
    directory: Arc<StationDirectory>,
    generator: Arc<dyn TextGenerator>,
    windows: LookbackWindows,
}

impl BriefingAssembler {
    pub fn new(
        observations: ObservationFetcher,
        hazards: HazardFetcher,
        directory: Arc<StationDirectory>,
        generator: Arc<dyn TextGenerator>,
        windows: LookbackWindows,
    ) -> Self {
        Self {
            observations,
            hazards,
            directory,
            generator,
            windows,
        }
    }

    /// Fetch METARs, TAFs, hazards and station names concurrently
    pub async fn gather(&self, identifiers: &[StationIdentifier]) -> (WeatherBundle, StationNames) {
        let start_time = Instant::now();
        let (metar, taf, hazards, names) = futures::join!(
            self.observations
                .fetch_reports(ReportKind::Metar, identifiers, self.windows.metar_hours),
            self.observations
                .fetch_reports(ReportKind::Taf, identifiers, self.windows.taf_hours),
            self.hazards.fetch_hazards(self.windows.hazard_hours),
            self.directory.resolve_names(identifiers),
        );
        let bundle = WeatherBundle::new(metar, taf, hazards);

        info!(
            sources = bundle.source_count(),
            named = names.iter().filter(|(_, name)| !name.is_empty()).count(),
            "Gathered briefing inputs in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        (bundle, names)
    }

    /// Build the briefing document for `identifiers`
    ///
    /// Fails only when no weather source produced anything. A generator failure is reported
    /// inside the document instead.
    #[instrument(skip(self, identifiers), fields(stations = %comma_joined(identifiers), profile = %profile))]
    pub async fn assemble(
        &self,
        identifiers: &[StationIdentifier],
        profile: &PilotProfile,
    ) -> Result<BriefingDocument> {
        let (bundle, names) = self.gather(identifiers).await;
        if bundle.is_empty() {
            return Err(BriefingError::unavailable(format!(
                "no METAR, TAF or hazard data for {}",
                comma_joined(identifiers)
            )));
        }

        let prompt = briefing_prompt(&bundle, &names, identifiers, profile);
        match self.generator.generate(GenerationRequest::text(prompt)).await {
            Ok(raw) => {
                let document = SectionNormalizer::normalize(&raw);
                info!(sections = document.sections().len(), "Briefing generated");
                Ok(document)
            }
            Err(e) => {
                warn!("Briefing generation failed: {}", e);
                Ok(BriefingDocument::error(&format!(
                    "Error generating summary: {}",
                    e.user_message()
                )))
            }
        }
    }
}

/// Prompt carrying the profile, the section template, route legs, directory and weather blob
#[must_use]
pub fn briefing_prompt(
    bundle: &WeatherBundle,
    names: &StationNames,
    identifiers: &[StationIdentifier],
    profile: &PilotProfile,
) -> String {
    let summary = SectionId::Summary;
    let recommendations = SectionId::Recommendations;
    let per_airport = SectionId::PerAirport;

    let route = legs(identifiers)
        .iter()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect::<Vec<_>>();
    let route = if route.is_empty() {
        "(single airport, no legs)".to_string()
    } else {
        route.join("\n")
    };

    format!(
        r#"You are an expert aviation weather briefer. Audience pilot profile: '{profile}'.
Read the RAW WEATHER DATA and the AIRPORT DIRECTORY and produce three sections only, as concise HTML:
1) <section {summary_marker}><h2>{summary_heading}</h2><ul><li>...</li></ul></section>
2) <section {recommendations_marker}><h2>{recommendations_heading}</h2><ul><li>...</li></ul></section>
3) <section {per_airport_marker}><h2>{per_airport_heading}</h2>
     <ul>
       <li><strong>ICAO - Airport Name</strong>: decoded current conditions, ceilings/visibility, winds, precipitation, hazards; brief TAF outlook.</li>
     </ul>
   </section>

- Keep bullets brief and safety-forward.
- No preamble or explanations outside these sections.
- Do not include the raw data itself in your output. Decode it to plain language.
- In the per-airport section, show every individual feature on its own line with its own bullet.
- Keep summaries to 1-2 sentences and include any values that matter to the pilot.
- In the recommendations section, cover the journey leg by leg, in the order listed under ROUTE LEGS.

ROUTE LEGS:
{route}

AIRPORT DIRECTORY (ICAO -> Name):
{directory}

RAW WEATHER DATA START
{weather}
RAW WEATHER DATA END
"#,
        summary_marker = summary.marker(),
        summary_heading = summary.heading(),
        recommendations_marker = recommendations.marker(),
        recommendations_heading = recommendations.heading(),
        per_airport_marker = per_airport.marker(),
        per_airport_heading = per_airport.heading(),
        directory = names.directory_listing(),
        weather = bundle.labeled_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationIdentifier {
        StationIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_prompt_contains_all_context() {
        let ids = vec![id("VABB"), id("VOMM")];
        let names: StationNames = vec![
            (id("VABB"), "Chhatrapati Shivaji Intl".to_string()),
            (id("VOMM"), String::new()),
        ]
        .into_iter()
        .collect();
        let bundle = WeatherBundle::new("METAR VABB".to_string(), String::new(), String::new());
        let prompt = briefing_prompt(&bundle, &names, &ids, &PilotProfile::new("IFR"));

        assert!(prompt.contains("Audience pilot profile: 'IFR'"));
        assert!(prompt.contains("<section id=\"recommendations\">"));
        assert!(prompt.contains("VABB -> VOMM"));
        assert!(prompt.contains("VABB: Chhatrapati Shivaji Intl\nVOMM:\n"));
        assert!(prompt.contains("RAW WEATHER DATA START\nMETARs:\nMETAR VABB\nRAW WEATHER DATA END"));
        assert!(!prompt.contains("TAFs:"));
    }

    #[test]
    fn test_prompt_single_airport_has_no_legs() {
        let ids = vec![id("KJFK")];
        let prompt = briefing_prompt(
            &WeatherBundle::default(),
            &StationNames::unresolved(&ids),
            &ids,
            &PilotProfile::default(),
        );
        assert!(prompt.contains("(single airport, no legs)"));
        assert!(prompt.contains("'VFR'"));
    }

    #[test]
    fn test_windows_from_config() {
        let config = BriefingConfig {
            metar_hours: 3,
            taf_hours: 12,
            hazard_hours: 4,
            default_pilot_profile: "VFR".to_string(),
        };
        let windows = LookbackWindows::from(&config);
        assert_eq!(windows.metar_hours, 3);
        assert_eq!(windows.taf_hours, 12);
        assert_eq!(windows.hazard_hours, 4);
        assert_eq!(LookbackWindows::default().metar_hours, 2);
    }
}
