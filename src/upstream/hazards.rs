//! SIGMET / AIRMET retrieval
//!
//! The two advisory classes are queried independently and reported as separate labeled blocks.
//! They are never interleaved.

use serde_json::Value;
use tracing::{info, instrument, warn};

use super::DataServerClient;
use super::payload::records;
use crate::Result;
use crate::config::UpstreamConfig;

/// Advisory class served by the data server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardClass {
    Sigmet,
    Airmet,
}

impl HazardClass {
    fn datasource(self) -> &'static str {
        match self {
            HazardClass::Sigmet => "sigmet",
            HazardClass::Airmet => "airsigmets",
        }
    }

    /// Key of the nested `{entity: {data}}` shape
    fn entity(self) -> &'static str {
        match self {
            HazardClass::Sigmet => "sigmet",
            HazardClass::Airmet => "airsigmet",
        }
    }

    fn text_keys(self) -> &'static [&'static str] {
        match self {
            HazardClass::Sigmet => &["raw_text", "description"],
            HazardClass::Airmet => &["raw_text", "hazard", "message"],
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HazardClass::Sigmet => "SIGMETs:",
            HazardClass::Airmet => "AIRMETs:",
        }
    }
}

pub struct HazardFetcher {
    dataserver: DataServerClient,
}

impl HazardFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            dataserver: DataServerClient::new(config)?,
        })
    }

    /// Labeled hazard text for both classes; `""` when neither has data
    #[instrument(skip(self))]
    pub async fn fetch_hazards(&self, lookback_hours: u32) -> String {
        let (sigmets, airmets) = futures::join!(
            self.fetch_class(HazardClass::Sigmet, lookback_hours),
            self.fetch_class(HazardClass::Airmet, lookback_hours)
        );
        info!(
            sigmets = sigmets.len(),
            airmets = airmets.len(),
            "Hazard advisories collected"
        );
        compose(&[(HazardClass::Sigmet, sigmets), (HazardClass::Airmet, airmets)])
    }

    async fn fetch_class(&self, class: HazardClass, lookback_hours: u32) -> Vec<String> {
        let filters = [("hoursBeforeNow", lookback_hours.to_string())];
        match self.dataserver.retrieve(class.datasource(), &filters).await {
            Ok(payload) => hazard_texts(class, &payload),
            Err(e) => {
                warn!("{} query failed, treating as empty: {:#}", class.label(), e);
                Vec::new()
            }
        }
    }
}

/// Advisory texts of one class, duplicates dropped, first occurrence kept
#[must_use]
pub fn hazard_texts(class: HazardClass, payload: &Value) -> Vec<String> {
    let mut texts: Vec<String> = Vec::new();
    for record in records(payload, class.entity()) {
        if let Some(text) = record.text(class.text_keys()) {
            if !texts.contains(&text) {
                texts.push(text);
            }
        }
    }
    texts
}

fn compose(classes: &[(HazardClass, Vec<String>)]) -> String {
    classes
        .iter()
        .filter(|(_, texts)| !texts.is_empty())
        .map(|(class, texts)| format!("{}\n{}", class.label(), texts.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sigmet_texts_from_features() {
        let payload = json!({"features": [
            {"properties": {"raw_text": "SIGMET A1 VALID"}},
            {"properties": {"description": "EMBD TS"}},
            {"properties": {"raw_text": "SIGMET A1 VALID"}},
            {"properties": {"hazard": "IGNORED FOR SIGMET"}}
        ]});
        assert_eq!(
            hazard_texts(HazardClass::Sigmet, &payload),
            vec!["SIGMET A1 VALID", "EMBD TS"]
        );
    }

    #[test]
    fn test_airmet_texts_from_nested_shape() {
        let payload = json!({"airsigmet": {"data": [
            {"hazard": "TURB"},
            {"message": "IFR CIG BLW 010"},
            {"raw_text": null, "hazard": "ICE"}
        ]}});
        assert_eq!(
            hazard_texts(HazardClass::Airmet, &payload),
            vec!["TURB", "IFR CIG BLW 010", "ICE"]
        );
    }

    #[test]
    fn test_compose_empty() {
        let composed = compose(&[
            (HazardClass::Sigmet, Vec::new()),
            (HazardClass::Airmet, Vec::new()),
        ]);
        assert_eq!(composed, "");
    }

    #[test]
    fn test_compose_single_class() {
        let composed = compose(&[
            (HazardClass::Sigmet, Vec::new()),
            (HazardClass::Airmet, vec!["TURB".to_string(), "ICE".to_string()]),
        ]);
        assert_eq!(composed, "AIRMETs:\nTURB\nICE");
    }

    #[test]
    fn test_compose_keeps_class_order() {
        let composed = compose(&[
            (HazardClass::Sigmet, vec!["S1".to_string()]),
            (HazardClass::Airmet, vec!["A1".to_string()]),
        ]);
        assert_eq!(composed, "SIGMETs:\nS1\n\nAIRMETs:\nA1");
    }
}
