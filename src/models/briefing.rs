//! Weather bundle, pilot profile and briefing document types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three raw text sources handed to generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherBundle {
    pub metar: String,
    pub taf: String,
    pub hazards: String,
}

impl WeatherBundle {
    const METAR_LABEL: &'static str = "METARs:";
    const TAF_LABEL: &'static str = "TAFs:";
    const HAZARD_LABEL: &'static str = "Hazards(if any):";

    #[must_use]
    pub fn new(metar: String, taf: String, hazards: String) -> Self {
        Self {
            metar,
            taf,
            hazards,
        }
    }

    /// True when every source came back empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_blocks().next().is_none()
    }

    /// Number of sources that contributed text
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.present_blocks().count()
    }

    fn present_blocks(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (Self::METAR_LABEL, self.metar.trim()),
            (Self::TAF_LABEL, self.taf.trim()),
            (Self::HAZARD_LABEL, self.hazards.trim()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
    }

    /// Labeled blob in fixed order: METARs, TAFs, hazards. Absent sources leave no header.
    #[must_use]
    pub fn labeled_text(&self) -> String {
        self.present_blocks()
            .map(|(label, text)| format!("{label}\n{text}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Free-form steering parameter describing the audience of a briefing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PilotProfile(String);

impl PilotProfile {
    pub const DEFAULT: &'static str = "VFR";

    /// Trimmed request value, or `fallback` when absent or blank
    #[must_use]
    pub fn from_request(value: Option<&str>, fallback: &str) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(profile) => Self(profile.to_string()),
            None => Self::new(fallback),
        }
    }

    #[must_use]
    pub fn new(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::default()
        } else {
            Self(value.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PilotProfile {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for PilotProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed section identifiers of a briefing document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Summary,
    Recommendations,
    PerAirport,
}

impl SectionId {
    pub const ALL: [SectionId; 3] = [
        SectionId::Summary,
        SectionId::Recommendations,
        SectionId::PerAirport,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Summary => "summary",
            SectionId::Recommendations => "recommendations",
            SectionId::PerAirport => "per-airport",
        }
    }

    /// Heading text the generator is asked to use
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            SectionId::Summary => "Summary",
            SectionId::Recommendations => "Recommendations",
            SectionId::PerAirport => "Per-Airport Conditions",
        }
    }

    /// Attribute text whose presence marks the section in markup
    #[must_use]
    pub fn marker(self) -> String {
        format!("id=\"{}\"", self.as_str())
    }

    /// Wrap a fragment in this section's canonical element
    #[must_use]
    pub fn wrap(self, inner: &str) -> String {
        format!("<section {}>{inner}</section>", self.marker())
    }
}

/// Generated briefing markup after section normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingDocument {
    html: String,
}

impl BriefingDocument {
    #[must_use]
    pub fn from_html(html: String) -> Self {
        Self { html }
    }

    /// Document carrying the same readable error in every section
    #[must_use]
    pub fn error(message: &str) -> Self {
        let body = format!("<p class=\"error\">{}</p>", escape_html(message));
        let html = SectionId::ALL
            .iter()
            .map(|section| section.wrap(&body))
            .collect::<Vec<_>>()
            .join("\n");
        Self { html }
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    #[must_use]
    pub fn has_section(&self, section: SectionId) -> bool {
        self.html.contains(&section.marker())
    }

    /// Sections present, in canonical order
    #[must_use]
    pub fn sections(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|section| self.has_section(*section))
            .collect()
    }

    /// Markup wrapped for delivery to the presentation layer
    #[must_use]
    pub fn delivery_html(&self) -> String {
        format!("<div class=\"weather-brief\">\n{}\n</div>", self.html)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
