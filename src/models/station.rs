//! Station identifiers and resolved station metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BriefingError;

/// Four-letter ICAO station identifier, always upper case ASCII
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationIdentifier(String);

impl StationIdentifier {
    /// Length of every identifier
    pub const LEN: usize = 4;

    /// Parse a single token, case-insensitively
    pub fn parse(token: &str) -> Result<Self, BriefingError> {
        if token.len() == Self::LEN && token.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(token.to_ascii_uppercase()))
        } else {
            Err(BriefingError::validation(format!(
                "'{token}' is not a 4-letter ICAO code"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StationIdentifier {
    type Err = BriefingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StationIdentifier {
    type Error = BriefingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationIdentifier> for String {
    fn from(value: StationIdentifier) -> Self {
        value.0
    }
}

impl AsRef<str> for StationIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join identifiers the way the upstream query parameters expect them
#[must_use]
pub fn comma_joined(identifiers: &[StationIdentifier]) -> String {
    identifiers
        .iter()
        .map(StationIdentifier::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Distinct identifiers in first-seen order
#[must_use]
pub fn distinct(identifiers: &[StationIdentifier]) -> Vec<StationIdentifier> {
    let mut out: Vec<StationIdentifier> = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        if !out.contains(identifier) {
            out.push(identifier.clone());
        }
    }
    out
}

/// Resolved station metadata; name and coordinates may stay unknown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(rename = "icao")]
    pub identifier: StationIdentifier,
    /// Display name, empty when unresolved
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,
}

impl StationRecord {
    /// Record with nothing resolved yet
    #[must_use]
    pub fn unresolved(identifier: StationIdentifier) -> Self {
        Self {
            identifier,
            name: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Both coordinates, if resolved
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Identifier to display-name mapping, kept in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationNames(Vec<(StationIdentifier, String)>);

impl StationNames {
    /// Every identifier mapped to an empty name
    #[must_use]
    pub fn unresolved(identifiers: &[StationIdentifier]) -> Self {
        Self(
            distinct(identifiers)
                .into_iter()
                .map(|id| (id, String::new()))
                .collect(),
        )
    }

    /// Name for an identifier; `Some("")` when requested but unresolved
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(id, _)| id.as_str() == identifier)
            .map(|(_, name)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StationIdentifier, &str)> {
        self.0.iter().map(|(id, name)| (id, name.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `IDENT: Name` per line, bare `IDENT:` when the name is unknown
    #[must_use]
    pub fn directory_listing(&self) -> String {
        self.0
            .iter()
            .map(|(id, name)| {
                if name.is_empty() {
                    format!("{id}:")
                } else {
                    format!("{id}: {name}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(StationIdentifier, String)> for StationNames {
    fn from_iter<T: IntoIterator<Item = (StationIdentifier, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationIdentifier {
        StationIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(id("vabb").as_str(), "VABB");
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(StationIdentifier::parse("VAB").is_err());
        assert!(StationIdentifier::parse("VABB1").is_err());
        assert!(StationIdentifier::parse("VA1B").is_err());
        assert!(StationIdentifier::parse("").is_err());
        assert!(StationIdentifier::parse("ÄBCD").is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let parsed: StationIdentifier = serde_json::from_str("\"vomm\"").unwrap();
        assert_eq!(parsed.as_str(), "VOMM");
        assert!(serde_json::from_str::<StationIdentifier>("\"VOM\"").is_err());
    }

    #[test]
    fn test_comma_joined_and_distinct() {
        let ids = vec![id("VABB"), id("VOMM"), id("VABB")];
        assert_eq!(comma_joined(&ids), "VABB,VOMM,VABB");
        assert_eq!(distinct(&ids), vec![id("VABB"), id("VOMM")]);
    }

    #[test]
    fn test_record_serializes_with_short_keys() {
        let record = StationRecord {
            identifier: id("VABB"),
            name: "Mumbai".to_string(),
            latitude: Some(19.09),
            longitude: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["icao"], "VABB");
        assert_eq!(value["lat"], 19.09);
        assert!(value["lon"].is_null());
        assert!(!record.has_coordinates());
    }

    #[test]
    fn test_directory_listing_bare_colon_for_unknown() {
        let names: StationNames = vec![
            (id("VABB"), "Chhatrapati Shivaji Intl".to_string()),
            (id("ZZZZ"), String::new()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            names.directory_listing(),
            "VABB: Chhatrapati Shivaji Intl\nZZZZ:"
        );
        assert_eq!(names.get("ZZZZ"), Some(""));
        assert_eq!(names.get("KJFK"), None);
    }
}
