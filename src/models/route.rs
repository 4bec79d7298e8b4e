//! Route legs between consecutive stations

use haversine::{Location as HaversineLocation, Units, distance};
use serde::Serialize;

use super::{StationIdentifier, StationRecord};

/// Consecutive pair of stations in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: StationIdentifier,
    pub to: StationIdentifier,
    /// Great-circle distance, when both ends have coordinates
    pub distance_km: Option<f64>,
}

/// Legs for an identifier sequence; fewer than two stations yield none
#[must_use]
pub fn legs(identifiers: &[StationIdentifier]) -> Vec<(StationIdentifier, StationIdentifier)> {
    identifiers
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Legs with distances taken from resolved records
#[must_use]
pub fn measured_legs(identifiers: &[StationIdentifier], records: &[StationRecord]) -> Vec<RouteLeg> {
    let coordinates_of = |identifier: &StationIdentifier| {
        records
            .iter()
            .find(|record| &record.identifier == identifier)
            .and_then(StationRecord::coordinates)
    };

    legs(identifiers)
        .into_iter()
        .map(|(from, to)| {
            let distance_km = match (coordinates_of(&from), coordinates_of(&to)) {
                (Some(a), Some(b)) => Some(calculate_distance(a, b)),
                _ => None,
            };
            RouteLeg {
                from,
                to,
                distance_km,
            }
        })
        .collect()
}

fn calculate_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.0,
        longitude: from.1,
    };
    let to_haversine = HaversineLocation {
        latitude: to.0,
        longitude: to.1,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationIdentifier {
        StationIdentifier::parse(s).unwrap()
    }

    #[test]
    fn test_legs_are_consecutive_pairs() {
        let ids = vec![id("VABB"), id("VOMM"), id("VIDP")];
        let pairs = legs(&ids);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (id("VABB"), id("VOMM")));
        assert_eq!(pairs[1], (id("VOMM"), id("VIDP")));
        assert!(legs(&ids[..1]).is_empty());
    }

    #[test]
    fn test_measured_legs_distance() {
        let ids = vec![id("VABB"), id("VOMM"), id("ZZZZ")];
        let records = vec![
            StationRecord {
                identifier: id("VABB"),
                name: String::new(),
                latitude: Some(19.0887),
                longitude: Some(72.8679),
            },
            StationRecord {
                identifier: id("VOMM"),
                name: String::new(),
                latitude: Some(12.9941),
                longitude: Some(80.1709),
            },
            StationRecord::unresolved(id("ZZZZ")),
        ];
        let measured = measured_legs(&ids, &records);
        let first = measured[0].distance_km.unwrap();
        // Mumbai to Chennai is roughly 1030 km
        assert!((1000.0..1060.0).contains(&first), "got {first}");
        assert!(measured[1].distance_km.is_none());
    }
}
