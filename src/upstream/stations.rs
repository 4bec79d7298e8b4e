//! Station directory: identifier → display name and coordinates
//!
//! Results always carry one entry per requested identifier, in request order, whether or not
//! the data server knew the station. A data server failure degrades to unresolved entries.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::payload::records;
use super::{DataServerClient, Geocoder};
use crate::Result;
use crate::config::WxBriefConfig;
use crate::models::station::{comma_joined, distinct};
use crate::models::{StationIdentifier, StationNames, StationRecord};

const IDENTIFIER_KEYS: &[&str] = &["station_id", "icao_site", "icao_code", "icaoId"];
const NAME_KEYS: &[&str] = &["site", "station_name", "name"];
const LATITUDE_KEYS: &[&str] = &["latitude", "lat", "latitude_deg", "latitude_degN"];
const LONGITUDE_KEYS: &[&str] = &["longitude", "lon", "longitude_deg", "longitude_degE"];

pub struct StationDirectory {
    dataserver: DataServerClient,
    geocoder: Geocoder,
}

impl StationDirectory {
    pub fn new(config: &WxBriefConfig) -> Result<Self> {
        Ok(Self {
            dataserver: DataServerClient::new(&config.upstream)?,
            geocoder: Geocoder::new(&config.upstream, &config.geocoding)?,
        })
    }

    /// Display names for every requested identifier; unknown stations map to `""`
    #[instrument(skip(self, identifiers), fields(stations = %comma_joined(identifiers)))]
    pub async fn resolve_names(&self, identifiers: &[StationIdentifier]) -> StationNames {
        let requested = distinct(identifiers);
        if requested.is_empty() {
            return StationNames::default();
        }

        match self.lookup(&requested).await {
            Ok(found) => requested
                .into_iter()
                .map(|identifier| {
                    let name = found
                        .iter()
                        .find(|record| record.identifier == identifier)
                        .map(|record| record.name.clone())
                        .unwrap_or_default();
                    (identifier, name)
                })
                .collect(),
            Err(e) => {
                warn!("Station lookup failed, names left unresolved: {:#}", e);
                StationNames::unresolved(&requested)
            }
        }
    }

    /// Records for every requested identifier in request order
    ///
    /// Stations the data server left without coordinates get one geocoding lookup each,
    /// issued sequentially.
    #[instrument(skip(self, identifiers), fields(stations = %comma_joined(identifiers)))]
    pub async fn resolve_coordinates(&self, identifiers: &[StationIdentifier]) -> Vec<StationRecord> {
        let requested = distinct(identifiers);
        if requested.is_empty() {
            return Vec::new();
        }

        let found = match self.lookup(&requested).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Station lookup failed, coordinates left unresolved: {:#}", e);
                return requested.into_iter().map(StationRecord::unresolved).collect();
            }
        };

        let mut out: Vec<StationRecord> = requested
            .into_iter()
            .map(|identifier| {
                found
                    .iter()
                    .find(|record| record.identifier == identifier)
                    .cloned()
                    .unwrap_or_else(|| StationRecord::unresolved(identifier))
            })
            .collect();

        let mut filled = 0usize;
        for record in out.iter_mut().filter(|record| !record.has_coordinates()) {
            let query = format!("airport {}", record.identifier);
            if let Some((lat, lon)) = self.geocoder.locate(&query).await {
                record.latitude = Some(lat);
                record.longitude = Some(lon);
                filled += 1;
            }
        }

        info!(
            resolved = out.iter().filter(|record| record.has_coordinates()).count(),
            geocoded = filled,
            "Station coordinates resolved"
        );
        out
    }

    async fn lookup(&self, requested: &[StationIdentifier]) -> anyhow::Result<Vec<StationRecord>> {
        let payload = self
            .dataserver
            .retrieve("stations", &[("stationstring", comma_joined(requested))])
            .await?;
        let found = parse_station_records(&payload);
        debug!(records = found.len(), "Station payload parsed");
        Ok(found)
    }
}

/// Station rows from either payload shape; the first row per identifier wins
#[must_use]
pub fn parse_station_records(payload: &Value) -> Vec<StationRecord> {
    let mut out: Vec<StationRecord> = Vec::new();

    for record in records(payload, "stations") {
        let Some(identifier) = record
            .text(IDENTIFIER_KEYS)
            .and_then(|raw| StationIdentifier::parse(&raw).ok())
        else {
            continue;
        };
        if out.iter().any(|existing| existing.identifier == identifier) {
            continue;
        }

        let mut latitude = record.number(LATITUDE_KEYS);
        let mut longitude = record.number(LONGITUDE_KEYS);
        if latitude.is_none() || longitude.is_none() {
            let (geometry_lon, geometry_lat) = record.geometry_point();
            latitude = latitude.or(geometry_lat);
            longitude = longitude.or(geometry_lon);
        }

        out.push(StationRecord {
            identifier,
            name: record.text(NAME_KEYS).unwrap_or_default(),
            latitude,
            longitude,
        });
    }

    out
}
