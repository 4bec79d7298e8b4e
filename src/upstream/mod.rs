//! Upstream aviation data sources
//!
//! Every component here degrades instead of failing: a transport error, a non-200 status or an
//! unreadable payload turns into an empty value at the component boundary and a log line.

pub mod dataserver;
pub mod geocoding;
pub mod hazards;
pub mod observations;
pub mod payload;
pub mod stations;

pub use dataserver::DataServerClient;
pub use geocoding::Geocoder;
pub use hazards::{HazardClass, HazardFetcher};
pub use observations::{ObservationFetcher, ReportKind};
pub use stations::StationDirectory;

use reqwest::Client;
use std::time::Duration;

use crate::{BriefingError, Result};

/// Build an HTTP client with the per-call timeout every upstream request carries
pub(crate) fn http_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| BriefingError::config(format!("Failed to create HTTP client: {e}")))
}
