//! Data models for the briefing service
//!
//! This module contains the request-scoped value types:
//! - Station: identifiers, resolved metadata and name directories
//! - Briefing: raw weather bundle, pilot profile and the normalized document
//! - Route: legs between consecutive stations

pub mod briefing;
pub mod route;
pub mod station;

// Re-export all public types for convenient access
pub use briefing::{BriefingDocument, PilotProfile, SectionId, WeatherBundle};
pub use route::{RouteLeg, legs, measured_legs};
pub use station::{StationIdentifier, StationNames, StationRecord};
