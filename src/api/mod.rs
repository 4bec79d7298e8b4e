use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::generation::ReportFieldBias;
use crate::identifiers;
use crate::models::{PilotProfile, RouteLeg, StationIdentifier, StationRecord};
use crate::service::{Briefing, BriefingService, ProcessOutcome};
use crate::{BriefingError, VERSION};

type SharedService = Arc<BriefingService>;

#[derive(Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: String,
    pub pilot_profile: Option<String>,
}

#[derive(Deserialize)]
pub struct BriefingRequest {
    #[serde(default, alias = "text")]
    pub icao_codes: String,
    pub pilot_profile: Option<String>,
}

#[derive(Deserialize)]
pub struct PirepRequest {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub bias: ReportFieldBias,
}

/// Identifiers either as a JSON array or as one comma/space separated string
#[derive(Deserialize)]
#[serde(untagged)]
pub enum CodeList {
    List(Vec<String>),
    Text(String),
}

impl Default for CodeList {
    fn default() -> Self {
        CodeList::List(Vec::new())
    }
}

impl CodeList {
    fn parse(&self) -> crate::Result<Vec<StationIdentifier>> {
        match self {
            CodeList::List(codes) => codes
                .iter()
                .map(|code| code.trim())
                .filter(|code| !code.is_empty())
                .map(StationIdentifier::parse)
                .collect(),
            CodeList::Text(text) => identifiers::normalize(text),
        }
    }
}

#[derive(Deserialize)]
pub struct CoordsRequest {
    #[serde(default)]
    pub icao_codes: CodeList,
}

#[derive(Serialize)]
pub struct BriefingResponse {
    pub summary: String,
    pub icao_codes: Vec<StationIdentifier>,
    pub pilot_profile: PilotProfile,
}

impl From<Briefing> for BriefingResponse {
    fn from(briefing: Briefing) -> Self {
        Self {
            summary: briefing.document.delivery_html(),
            icao_codes: briefing.identifiers,
            pilot_profile: briefing.profile,
        }
    }
}

#[derive(Serialize)]
pub struct PirepResponse {
    pub pirep: String,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProcessResponse {
    Briefing(BriefingResponse),
    Pirep(PirepResponse),
}

#[derive(Serialize)]
pub struct CoordsResponse {
    pub coords: Vec<StationRecord>,
    pub legs: Vec<RouteLeg>,
}

/// Error rendered as `{"error": ...}` with a status chosen by kind
pub struct ApiError(BriefingError);

impl From<BriefingError> for ApiError {
    fn from(err: BriefingError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            BriefingError::Validation { .. } => StatusCode::BAD_REQUEST,
            BriefingError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/process", post(process))
        .route("/briefing", post(briefing))
        .route("/pirep", post(pirep))
        .route("/coords", post(coords))
        .route("/health", get(health))
        .with_state(service)
}

async fn process(
    State(service): State<SharedService>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let outcome = service
        .process(&request.text, request.pilot_profile.as_deref())
        .await?;
    let response = match outcome {
        ProcessOutcome::Briefing(briefing) => ProcessResponse::Briefing(briefing.into()),
        ProcessOutcome::Report(pirep) => ProcessResponse::Pirep(PirepResponse { pirep }),
    };
    Ok(Json(response))
}

async fn briefing(
    State(service): State<SharedService>,
    Json(request): Json<BriefingRequest>,
) -> Result<Json<BriefingResponse>, ApiError> {
    let briefing = service
        .brief(&request.icao_codes, request.pilot_profile.as_deref())
        .await?;
    Ok(Json(briefing.into()))
}

async fn pirep(
    State(service): State<SharedService>,
    Json(request): Json<PirepRequest>,
) -> Result<Json<PirepResponse>, ApiError> {
    let pirep = service
        .convert_report(&request.text, Some(request.bias))
        .await?;
    Ok(Json(PirepResponse { pirep }))
}

async fn coords(
    State(service): State<SharedService>,
    Json(request): Json<CoordsRequest>,
) -> Result<Json<CoordsResponse>, ApiError> {
    let identifiers = request.icao_codes.parse()?;
    let route = service.coordinates(&identifiers).await;
    Ok(Json(CoordsResponse {
        coords: route.coords,
        legs: route.legs,
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}
