//! Shared fixtures: a local fake of every upstream and a recording generator
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use wxbrief::{BriefingError, GenerationRequest, TextGenerator, WxBriefConfig};

/// Canned upstream bodies; `None` answers HTTP 500
#[derive(Clone, Default)]
pub struct Canned {
    pub metar: Option<String>,
    pub taf: Option<String>,
    pub sigmet: Option<Value>,
    pub airmet: Option<Value>,
    pub stations: Option<Value>,
    pub geocode: Option<Value>,
}

#[derive(Default)]
pub struct FakeState {
    canned: Canned,
    requests: Mutex<Vec<String>>,
    geocode_queries: Mutex<Vec<String>>,
}

impl FakeState {
    fn record(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }
}

pub struct FakeUpstream {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeUpstream {
    pub async fn start(canned: Canned) -> Self {
        let state = Arc::new(FakeState {
            canned,
            ..FakeState::default()
        });

        let app = Router::new()
            .route("/api/data/metar", get(metar))
            .route("/api/data/taf", get(taf))
            .route("/dataserver", get(dataserver))
            .route("/geocode", get(geocode))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Config pointing every source at this fake, geocoding unthrottled
    pub fn config(&self) -> WxBriefConfig {
        let mut config = WxBriefConfig::default();
        config.upstream.data_api_url = format!("http://{}/api/data", self.addr);
        config.upstream.dataserver_url = format!("http://{}/dataserver", self.addr);
        config.upstream.timeout_seconds = 5;
        config.geocoding.url = format!("http://{}/geocode", self.addr);
        config.geocoding.min_interval_ms = 0;
        config
    }

    /// Requests seen so far, e.g. `"metar VABB,VOMM 2"` or `"stations VABB"`
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn geocode_queries(&self) -> Vec<String> {
        self.state.geocode_queries.lock().unwrap().clone()
    }
}

type Params = Query<HashMap<String, String>>;

fn param(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).cloned().unwrap_or_default()
}

fn text_or_500(body: &Option<String>) -> Response {
    match body {
        Some(text) => text.clone().into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn json_or_500(body: &Option<Value>) -> Response {
    match body {
        Some(value) => Json(value.clone()).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn metar(State(state): State<Arc<FakeState>>, Query(params): Params) -> Response {
    state.record(format!("metar {} {}", param(&params, "ids"), param(&params, "hours")));
    text_or_500(&state.canned.metar)
}

async fn taf(State(state): State<Arc<FakeState>>, Query(params): Params) -> Response {
    state.record(format!("taf {} {}", param(&params, "ids"), param(&params, "hours")));
    text_or_500(&state.canned.taf)
}

async fn dataserver(State(state): State<Arc<FakeState>>, Query(params): Params) -> Response {
    let datasource = param(&params, "datasource");
    match datasource.as_str() {
        "stations" => {
            state.record(format!("stations {}", param(&params, "stationstring")));
            json_or_500(&state.canned.stations)
        }
        "sigmet" => {
            state.record(format!("sigmet {}", param(&params, "hoursBeforeNow")));
            json_or_500(&state.canned.sigmet)
        }
        "airsigmets" => {
            state.record(format!("airmet {}", param(&params, "hoursBeforeNow")));
            json_or_500(&state.canned.airmet)
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn geocode(State(state): State<Arc<FakeState>>, Query(params): Params) -> Response {
    state
        .geocode_queries
        .lock()
        .unwrap()
        .push(param(&params, "q"));
    json_or_500(&state.canned.geocode)
}

/// Generator that records every request and answers with a fixed reply
pub struct RecordingGenerator {
    reply: std::result::Result<String, String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, request: GenerationRequest) -> wxbrief::Result<String> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(BriefingError::generation(message.clone())),
        }
    }
}

pub const SECTIONED_BRIEFING: &str = concat!(
    "<section id=\"summary\"><h2>Summary</h2><ul><li>VFR at both airports</li></ul></section>\n",
    "<section id=\"recommendations\"><h2>Recommendations</h2><ul><li>VABB to VOMM: go</li></ul></section>\n",
    "<section id=\"per-airport\"><h2>Per-Airport Conditions</h2><ul><li>VABB: clear</li></ul></section>"
);

pub const VABB_METAR: &str = "METAR VABB 010830Z 27010KT 6000 NSC 32/24 Q1008";
pub const VOMM_METAR: &str = "METAR VOMM 010830Z 09008KT 8000 FEW020 33/25 Q1007";
pub const VABB_TAF: &str = "TAF VABB 010500Z 0106/0212 27012KT 6000 NSC";

pub fn station_features() -> Value {
    serde_json::json!({"features": [
        {
            "properties": {"station_id": "VABB", "site": "Mumbai Chhatrapati Shivaji Intl"},
            "geometry": {"type": "Point", "coordinates": [72.8679, 19.0887]}
        },
        {
            "properties": {"station_id": "VOMM", "site": "Chennai Intl"},
            "geometry": {"type": "Point", "coordinates": [80.1709, 12.9941]}
        }
    ]})
}

pub fn sigmet_features() -> Value {
    serde_json::json!({"features": [
        {"properties": {"raw_text": "VABF SIGMET 1 VALID 010600/011000 EMBD TS"}},
        {"properties": {"raw_text": "VABF SIGMET 1 VALID 010600/011000 EMBD TS"}}
    ]})
}

/// Upstream with every source answering for VABB/VOMM
pub fn full_canned() -> Canned {
    Canned {
        metar: Some(format!("{VABB_METAR}\n{VOMM_METAR}\n")),
        taf: Some(VABB_TAF.to_string()),
        sigmet: Some(sigmet_features()),
        airmet: Some(serde_json::json!({"features": []})),
        stations: Some(station_features()),
        geocode: None,
    }
}
