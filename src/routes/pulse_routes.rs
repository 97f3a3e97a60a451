//! HTTP routes for the pulse API
//!
//! - POST /api/v1/pulse          - run a pulse search (authenticated)
//! - GET  /api/v1/history/recent - recent distinct areas (authenticated)
//! - GET  /api/v1/areas          - known neighborhoods with coordinates

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{extract_bearer_token, Session};
use crate::pulse::types::{title_case, WeatherReading};
use crate::pulse::{known_areas, KnownArea};
use crate::routes::{
    cors_preflight, error_response, get_auth_header, json_response, parse_json_body, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;
use crate::vibe::MoodLabel;

/// Place recommendations shown to the user
const TOP_SPOT_LIMIT: usize = 3;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PulseRequest {
    pub area: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseResponse {
    /// Normalized (lower-cased) area the pulse was taken for
    pub area: String,
    /// Title-cased area for display
    pub display_name: String,
    /// Current weather, absent when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReading>,
    pub mood: MoodLabel,
    pub mood_caption: &'static str,
    /// Markdown summary (or inline error / no-data text)
    pub summary: String,
    /// Up to 3 formatted place strings
    pub top_spots: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentArea {
    pub area: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct RecentAreasResponse {
    pub areas: Vec<RecentArea>,
}

#[derive(Debug, Serialize)]
pub struct KnownAreasResponse {
    pub areas: Vec<KnownArea>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Resolve the caller's session or produce a 401 response
fn require_session(
    req: &Request<hyper::body::Incoming>,
    state: &AppState,
) -> Result<Session, Response<BoxBody>> {
    extract_bearer_token(get_auth_header(req))
        .and_then(|token| state.sessions.get(token))
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Login required"))
}

/// POST /api/v1/pulse
async fn handle_pulse(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let session = match require_session(&req, &state) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let body: PulseRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.pulse.take_pulse(&session.email, &body.area).await {
        Ok(outcome) => {
            let top_spots = outcome
                .buckets
                .places
                .iter()
                .take(TOP_SPOT_LIMIT)
                .cloned()
                .collect();

            json_response(
                StatusCode::OK,
                &PulseResponse {
                    area: outcome.query.area().to_string(),
                    display_name: outcome.query.display_name(),
                    weather: outcome.buckets.weather.clone(),
                    mood: outcome.report.mood,
                    mood_caption: outcome.report.mood.caption(),
                    summary: outcome.report.summary,
                    top_spots,
                },
            )
        }
        Err(e) => {
            let (status, message) = e.into_status_code_and_body();
            error_response(status, message)
        }
    }
}

/// GET /api/v1/history/recent
async fn handle_recent_areas(
    req: &Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let session = match require_session(req, &state) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let areas = state
        .pulse
        .recent_areas(&session.email)
        .await
        .into_iter()
        .map(|area| RecentArea {
            display: title_case(&area),
            area,
        })
        .collect();

    json_response(StatusCode::OK, &RecentAreasResponse { areas })
}

/// GET /api/v1/areas
fn handle_known_areas() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &KnownAreasResponse {
            areas: known_areas(),
        },
    )
}

// =============================================================================
// Dispatch
// =============================================================================

/// Route /api/v1/* requests; returns None for paths outside /api/v1
pub async fn handle_api_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/api/v1") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = path.split('?').next().unwrap_or(path).to_string();

    let response = match (method, path.as_str()) {
        (&Method::POST, "/api/v1/pulse") => handle_pulse(req, state).await,
        (&Method::GET, "/api/v1/history/recent") => handle_recent_areas(&req, state).await,
        (&Method::GET, "/api/v1/areas") => handle_known_areas(),

        (_, "/api/v1/pulse") | (_, "/api/v1/history/recent") | (_, "/api/v1/areas") => {
            json_response(
                StatusCode::METHOD_NOT_ALLOWED,
                &ErrorResponse {
                    error: "Method not allowed".into(),
                },
            )
        }

        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "API endpoint not found".into(),
            },
        ),
    };

    Some(response)
}
