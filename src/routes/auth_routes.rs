//! HTTP routes for the session/identity gate
//!
//! - GET  /auth/login     - redirect the browser to the identity provider
//! - GET  /auth/callback  - code exchange, session creation
//! - GET  /auth/me        - current session identity
//! - POST /auth/logout    - destroy the session
//! - POST /auth/dev-login - dev-mode session without a provider

use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{decode_identity, extract_bearer_token, IdentityClaims};
use crate::routes::{
    cors_preflight, empty_body, error_response, get_auth_header, json_response, BoxBody,
    ErrorResponse, SuccessResponse,
};
use crate::server::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters the provider sends to the callback
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session_token: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub email: String,
    pub name: String,
    pub created_at: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /auth/login
///
/// Issues a CSRF state and redirects the browser to the provider's
/// authorize endpoint.
fn handle_login(state: Arc<AppState>) -> Response<BoxBody> {
    let Some(ref oidc) = state.oidc else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Identity provider not configured",
        );
    };

    let login_state = state.sessions.issue_state();
    let url = oidc.authorize_url(&login_state);

    Response::builder()
        .status(StatusCode::FOUND)
        .header("Location", url)
        .header("Access-Control-Allow-Origin", "*")
        .body(empty_body())
        .unwrap()
}

/// GET /auth/callback?code=...&state=...
///
/// Exchanges the authorization code for tokens, decodes the id_token claims
/// and mints a session token. Any failure leaves the caller logged out.
async fn handle_callback(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let Some(ref oidc) = state.oidc else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Identity provider not configured",
        );
    };

    let query: CallbackQuery = match serde_urlencoded::from_str(req.uri().query().unwrap_or("")) {
        Ok(q) => q,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid query: {}", e));
        }
    };

    if let Some(provider_error) = query.error {
        warn!(
            error = %provider_error,
            description = ?query.error_description,
            "Provider returned an error on callback"
        );
        return error_response(
            StatusCode::UNAUTHORIZED,
            format!("Login failed: {}", provider_error),
        );
    }

    let Some(code) = query.code else {
        return error_response(StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    let state_valid = query
        .state
        .as_deref()
        .map(|s| state.sessions.consume_state(s))
        .unwrap_or(false);
    if !state_valid {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid or expired login state");
    }

    let tokens = match oidc.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!(error = %e, "Code exchange failed");
            return error_response(StatusCode::UNAUTHORIZED, e.to_string());
        }
    };

    let claims = match decode_identity(&tokens.id_token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "id_token decode failed");
            return error_response(StatusCode::UNAUTHORIZED, e.to_string());
        }
    };

    let session = match state.sessions.create(claims) {
        Ok(session) => session,
        Err(e) => {
            return error_response(StatusCode::UNAUTHORIZED, e.to_string());
        }
    };

    info!(email = %session.email, "User logged in");

    json_response(
        StatusCode::OK,
        &AuthResponse {
            session_token: session.token,
            email: session.email,
            name: session.name,
        },
    )
}

/// POST /auth/logout
fn handle_logout(req: &Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let Some(token) = extract_bearer_token(get_auth_header(req)) else {
        return error_response(StatusCode::UNAUTHORIZED, "Missing session token");
    };

    if state.sessions.destroy(token) {
        json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "Logged out".into(),
            },
        )
    } else {
        error_response(StatusCode::UNAUTHORIZED, "Unknown session token")
    }
}

/// GET /auth/me
fn handle_me(req: &Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let session = extract_bearer_token(get_auth_header(req)).and_then(|t| state.sessions.get(t));

    match session {
        Some(session) => json_response(
            StatusCode::OK,
            &MeResponse {
                email: session.email,
                name: session.name,
                created_at: session.created_at.to_rfc3339(),
            },
        ),
        None => error_response(StatusCode::UNAUTHORIZED, "Not logged in"),
    }
}

/// POST /auth/dev-login
///
/// Dev-mode only: mint a session without going through the provider.
fn handle_dev_login(state: Arc<AppState>) -> Response<BoxBody> {
    if !state.args.dev_mode {
        return error_response(StatusCode::NOT_FOUND, "Auth endpoint not found");
    }

    let claims = IdentityClaims {
        email: Some("dev@localhost".into()),
        name: Some("Dev User".into()),
        sub: Some("dev|local".into()),
    };

    match state.sessions.create(claims) {
        Ok(session) => json_response(
            StatusCode::OK,
            &AuthResponse {
                session_token: session.token,
                email: session.email,
                name: session.name,
            },
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Route /auth/* requests; returns None for paths outside /auth
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/auth") {
        return None;
    }

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path).to_string();

    let response = match (method, path.as_str()) {
        (&Method::GET, "/auth/login") => handle_login(state),
        (&Method::GET, "/auth/callback") => handle_callback(req, state).await,
        (&Method::POST, "/auth/logout") => handle_logout(&req, state),
        (&Method::GET, "/auth/me") => handle_me(&req, state),
        (&Method::POST, "/auth/dev-login") => handle_dev_login(state),

        // Method not allowed
        (_, "/auth/login") | (_, "/auth/callback") | (_, "/auth/logout") | (_, "/auth/me")
        | (_, "/auth/dev-login") => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse {
                error: "Method not allowed".into(),
            },
        ),

        // Auth endpoint not found
        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "Auth endpoint not found".into(),
            },
        ),
    };

    Some(response)
}
