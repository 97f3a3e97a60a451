//! Process-local session storage
//!
//! Maps opaque session tokens to decoded identities. Sessions live for the
//! lifetime of the process and are destroyed on explicit logout; there is no
//! refresh or expiry handling. CSRF `state` values for the login redirect
//! are single-use and expire after a few minutes.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use crate::auth::oidc::IdentityClaims;
use crate::types::{PulseError, Result};

/// How long a login `state` value stays valid
const STATE_TTL_MINUTES: i64 = 5;

/// One logged-in user
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque bearer token handed to the client
    pub token: String,
    pub email: String,
    pub name: String,
    /// Raw claims decoded from the provider's id_token
    pub claims: IdentityClaims,
    pub created_at: DateTime<Utc>,
}

/// In-memory session and pending-state store
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    pending_states: DashMap<String, DateTime<Utc>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a random CSRF state for a login redirect
    pub fn issue_state(&self) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        self.pending_states.insert(state.clone(), Utc::now());
        state
    }

    /// Consume a state value; valid exactly once, within the TTL
    pub fn consume_state(&self, state: &str) -> bool {
        self.consume_state_at(state, Utc::now())
    }

    fn consume_state_at(&self, state: &str, now: DateTime<Utc>) -> bool {
        match self.pending_states.remove(state) {
            Some((_, issued_at)) => now - issued_at <= Duration::minutes(STATE_TTL_MINUTES),
            None => false,
        }
    }

    /// Create a session from decoded identity claims.
    ///
    /// The email claim is required; the display name falls back to "User".
    pub fn create(&self, claims: IdentityClaims) -> Result<Session> {
        let email = claims
            .email
            .clone()
            .ok_or_else(|| PulseError::Auth("id_token missing email claim".into()))?;
        let name = claims.name.clone().unwrap_or_else(|| "User".to_string());

        let session = Session {
            token: Uuid::new_v4().to_string(),
            email,
            name,
            claims,
            created_at: Utc::now(),
        };
        self.sessions.insert(session.token.clone(), session.clone());

        Ok(session)
    }

    /// Look up a session by its bearer token
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Destroy a session; returns whether one existed
    pub fn destroy(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
