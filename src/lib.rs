//! CityPulse - neighborhood vibe aggregation gateway
//!
//! Aggregates news, web-search context, local places, and weather for a
//! neighborhood, summarizes the result sets with a generative-text service,
//! and keeps per-user search history.
//!
//! ## Services
//!
//! - **Adapters**: one client per external data source, isolated failures
//! - **Fan-out**: concurrent lookups joined at a wait-for-all barrier
//! - **Vibe**: prompt composition, summarization, mood classification
//! - **History**: append-only per-user search log (MongoDB or in-memory)
//! - **Auth**: delegated OIDC login with process-local sessions

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod history;
pub mod pulse;
pub mod routes;
pub mod server;
pub mod types;
pub mod vibe;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{PulseError, Result};
