//! Pulse orchestration service
//!
//! One entry point per user search: normalize the area, fan out the four
//! lookups, summarize, then append the search to history. The generative
//! call and the history append run strictly after the fan-out barrier,
//! sequentially. History failures never fail the search.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::history::{HistoryStore, RECENT_AREA_LIMIT};
use crate::pulse::coordinator::FanOutCoordinator;
use crate::pulse::types::{AreaQuery, LookupBuckets};
use crate::types::Result;
use crate::vibe::{VibeReport, VibeSummarizer};

/// Everything one pulse search produced
pub struct PulseOutcome {
    pub query: AreaQuery,
    pub buckets: LookupBuckets,
    pub report: VibeReport,
}

/// Orchestrates a full pulse search for an authenticated user
pub struct PulseService {
    coordinator: FanOutCoordinator,
    summarizer: VibeSummarizer,
    history: Arc<dyn HistoryStore>,
    city: String,
    country: String,
}

impl PulseService {
    pub fn new(
        coordinator: FanOutCoordinator,
        summarizer: VibeSummarizer,
        history: Arc<dyn HistoryStore>,
        city: String,
        country: String,
    ) -> Self {
        Self {
            coordinator,
            summarizer,
            history,
            city,
            country,
        }
    }

    /// Run the full pulse flow for one area search
    pub async fn take_pulse(&self, email: &str, raw_area: &str) -> Result<PulseOutcome> {
        let query = AreaQuery::new(raw_area, &self.city, &self.country)?;
        info!(email, area = %query.area(), "Taking the pulse");

        let buckets = self.coordinator.gather(&query).await;
        let report = self.summarizer.vibe_report(&query, &buckets).await;

        // Best-effort append: log and continue on failure
        if let Err(e) = self.history.append(email, query.area(), Utc::now()).await {
            warn!(email, area = %query.area(), error = %e, "History append failed");
        }

        Ok(PulseOutcome {
            query,
            buckets,
            report,
        })
    }

    /// Recent distinct areas for the sidebar; read failures yield an empty list
    pub async fn recent_areas(&self, email: &str) -> Vec<String> {
        match self.history.recent_areas(email, RECENT_AREA_LIMIT).await {
            Ok(areas) => areas,
            Err(e) => {
                warn!(email, error = %e, "History read failed");
                Vec::new()
            }
        }
    }
}
