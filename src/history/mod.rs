//! Per-user search history
//!
//! Append-only log of (email, area, timestamp) records with one aggregate
//! read: the distinct areas among a user's most recent searches. Append
//! failures are logged and swallowed by the caller; the pulse flow never
//! depends on history writes succeeding.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::Result;

pub use memory::MemoryHistoryStore;
pub use mongo::MongoHistoryStore;

/// How many raw records the recent-areas query considers
pub const RECENT_AREA_LIMIT: usize = 5;

/// Append-only search history store
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Record one search. Records are immutable once written.
    async fn append(&self, email: &str, area: &str, timestamp: DateTime<Utc>) -> Result<()>;

    /// Distinct `area` values among the user's `limit` most recent raw
    /// records. Deduplication happens after the limit, so duplicates among
    /// the newest records shrink the returned set below `limit`.
    async fn recent_areas(&self, email: &str, limit: usize) -> Result<Vec<String>>;
}
