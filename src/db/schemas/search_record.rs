//! Search record schema
//!
//! One document per pulse search. Records are append-only: they are never
//! updated or deleted once written.

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for search history
pub const HISTORY_COLLECTION: &str = "history";

/// Search record stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SearchRecordDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// User email the search belongs to
    #[serde(default)]
    pub email: String,

    /// Lower-cased neighborhood name that was searched
    #[serde(default)]
    pub area: String,

    /// When the search was made (UTC)
    #[serde(default = "default_timestamp", with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl SearchRecordDoc {
    /// Create a new search record
    pub fn new(email: String, area: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            metadata: Metadata::new(),
            email,
            area,
            timestamp,
        }
    }
}

impl IntoIndexes for SearchRecordDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Recent-history queries filter by email and sort by timestamp desc
            (
                doc! { "email": 1, "timestamp": -1 },
                Some(
                    IndexOptions::builder()
                        .name("email_timestamp_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for SearchRecordDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
