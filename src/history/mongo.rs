//! MongoDB-backed history store

use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tracing::error;

use crate::db::schemas::{SearchRecordDoc, HISTORY_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::history::HistoryStore;
use crate::types::{PulseError, Result};

/// History store backed by the `history` collection
#[derive(Clone)]
pub struct MongoHistoryStore {
    collection: MongoCollection<SearchRecordDoc>,
}

impl MongoHistoryStore {
    /// Open the history collection and apply its indexes
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo.collection::<SearchRecordDoc>(HISTORY_COLLECTION).await?;
        Ok(Self { collection })
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    async fn append(&self, email: &str, area: &str, timestamp: DateTime<Utc>) -> Result<()> {
        self.collection
            .insert_one(SearchRecordDoc::new(
                email.to_string(),
                area.to_string(),
                timestamp,
            ))
            .await?;
        Ok(())
    }

    async fn recent_areas(&self, email: &str, limit: usize) -> Result<Vec<String>> {
        // Limit to the newest raw records BEFORE deduplicating, so duplicate
        // searches among them shrink the result below `limit`. The $group
        // stage does not guarantee output order.
        let pipeline = vec![
            doc! { "$match": { "email": email } },
            doc! { "$sort": { "timestamp": -1 } },
            doc! { "$limit": limit as i64 },
            doc! { "$group": { "_id": "$area" } },
        ];

        let mut cursor = self
            .collection
            .inner()
            .aggregate(pipeline)
            .await
            .map_err(|e| PulseError::Database(format!("History aggregation failed: {}", e)))?;

        let mut areas = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(group) => {
                    if let Ok(area) = group.get_str("_id") {
                        areas.push(area.to_string());
                    }
                }
                Err(e) => {
                    error!("Error reading history group: {}", e);
                }
            }
        }

        Ok(areas)
    }
}
