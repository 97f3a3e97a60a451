//! In-memory history store
//!
//! Used in dev mode when MongoDB is unavailable, and by tests. Implements
//! the same limit-then-distinct semantics as the MongoDB store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::history::HistoryStore;
use crate::types::Result;

#[derive(Debug, Clone)]
struct MemoryRecord {
    email: String,
    area: String,
    timestamp: DateTime<Utc>,
}

/// Process-local history store
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: RwLock<Vec<MemoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, email: &str, area: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(MemoryRecord {
            email: email.to_string(),
            area: area.to_string(),
            timestamp,
        });
        Ok(())
    }

    async fn recent_areas(&self, email: &str, limit: usize) -> Result<Vec<String>> {
        let records = self.records.read().await;

        // Newest first; ties broken by insertion order (later insert = newer)
        let mut user_records: Vec<(usize, &MemoryRecord)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.email == email)
            .collect();
        user_records.sort_by(|(a_idx, a), (b_idx, b)| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b_idx.cmp(a_idx))
        });

        // Limit to the newest raw records, then deduplicate
        let mut areas = Vec::new();
        for (_, record) in user_records.into_iter().take(limit) {
            if !areas.contains(&record.area) {
                areas.push(record.area.clone());
            }
        }

        Ok(areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_then_recent_includes_area() {
        let store = MemoryHistoryStore::new();
        store
            .append("user@example.com", "koramangala", at(0))
            .await
            .unwrap();

        let areas = store.recent_areas("user@example.com", 5).await.unwrap();
        assert_eq!(areas, vec!["koramangala".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicates_shrink_the_distinct_set() {
        let store = MemoryHistoryStore::new();
        let email = "user@example.com";

        // Last 5 raw searches: c, a, b, a, a -> 3 distinct areas
        for (i, area) in ["a", "a", "b", "a", "c"].iter().enumerate() {
            store.append(email, area, at(i as u32)).await.unwrap();
        }

        let areas = store.recent_areas(email, 5).await.unwrap();
        assert_eq!(areas.len(), 3);
        assert!(areas.contains(&"a".to_string()));
        assert!(areas.contains(&"b".to_string()));
        assert!(areas.contains(&"c".to_string()));
    }

    #[tokio::test]
    async fn test_only_the_newest_raw_records_are_considered() {
        let store = MemoryHistoryStore::new();
        let email = "user@example.com";

        for (i, area) in ["one", "two", "three", "four", "five", "six"]
            .iter()
            .enumerate()
        {
            store.append(email, area, at(i as u32)).await.unwrap();
        }

        let areas = store.recent_areas(email, 5).await.unwrap();
        assert_eq!(areas.len(), 5);
        // "one" fell outside the 5 newest raw records
        assert!(!areas.contains(&"one".to_string()));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryHistoryStore::new();
        store
            .append("a@example.com", "koramangala", at(0))
            .await
            .unwrap();
        store
            .append("b@example.com", "whitefield", at(1))
            .await
            .unwrap();

        let areas = store.recent_areas("a@example.com", 5).await.unwrap();
        assert_eq!(areas, vec!["koramangala".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_user_gets_empty_history() {
        let store = MemoryHistoryStore::new();
        let areas = store.recent_areas("nobody@example.com", 5).await.unwrap();
        assert!(areas.is_empty());
    }
}
