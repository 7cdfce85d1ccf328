use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::cmp::Reverse;
use tokio::sync::RwLock;

use crate::data_models::{NewSearch, SearchRecord, SearchSummary};

/// Persistence seam for saved searches.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Insert a new record; the store assigns the id and timestamps.
    async fn create(&self, search: NewSearch) -> Result<SearchRecord>;

    /// Summaries for `user_id`, newest first, at most `limit` entries.
    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchSummary>>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<SearchRecord>>;

    /// Returns `false` when nothing had that id.
    async fn delete_by_id(&self, id: ObjectId) -> Result<bool>;
}

/// Process-local store, used by tests and by `serve --in-memory`.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SearchRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn create(&self, search: NewSearch) -> Result<SearchRecord> {
        let record = SearchRecord::new(search);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchSummary>> {
        let records = self.records.read().await;
        // Walk newest-inserted first; the stable sort keeps that order for equal timestamps.
        let mut matching: Vec<&SearchRecord> = records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .collect();
        matching.sort_by_key(|r| Reverse(r.created_at));

        Ok(matching
            .into_iter()
            .take(limit)
            .map(SearchRecord::summary)
            .collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<SearchRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}
