use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::data_models::{NewSearch, SearchRecord, SearchSummary};
use crate::store::SearchStore;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Raw create input; every field may be absent until validated.
#[derive(Debug, Default, Clone)]
pub struct CreateSearch {
    pub user_id: Option<String>,
    pub query: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub result: Option<Value>,
}

impl CreateSearch {
    fn validate(self) -> Result<NewSearch, SearchError> {
        let missing = || {
            SearchError::Validation(
                "Missing required fields: userId, query, result".to_string(),
            )
        };

        let user_id = self.user_id.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let query = self.query.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let result = self.result.filter(is_present).ok_or_else(missing)?;

        Ok(NewSearch {
            user_id,
            query,
            platforms: self.platforms.unwrap_or_default(),
            result,
        })
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn SearchStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    pub async fn create_search(&self, input: CreateSearch) -> Result<SearchRecord, SearchError> {
        let search = input.validate()?;
        let record = self.store.create(search).await?;
        tracing::info!(id = %record.id, user_id = %record.user_id, "search saved");
        Ok(record)
    }

    /// Newest-first summaries; `None` or zero uses [`DEFAULT_HISTORY_LIMIT`].
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchSummary>, SearchError> {
        let limit = limit
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        Ok(self.store.history(user_id, limit).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<SearchRecord, SearchError> {
        let oid = parse_id(id)?;
        self.store.find_by_id(oid).await?.ok_or_else(not_found)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), SearchError> {
        let oid = parse_id(id)?;
        if !self.store.delete_by_id(oid).await? {
            return Err(not_found());
        }
        tracing::info!(%id, "search deleted");
        Ok(())
    }
}

// An id that can never have been assigned is reported like any other unknown id.
fn parse_id(id: &str) -> Result<ObjectId, SearchError> {
    ObjectId::parse_str(id).map_err(|_| not_found())
}

fn not_found() -> SearchError {
    SearchError::NotFound("Search not found".to_string())
}
