use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A saved search as stored in the `searches` collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    // Older documents carry the payload under `geminiResult`.
    #[serde(alias = "geminiResult")]
    pub result: Value,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl SearchRecord {
    pub fn new(search: NewSearch) -> SearchRecord {
        let now = DateTime::now();
        SearchRecord {
            id: ObjectId::new(),
            user_id: search.user_id,
            query: search.query,
            platforms: search.platforms,
            result: search.result,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            id: self.id,
            query: self.query.clone(),
            platforms: self.platforms.clone(),
            created_at: self.created_at,
        }
    }
}

/// A validated search that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSearch {
    pub user_id: String,
    pub query: String,
    pub platforms: Vec<String>,
    pub result: Value,
}

/// History listing projection; leaves out the `result` payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub query: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub created_at: DateTime,
}
