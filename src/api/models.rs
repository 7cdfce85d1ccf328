use chrono::{SecondsFormat, Utc};
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_models::{SearchRecord, SearchSummary};
use crate::service::CreateSearch;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchRequest {
    pub user_id: Option<String>,
    pub query: Option<String>,
    pub platforms: Option<Vec<String>>,
    #[serde(alias = "geminiResult")]
    pub result: Option<Value>,
}

impl From<CreateSearchRequest> for CreateSearch {
    fn from(request: CreateSearchRequest) -> Self {
        CreateSearch {
            user_id: request.user_id,
            query: request.query,
            platforms: request.platforms,
            result: request.result,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub query: Option<String>,
}

// =============================================================================
// Response bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordView {
    pub id: String,
    pub user_id: String,
    pub query: String,
    pub platforms: Vec<String>,
    pub result: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SearchRecord> for SearchRecordView {
    fn from(record: SearchRecord) -> Self {
        SearchRecordView {
            id: record.id.to_hex(),
            user_id: record.user_id,
            query: record.query,
            platforms: record.platforms,
            result: record.result,
            created_at: format_timestamp(record.created_at),
            updated_at: format_timestamp(record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummaryView {
    pub id: String,
    pub query: String,
    pub platforms: Vec<String>,
    pub created_at: String,
}

impl From<SearchSummary> for SearchSummaryView {
    fn from(summary: SearchSummary) -> Self {
        SearchSummaryView {
            id: summary.id.to_hex(),
            query: summary.query,
            platforms: summary.platforms,
            created_at: format_timestamp(summary.created_at),
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(dt: DateTime) -> String {
    chrono::DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
