use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::sync::Arc;

use crate::normalizer::SourceLinks;

use super::AppState;
use super::error::{ApiError, INTERNAL_ERROR_MESSAGE};
use super::models::{
    CreateSearchRequest, DataResponse, ErrorResponse, HealthResponse, HistoryParams,
    ListResponse, MessageResponse, ResolveRequest, SearchRecordView, SearchSummaryView,
};

pub async fn create_search_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSearchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<SearchRecordView>>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = state.search.create_search(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(SearchRecordView::from(record))),
    ))
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<ListResponse<SearchSummaryView>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = match params.limit.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            ApiError::BadRequest(format!("limit must be a non-negative integer, got {raw:?}"))
        })?),
    };

    let summaries = state.search.get_history(&user_id, limit).await?;

    Ok(Json(ListResponse::new(
        summaries.into_iter().map(SearchSummaryView::from).collect(),
    )))
}

pub async fn get_search_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<SearchRecordView>>, ApiError> {
    let record = state.search.get_by_id(&id).await?;
    Ok(Json(DataResponse::new(record.into())))
}

pub async fn delete_search_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.search.delete_by_id(&id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Search deleted".to_string(),
    }))
}

pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<DataResponse<SourceLinks>>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: query".to_string()))?;

    let links = state.resolver.resolve_sources(&query).await?;
    Ok(Json(DataResponse::new(links)))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}

/// Installed through `CatchPanicLayer`; the payload is logged, never returned.
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
