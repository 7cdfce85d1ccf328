use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::resolver::SourceResolver;
use crate::service::SearchService;

pub mod error;
pub mod handlers;
pub mod models;

pub use error::ApiError;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub search: SearchService,
    pub resolver: SourceResolver,
}

impl AppState {
    pub fn new(search: SearchService, resolver: SourceResolver) -> Self {
        Self { search, resolver }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Wrong-method requests on known paths fall through to the 404 envelope too.
    let history = get(handlers::history_handler).fallback(handlers::not_found_handler);

    let router = Router::new()
        .route(
            "/api/search",
            post(handlers::create_search_handler).fallback(handlers::not_found_handler),
        )
        .route("/api/search/history/:user_id", history.clone())
        .route("/api/history/:user_id", history)
        .route(
            "/api/search/:id",
            get(handlers::get_search_handler)
                .delete(handlers::delete_search_handler)
                .fallback(handlers::not_found_handler),
        )
        .route(
            "/api/resolve",
            post(handlers::resolve_handler).fallback(handlers::not_found_handler),
        )
        .route(
            "/health",
            get(handlers::health_handler).fallback(handlers::not_found_handler),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state);

    apply_layers(router)
}

fn apply_layers(router: Router) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
