use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

pub mod archive_client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use archive_client::ConversationArchive;

#[derive(Clone)]
pub struct AppState {
    pub archive: Arc<dyn ConversationArchive>,
}

impl AppState {
    pub fn new(archive: Arc<dyn ConversationArchive>) -> Self {
        Self { archive }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route(
            "/mcp",
            get(http::handlers::mcp_info).post(http::handlers::mcp_endpoint),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
