//! Refdata HTTP/JSON server.
//!
//! This crate exposes the refdata core over a REST API: catalog listings
//! with relevant-date filtering, item listings with version resolution,
//! creation endpoints, and batch validation.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use config::{Args, ServerConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use refdata_core::CatalogService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The catalog service.
    pub service: Arc<CatalogService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: CatalogService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::root::routes())
        .merge(routes::health::routes())
        .merge(routes::catalogs::routes())
        .merge(routes::items::routes())
        .merge(routes::validate::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
