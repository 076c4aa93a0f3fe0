//! API root endpoint.

use axum::{routing::get, Json, Router};

use crate::json::RootResponse;
use crate::AppState;

/// Root routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(api_root))
}

/// API index: route names mapped to paths.
async fn api_root() -> Json<RootResponse> {
    Json(RootResponse {
        catalogs: "/catalogs",
        catalog_items: "/catalog-items",
        validate: "/validate",
        health: "/health",
    })
}
