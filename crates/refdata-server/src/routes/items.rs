//! Catalog item listing, creation, and point lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use refdata_core::{CatalogItem, NewItem};

use crate::error::AppError;
use crate::json::decode_body;
use crate::AppState;

/// Item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog-items", get(list_items).post(create_item))
        .route("/catalog-items/:id", get(get_item))
}

/// Query parameters for the item listing.
#[derive(Debug, Deserialize)]
struct ItemsQuery {
    /// Restrict to the members of this catalog's resolved version.
    catalog_identifier: Option<String>,
    /// Pin a specific version instead of the current one.
    catalog_version: Option<String>,
}

/// List items: all of them, or the members of one resolved catalog
/// version. Resolution failure yields an empty list, not an error.
async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let items = match query.catalog_identifier.as_deref() {
        Some(identifier) => state
            .service
            .version_items(identifier, query.catalog_version.as_deref())?,
        None => state.service.items()?,
    };
    Ok(Json(items))
}

/// Create a standalone item; it attaches to the current version of its
/// parent catalog when one exists.
async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CatalogItem>), AppError> {
    let draft: NewItem = decode_body(body)?;
    if draft.identifier.is_empty()
        || draft.parent_identifier.is_empty()
        || draft.code.is_empty()
        || draft.value.is_empty()
    {
        return Err(AppError::BadRequest(
            "identifier, parent_identifier, code and value must be non-empty".to_string(),
        ));
    }

    let item = state.service.create_item(draft)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get one item by id.
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CatalogItem>, AppError> {
    state
        .service
        .item(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no catalog item with id {}", id)))
}
