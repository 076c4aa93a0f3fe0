//! Catalog listing, creation, and point lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use refdata_core::{Catalog, NewCatalog};

use crate::error::AppError;
use crate::json::{decode_body, sort_catalogs, SortField, SortOrder};
use crate::AppState;

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalogs", get(list_catalogs).post(create_catalog))
        .route("/catalogs/:id", get(get_catalog).delete(delete_catalog))
}

/// Query parameters for the catalog listing.
#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Filter to versions relevant on this date (ISO `YYYY-MM-DD`).
    date: Option<String>,
    /// Sort field: `date`, `identifier` or `version`.
    sort: Option<String>,
    /// Sort direction: `asc` or `desc`.
    order: Option<String>,
}

/// List catalogs, optionally reduced to the versions relevant on a date.
async fn list_catalogs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Catalog>>, AppError> {
    let as_of = query
        .date
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date '{}'", raw)))
        })
        .transpose()?;

    let field = SortField::parse(query.sort.as_deref())?;
    let order = SortOrder::parse(query.order.as_deref(), field)?;

    let mut catalogs = state.service.catalogs_on(as_of)?;
    sort_catalogs(&mut catalogs, field, order);
    Ok(Json(catalogs))
}

/// Create a catalog version; the creation policy populates its item set.
async fn create_catalog(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Catalog>), AppError> {
    let draft: NewCatalog = decode_body(body)?;
    if draft.identifier.is_empty() || draft.version.is_empty() {
        return Err(AppError::BadRequest(
            "identifier and version must be non-empty".to_string(),
        ));
    }

    let catalog = state.service.create_catalog(draft)?;
    Ok((StatusCode::CREATED, Json(catalog)))
}

/// Get one catalog by id.
async fn get_catalog(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Catalog>, AppError> {
    state
        .service
        .catalog(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no catalog with id {}", id)))
}

/// Delete one catalog by id, cascading its membership rows.
async fn delete_catalog(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if state.service.delete_catalog(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("no catalog with id {}", id)))
    }
}
