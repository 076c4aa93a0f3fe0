//! Batch validation endpoint.

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use refdata_core::ValidationReport;

use crate::error::AppError;
use crate::AppState;

/// Validation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/validate", post(validate))
}

/// Query parameters for validation.
#[derive(Debug, Deserialize)]
struct ValidateQuery {
    /// Catalog identifier to validate against (required).
    catalog_identifier: Option<String>,
    /// Pin a specific version instead of the current one.
    catalog_version: Option<String>,
}

/// Validate a batch of raw item records against a catalog version.
///
/// The body must be a JSON array; each element gets a verdict in input
/// order. An unresolvable target fails every candidate rather than
/// erroring.
async fn validate(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
    Json(body): Json<Value>,
) -> Result<Json<ValidationReport>, AppError> {
    let Some(identifier) = query.catalog_identifier.as_deref() else {
        return Err(AppError::BadRequest(
            "catalog_identifier parameter is required".to_string(),
        ));
    };

    let Value::Array(candidates) = body else {
        return Err(AppError::BadRequest(
            "request body must be a list of item records".to_string(),
        ));
    };

    let report =
        state
            .service
            .validate(identifier, query.catalog_version.as_deref(), &candidates)?;
    Ok(Json(report))
}
