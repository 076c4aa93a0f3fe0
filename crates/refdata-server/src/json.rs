//! JSON request and response helpers for the HTTP layer.

use serde::Serialize;
use serde_json::Value;

use refdata_core::Catalog;

use crate::error::AppError;

/// API root response: route names mapped to paths.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Catalog listing endpoint.
    pub catalogs: &'static str,
    /// Item listing endpoint.
    pub catalog_items: &'static str,
    /// Validation endpoint.
    pub validate: &'static str,
    /// Health check endpoint.
    pub health: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Sortable catalog listing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// By effective date (the default; descending unless asked otherwise).
    Date,
    /// By identifier.
    Identifier,
    /// By version string.
    Version,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortField {
    /// Parse a `sort` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None | Some("date") => Ok(SortField::Date),
            Some("identifier") => Ok(SortField::Identifier),
            Some("version") => Ok(SortField::Version),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown sort field '{}', expected date, identifier or version",
                other
            ))),
        }
    }

    /// The direction used when the request does not name one.
    pub fn default_order(self) -> SortOrder {
        match self {
            SortField::Date => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

impl SortOrder {
    /// Parse an `order` query parameter.
    pub fn parse(raw: Option<&str>, field: SortField) -> Result<Self, AppError> {
        match raw {
            None => Ok(field.default_order()),
            Some("asc") => Ok(SortOrder::Asc),
            Some("desc") => Ok(SortOrder::Desc),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown order '{}', expected asc or desc",
                other
            ))),
        }
    }
}

/// Sort a catalog listing in place.
///
/// The core's date filter leaves ordering to this stage.
pub fn sort_catalogs(catalogs: &mut [Catalog], field: SortField, order: SortOrder) {
    match field {
        SortField::Date => catalogs.sort_by(|a, b| a.effective_date.cmp(&b.effective_date)),
        SortField::Identifier => catalogs.sort_by(|a, b| a.identifier.cmp(&b.identifier)),
        SortField::Version => catalogs.sort_by(|a, b| a.version.cmp(&b.version)),
    }
    if order == SortOrder::Desc {
        catalogs.reverse();
    }
}

/// Decode a JSON body into a typed request, with the `{"error": …}` shape
/// on failure instead of the framework's plain-text rejection.
pub fn decode_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}
