//! Catalog version resolution.

use chrono::{NaiveDate, Utc};

use crate::error::Error;
use crate::model::Catalog;
use crate::storage::CatalogStore;

/// Today's date (UTC), the default `as_of` bound.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Total ordering of catalog versions within an identifier.
///
/// Later effective date wins; equal dates break by the greater version
/// string, then the greater id, so resolution is deterministic even when
/// two versions share a date.
pub(crate) fn version_order(catalog: &Catalog) -> (NaiveDate, &str, u64) {
    (catalog.effective_date, &catalog.version, catalog.id)
}

/// Resolves which version of a catalog applies.
pub struct VersionResolver<'a> {
    store: &'a CatalogStore,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver over the given store.
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Return the single catalog version that applies.
    ///
    /// With `version` given, this is an exact `(identifier, version)`
    /// lookup and `as_of` is ignored. Otherwise the winner is the version
    /// with the maximum effective date not after `as_of` (today when
    /// unset). [`Error::NotFound`] when nothing qualifies.
    pub fn resolve(
        &self,
        identifier: &str,
        version: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> Result<Catalog, Error> {
        if let Some(version) = version {
            return self
                .store
                .find_version(identifier, version)?
                .ok_or(Error::NotFound);
        }

        let as_of = as_of.unwrap_or_else(today);
        self.store
            .catalogs_with_identifier(identifier)?
            .into_iter()
            .filter(|c| c.effective_date <= as_of)
            .max_by(|a, b| version_order(a).cmp(&version_order(b)))
            .ok_or(Error::NotFound)
    }

    /// The latest existing version of an identifier, excluding one id.
    ///
    /// Used when a version has just been created and its predecessor is
    /// wanted; no date bound applies.
    pub fn latest_excluding(
        &self,
        identifier: &str,
        exclude_id: u64,
    ) -> Result<Option<Catalog>, Error> {
        Ok(self
            .store
            .catalogs_with_identifier(identifier)?
            .into_iter()
            .filter(|c| c.id != exclude_id)
            .max_by(|a, b| version_order(a).cmp(&version_order(b))))
    }
}
