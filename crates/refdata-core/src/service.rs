//! Service façade combining the store with the core components.

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Error;
use crate::filter::relevant_on;
use crate::model::{Catalog, CatalogItem, NewCatalog, NewItem};
use crate::policy::CreationPolicy;
use crate::resolve::VersionResolver;
use crate::storage::{CatalogStore, StorageConfig};
use crate::validate::{ValidationEngine, ValidationReport};

/// The operations the HTTP layer consumes.
///
/// Requests are stateless units of work against the shared store; the one
/// multi-step side effect is creation (read previous version, then write
/// membership), which the creation mutex serializes.
pub struct CatalogService {
    store: CatalogStore,
    create_lock: Mutex<()>,
}

impl CatalogService {
    /// Open a service over a store at the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        Ok(Self::new(CatalogStore::open(config)?))
    }

    /// Wrap an already opened store.
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            create_lock: Mutex::new(()),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Create a catalog version and populate its item set.
    ///
    /// Runs as one atomic unit under the creation lock: uniqueness check,
    /// insert, then [`CreationPolicy::apply`]. A policy failure rolls the
    /// fresh catalog back so no version is left with a silently incomplete
    /// item set.
    pub fn create_catalog(&self, draft: NewCatalog) -> Result<Catalog, Error> {
        let _guard = self.create_lock.lock();

        if self
            .store
            .find_version(&draft.identifier, &draft.version)?
            .is_some()
        {
            return Err(Error::Conflict {
                identifier: draft.identifier,
                version: draft.version,
            });
        }

        let effective = draft.effective_date.unwrap_or_else(crate::resolve::today);
        let catalog = self.store.insert_catalog(&draft, effective)?;

        match CreationPolicy::apply(&self.store, &catalog) {
            Ok(attached) => {
                info!(
                    identifier = %catalog.identifier,
                    version = %catalog.version,
                    attached,
                    "created catalog version"
                );
                Ok(catalog)
            }
            Err(e) => {
                if let Err(rollback) = self.store.delete_catalog(catalog.id) {
                    warn!(
                        id = catalog.id,
                        error = %rollback,
                        "rollback of partially created catalog failed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Create a standalone item and attach it to the current version of
    /// its parent catalog, when one exists.
    pub fn create_item(&self, draft: NewItem) -> Result<CatalogItem, Error> {
        let _guard = self.create_lock.lock();
        let item = self.store.insert_item(&draft)?;
        CreationPolicy::attach_to_current(&self.store, &item)?;
        Ok(item)
    }

    /// Get one catalog by id.
    pub fn catalog(&self, id: u64) -> Result<Option<Catalog>, Error> {
        self.store.catalog(id)
    }

    /// Get one item by id.
    pub fn item(&self, id: u64) -> Result<Option<CatalogItem>, Error> {
        self.store.item(id)
    }

    /// List all items.
    pub fn items(&self) -> Result<Vec<CatalogItem>, Error> {
        self.store.items()
    }

    /// List catalogs, reduced to the versions relevant on `as_of`.
    ///
    /// No date means the full, unreduced listing.
    pub fn catalogs_on(&self, as_of: Option<NaiveDate>) -> Result<Vec<Catalog>, Error> {
        Ok(relevant_on(self.store.catalogs()?, as_of))
    }

    /// Resolve the catalog version that applies.
    pub fn resolve(
        &self,
        identifier: &str,
        version: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> Result<Catalog, Error> {
        VersionResolver::new(&self.store).resolve(identifier, version, as_of)
    }

    /// The member items of a resolved catalog version.
    ///
    /// Resolution failure yields an empty listing, not an error.
    pub fn version_items(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<Vec<CatalogItem>, Error> {
        match self.resolve(identifier, version, None) {
            Ok(catalog) => self.store.items_of(catalog.id),
            Err(Error::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Validate a batch of raw item records against a catalog version.
    ///
    /// An unresolvable target degrades to all-`false` verdicts.
    pub fn validate(
        &self,
        identifier: &str,
        version: Option<&str>,
        candidates: &[Value],
    ) -> Result<ValidationReport, Error> {
        match self.resolve(identifier, version, None) {
            Ok(catalog) => {
                let items = self.store.items_of(catalog.id)?;
                Ok(ValidationEngine::validate(Some(&items), candidates))
            }
            Err(Error::NotFound) => Ok(ValidationEngine::validate(None, candidates)),
            Err(e) => Err(e),
        }
    }

    /// Delete a catalog, cascading its membership rows.
    pub fn delete_catalog(&self, id: u64) -> Result<bool, Error> {
        let _guard = self.create_lock.lock();
        self.store.delete_catalog(id)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.store.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_service() -> CatalogService {
        CatalogService::open(StorageConfig::temporary()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_catalog_rejects_duplicate_version() {
        let service = test_service();
        service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 1, 1)))
            .unwrap();

        let err = service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 6, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_create_catalog_defaults_to_today() {
        let service = test_service();
        let catalog = service.create_catalog(NewCatalog::new("okei", "1.0")).unwrap();
        assert_eq!(catalog.effective_date, crate::resolve::today());
    }

    #[test]
    fn test_creation_inherits_items() {
        let service = test_service();
        service
            .create_item(NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        let v1 = service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 1, 1)))
            .unwrap();
        assert_eq!(service.store().items_of(v1.id).unwrap().len(), 1);

        let v2 = service
            .create_catalog(NewCatalog::new("okei", "2.0").effective_on(date(2021, 6, 1)))
            .unwrap();
        assert_eq!(service.store().items_of(v2.id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_item_attaches_to_current_version() {
        let service = test_service();
        let v1 = service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 1, 1)))
            .unwrap();

        service
            .create_item(NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        assert_eq!(service.store().items_of(v1.id).unwrap().len(), 1);
    }

    #[test]
    fn test_version_items_empty_on_unknown_identifier() {
        let service = test_service();
        assert!(service.version_items("missing", None).unwrap().is_empty());
        assert!(service
            .version_items("missing", Some("1.0"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_validate_against_unresolvable_target() {
        let service = test_service();
        let report = service
            .validate("missing", None, &[json!({"code": "a", "value": "b"})])
            .unwrap();
        assert_eq!(report.short_results, vec![false]);
    }

    #[test]
    fn test_validate_against_pinned_version() {
        let service = test_service();
        service
            .create_item(NewItem::new("x", "okei", "a", "b"))
            .unwrap();
        service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 1, 1)))
            .unwrap();

        let report = service
            .validate(
                "okei",
                Some("1.0"),
                &[json!({"code": "a", "value": "b"}), json!({"code": "a", "value": "c"})],
            )
            .unwrap();
        assert_eq!(report.short_results, vec![true, false]);
    }

    #[test]
    fn test_delete_catalog() {
        let service = test_service();
        let catalog = service
            .create_catalog(NewCatalog::new("okei", "1.0").effective_on(date(2021, 1, 1)))
            .unwrap();

        assert!(service.delete_catalog(catalog.id).unwrap());
        assert!(service.catalog(catalog.id).unwrap().is_none());
        assert!(!service.delete_catalog(catalog.id).unwrap());
    }
}
