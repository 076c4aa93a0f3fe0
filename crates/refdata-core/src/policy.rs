//! Item inheritance on catalog and item creation.

use tracing::debug;

use crate::error::Error;
use crate::model::{Catalog, CatalogItem};
use crate::resolve::VersionResolver;
use crate::storage::CatalogStore;

/// Determines which items belong to a freshly created catalog version and
/// where a freshly created standalone item lands.
///
/// Both steps are deliberate service calls, not persistence hooks, and run
/// inside the creation critical section so a concurrent creation can never
/// observe a half-attached version.
pub struct CreationPolicy;

impl CreationPolicy {
    /// Populate the item set of a newly created catalog version.
    ///
    /// Must run after the catalog row exists (membership needs both sides
    /// persisted). If a previous version of the identifier exists, its
    /// items are attached by reference; otherwise every orphan item whose
    /// `parent_identifier` matches is adopted. Attachment is idempotent,
    /// so re-applying the policy never duplicates membership.
    ///
    /// Returns the number of items attached.
    pub fn apply(store: &CatalogStore, catalog: &Catalog) -> Result<usize, Error> {
        let resolver = VersionResolver::new(store);
        let inherited = match resolver.latest_excluding(&catalog.identifier, catalog.id)? {
            Some(previous) => {
                let items = store.items_of(previous.id)?;
                for item in &items {
                    store.attach(catalog.id, item.id)?;
                }
                debug!(
                    identifier = %catalog.identifier,
                    version = %catalog.version,
                    from_version = %previous.version,
                    count = items.len(),
                    "copied items forward from previous version"
                );
                items.len()
            }
            None => {
                let orphans = store.items_with_parent(&catalog.identifier)?;
                for item in &orphans {
                    store.attach(catalog.id, item.id)?;
                }
                debug!(
                    identifier = %catalog.identifier,
                    version = %catalog.version,
                    count = orphans.len(),
                    "adopted orphan items for first version"
                );
                orphans.len()
            }
        };
        Ok(inherited)
    }

    /// Attach a freshly created standalone item to the current version of
    /// its parent catalog, when one exists.
    ///
    /// Lets items be bulk-loaded independently and still become visible on
    /// the active version without cutting a new one. Returns the id of the
    /// catalog the item was attached to, if any.
    pub fn attach_to_current(
        store: &CatalogStore,
        item: &CatalogItem,
    ) -> Result<Option<u64>, Error> {
        match VersionResolver::new(store).resolve(&item.parent_identifier, None, None) {
            Ok(current) => {
                store.attach(current.id, item.id)?;
                debug!(
                    parent = %item.parent_identifier,
                    version = %current.version,
                    item = item.id,
                    "attached new item to current version"
                );
                Ok(Some(current.id))
            }
            Err(Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewCatalog, NewItem};
    use crate::storage::StorageConfig;
    use chrono::NaiveDate;

    fn test_store() -> CatalogStore {
        CatalogStore::open(StorageConfig::temporary()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_version_adopts_orphans() {
        let store = test_store();
        let a = store
            .insert_item(&NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        let b = store
            .insert_item(&NewItem::new("b", "okei", "2", "two"))
            .unwrap();
        store
            .insert_item(&NewItem::new("c", "okv", "3", "three"))
            .unwrap();

        let catalog = store
            .insert_catalog(&NewCatalog::new("okei", "1.0"), date(2021, 1, 1))
            .unwrap();
        let attached = CreationPolicy::apply(&store, &catalog).unwrap();
        assert_eq!(attached, 2);

        let mut ids: Vec<_> = store
            .items_of(catalog.id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        ids.sort_unstable();
        let mut expected = vec![a.id, b.id];
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_new_version_copies_previous_item_set() {
        let store = test_store();
        let item = store
            .insert_item(&NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        let v1 = store
            .insert_catalog(&NewCatalog::new("okei", "1.0"), date(2021, 1, 1))
            .unwrap();
        CreationPolicy::apply(&store, &v1).unwrap();

        // A later orphan with the same parent must NOT leak into v2: only
        // v1's member set is copied forward.
        store
            .insert_item(&NewItem::new("stray", "okei", "9", "nine"))
            .unwrap();

        let v2 = store
            .insert_catalog(&NewCatalog::new("okei", "2.0"), date(2021, 6, 1))
            .unwrap();
        let attached = CreationPolicy::apply(&store, &v2).unwrap();
        assert_eq!(attached, 1);

        let of_v2 = store.items_of(v2.id).unwrap();
        assert_eq!(of_v2.len(), 1);
        // Reference copy: both versions point at the same item row.
        assert_eq!(of_v2[0].id, item.id);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = test_store();
        store
            .insert_item(&NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        let catalog = store
            .insert_catalog(&NewCatalog::new("okei", "1.0"), date(2021, 1, 1))
            .unwrap();

        CreationPolicy::apply(&store, &catalog).unwrap();
        CreationPolicy::apply(&store, &catalog).unwrap();

        assert_eq!(store.items_of(catalog.id).unwrap().len(), 1);
    }

    #[test]
    fn test_attach_to_current() {
        let store = test_store();
        let catalog = store
            .insert_catalog(&NewCatalog::new("okei", "1.0"), date(2021, 1, 1))
            .unwrap();

        let item = store
            .insert_item(&NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        let target = CreationPolicy::attach_to_current(&store, &item).unwrap();
        assert_eq!(target, Some(catalog.id));
        assert_eq!(store.items_of(catalog.id).unwrap().len(), 1);

        // No current version for this parent: the item stays orphaned.
        let orphan = store
            .insert_item(&NewItem::new("b", "okv", "2", "two"))
            .unwrap();
        let target = CreationPolicy::attach_to_current(&store, &orphan).unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn test_attach_to_current_skips_future_versions() {
        let store = test_store();
        store
            .insert_catalog(&NewCatalog::new("okei", "1.0"), date(2030, 1, 1))
            .unwrap();

        let item = store
            .insert_item(&NewItem::new("a", "okei", "1", "one"))
            .unwrap();
        // The only version is not yet effective, so there is no current
        // version to attach to.
        let target = CreationPolicy::attach_to_current(&store, &item).unwrap();
        assert_eq!(target, None);
    }
}
