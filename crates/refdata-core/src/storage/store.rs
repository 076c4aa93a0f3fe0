//! The sled-backed catalog store.

use chrono::NaiveDate;
use sled::{Db, Tree};

use super::record::{date_to_days, CatalogRecord, ItemRecord};
use super::StorageConfig;
use crate::error::Error;
use crate::model::{Catalog, CatalogItem, NewCatalog, NewItem};

/// Tree name for catalog records.
const CATALOG_TREE: &str = "catalogs";

/// Tree name for item records.
const ITEM_TREE: &str = "items";

/// Tree name for the catalog/item membership junction.
const MEMBERSHIP_TREE: &str = "membership";

/// Tree name for the catalog identifier index.
const IDENTIFIER_INDEX_TREE: &str = "index:catalog_identifier";

/// Tree name for the item parent identifier index.
const PARENT_INDEX_TREE: &str = "index:item_parent";

/// The catalog store wrapping sled.
///
/// Catalogs and items are rkyv records keyed by their big-endian u64 ids.
/// Membership is a junction tree keyed by `catalog_id ++ item_id`, so it is
/// a set by construction and expands with a prefix scan. Secondary indexes
/// (catalog identifier, item parent identifier) are null-separated prefix
/// keys pointing back at record ids.
pub struct CatalogStore {
    /// The underlying sled database.
    db: Db,

    /// Tree for catalog records.
    catalog_tree: Tree,

    /// Tree for item records.
    item_tree: Tree,

    /// Junction tree for catalog/item membership.
    membership_tree: Tree,

    /// Index of catalog ids by identifier.
    identifier_index: Tree,

    /// Index of item ids by parent identifier.
    parent_index: Tree,
}

impl CatalogStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let catalog_tree = db.open_tree(CATALOG_TREE)?;
        let item_tree = db.open_tree(ITEM_TREE)?;
        let membership_tree = db.open_tree(MEMBERSHIP_TREE)?;
        let identifier_index = db.open_tree(IDENTIFIER_INDEX_TREE)?;
        let parent_index = db.open_tree(PARENT_INDEX_TREE)?;

        Ok(Self {
            db,
            catalog_tree,
            item_tree,
            membership_tree,
            identifier_index,
            parent_index,
        })
    }

    /// Check if the database was recovered from a previous crash.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    // ========== Catalogs ==========

    /// Insert a new catalog version and return it with its assigned id.
    ///
    /// The `(identifier, version)` uniqueness invariant is enforced one
    /// level up, inside the creation critical section.
    pub fn insert_catalog(
        &self,
        draft: &NewCatalog,
        effective_date: NaiveDate,
    ) -> Result<Catalog, Error> {
        let id = self.db.generate_id()?;
        let record = CatalogRecord {
            identifier: draft.identifier.clone(),
            version: draft.version.clone(),
            name: draft.name.clone(),
            short_name: draft.short_name.clone(),
            description: draft.description.clone(),
            effective_days: date_to_days(effective_date),
        };

        self.catalog_tree.insert(id.to_be_bytes(), record.to_bytes()?)?;
        self.identifier_index
            .insert(index_key(&draft.identifier, id), &[])?;

        record.into_catalog(id)
    }

    /// Get a catalog by id.
    pub fn catalog(&self, id: u64) -> Result<Option<Catalog>, Error> {
        match self.catalog_tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(CatalogRecord::from_bytes(&bytes)?.into_catalog(id)?)),
            None => Ok(None),
        }
    }

    /// List all catalogs.
    pub fn catalogs(&self) -> Result<Vec<Catalog>, Error> {
        let mut catalogs = Vec::new();
        for entry in self.catalog_tree.iter() {
            let (key, bytes) = entry?;
            let id = decode_id(&key)?;
            catalogs.push(CatalogRecord::from_bytes(&bytes)?.into_catalog(id)?);
        }
        Ok(catalogs)
    }

    /// List all catalogs with the given identifier.
    pub fn catalogs_with_identifier(&self, identifier: &str) -> Result<Vec<Catalog>, Error> {
        let prefix = index_prefix(identifier);
        let mut catalogs = Vec::new();
        for entry in self.identifier_index.scan_prefix(&prefix) {
            let (key, _) = entry?;
            let id = decode_id(&key[prefix.len()..])?;
            // Index entries for deleted catalogs are removed with the
            // record, so a miss here is a hard inconsistency.
            match self.catalog(id)? {
                Some(catalog) => catalogs.push(catalog),
                None => return Err(Error::InvalidKey),
            }
        }
        Ok(catalogs)
    }

    /// Exact lookup by `(identifier, version)`.
    pub fn find_version(&self, identifier: &str, version: &str) -> Result<Option<Catalog>, Error> {
        Ok(self
            .catalogs_with_identifier(identifier)?
            .into_iter()
            .find(|c| c.version == version))
    }

    /// Delete a catalog, cascading removal of its membership rows.
    ///
    /// Items survive: they may be shared with other versions. Returns
    /// whether the catalog existed.
    pub fn delete_catalog(&self, id: u64) -> Result<bool, Error> {
        let Some(bytes) = self.catalog_tree.remove(id.to_be_bytes())? else {
            return Ok(false);
        };
        let record = CatalogRecord::from_bytes(&bytes)?;
        self.identifier_index
            .remove(index_key(&record.identifier, id))?;

        let member_keys: Vec<_> = self
            .membership_tree
            .scan_prefix(id.to_be_bytes())
            .map(|entry| entry.map(|(key, _)| key))
            .collect::<Result<_, _>>()?;
        for key in member_keys {
            self.membership_tree.remove(key)?;
        }

        Ok(true)
    }

    // ========== Items ==========

    /// Insert a new item and return it with its assigned id.
    pub fn insert_item(&self, draft: &NewItem) -> Result<CatalogItem, Error> {
        let id = self.db.generate_id()?;
        let record = ItemRecord {
            identifier: draft.identifier.clone(),
            parent_identifier: draft.parent_identifier.clone(),
            code: draft.code.clone(),
            value: draft.value.clone(),
        };

        self.item_tree.insert(id.to_be_bytes(), record.to_bytes()?)?;
        self.parent_index
            .insert(index_key(&draft.parent_identifier, id), &[])?;

        Ok(record.into_item(id))
    }

    /// Get an item by id.
    pub fn item(&self, id: u64) -> Result<Option<CatalogItem>, Error> {
        match self.item_tree.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(ItemRecord::from_bytes(&bytes)?.into_item(id))),
            None => Ok(None),
        }
    }

    /// List all items.
    pub fn items(&self) -> Result<Vec<CatalogItem>, Error> {
        let mut items = Vec::new();
        for entry in self.item_tree.iter() {
            let (key, bytes) = entry?;
            let id = decode_id(&key)?;
            items.push(ItemRecord::from_bytes(&bytes)?.into_item(id));
        }
        Ok(items)
    }

    /// List all items with the given parent identifier.
    pub fn items_with_parent(&self, parent_identifier: &str) -> Result<Vec<CatalogItem>, Error> {
        let prefix = index_prefix(parent_identifier);
        let mut items = Vec::new();
        for entry in self.parent_index.scan_prefix(&prefix) {
            let (key, _) = entry?;
            let id = decode_id(&key[prefix.len()..])?;
            match self.item(id)? {
                Some(item) => items.push(item),
                None => return Err(Error::InvalidKey),
            }
        }
        Ok(items)
    }

    // ========== Membership ==========

    /// Attach an item to a catalog version.
    ///
    /// Membership is a set: attaching an already attached item is a no-op.
    /// Returns whether a new membership row was written.
    pub fn attach(&self, catalog_id: u64, item_id: u64) -> Result<bool, Error> {
        let previous = self
            .membership_tree
            .insert(membership_key(catalog_id, item_id), &[])?;
        Ok(previous.is_none())
    }

    /// Expand the member items of a catalog version.
    pub fn items_of(&self, catalog_id: u64) -> Result<Vec<CatalogItem>, Error> {
        let mut items = Vec::new();
        for entry in self.membership_tree.scan_prefix(catalog_id.to_be_bytes()) {
            let (key, _) = entry?;
            if key.len() != 16 {
                return Err(Error::InvalidKey);
            }
            let item_id = decode_id(&key[8..])?;
            match self.item(item_id)? {
                Some(item) => items.push(item),
                None => return Err(Error::InvalidKey),
            }
        }
        Ok(items)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}

/// Decode a big-endian u64 id from key bytes.
fn decode_id(bytes: &[u8]) -> Result<u64, Error> {
    if bytes.len() != 8 {
        return Err(Error::InvalidKey);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}

/// Index key: identifier, null separator, big-endian id.
fn index_key(identifier: &str, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(identifier.len() + 1 + 8);
    key.extend_from_slice(identifier.as_bytes());
    key.push(0);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Prefix for scanning all ids under an identifier.
fn index_prefix(identifier: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(identifier.len() + 1);
    prefix.extend_from_slice(identifier.as_bytes());
    prefix.push(0);
    prefix
}

/// Junction key: catalog id, then item id, both big-endian.
fn membership_key(catalog_id: u64, item_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&catalog_id.to_be_bytes());
    key[8..].copy_from_slice(&item_id.to_be_bytes());
    key
}
