//! Stored record types for catalogs and items.

use chrono::{Datelike, NaiveDate};
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Catalog, CatalogItem};

/// A stored catalog version.
///
/// The effective date is kept as a day number since the Common Era so the
/// record stays rkyv-archivable; conversion back to a calendar date happens
/// when the record is materialized into a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Stable key grouping all versions of the same catalog.
    pub identifier: String,
    /// Version string, unique within an identifier.
    pub version: String,
    /// Human-readable name.
    pub name: String,
    /// Short name.
    pub short_name: String,
    /// Free-text description.
    pub description: String,
    /// Effective date as days since the Common Era.
    pub effective_days: i32,
}

/// A stored catalog item.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item identifier.
    pub identifier: String,
    /// Identifier of the catalog this item belongs to.
    pub parent_identifier: String,
    /// Entry code.
    pub code: String,
    /// Entry value.
    pub value: String,
}

impl CatalogRecord {
    /// Serialize the record to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a record from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Materialize into a domain catalog with its assigned id.
    pub fn into_catalog(self, id: u64) -> Result<Catalog, Error> {
        Ok(Catalog {
            id,
            identifier: self.identifier,
            version: self.version,
            name: self.name,
            short_name: self.short_name,
            description: self.description,
            effective_date: days_to_date(self.effective_days)?,
        })
    }
}

impl ItemRecord {
    /// Serialize the record to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a record from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Materialize into a domain item with its assigned id.
    pub fn into_item(self, id: u64) -> CatalogItem {
        CatalogItem {
            id,
            identifier: self.identifier,
            parent_identifier: self.parent_identifier,
            code: self.code,
            value: self.value,
        }
    }
}

/// Encode a calendar date as days since the Common Era.
pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Decode a day number back into a calendar date.
pub(crate) fn days_to_date(days: i32) -> Result<NaiveDate, Error> {
    NaiveDate::from_num_days_from_ce_opt(days)
        .ok_or_else(|| Error::Deserialization(format!("day number {} out of range", days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_record_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let record = CatalogRecord {
            identifier: "okei".to_string(),
            version: "1.0".to_string(),
            name: "Units of measurement".to_string(),
            short_name: "OKEI".to_string(),
            description: String::new(),
            effective_days: date_to_days(date),
        };

        let bytes = record.to_bytes().unwrap();
        let decoded = CatalogRecord::from_bytes(&bytes).unwrap();
        assert_eq!(record, decoded);

        let catalog = decoded.into_catalog(7).unwrap();
        assert_eq!(catalog.id, 7);
        assert_eq!(catalog.effective_date, date);
    }

    #[test]
    fn test_item_record_roundtrip() {
        let record = ItemRecord {
            identifier: "okei-383".to_string(),
            parent_identifier: "okei".to_string(),
            code: "383".to_string(),
            value: "Rouble".to_string(),
        };

        let bytes = record.to_bytes().unwrap();
        let decoded = ItemRecord::from_bytes(&bytes).unwrap();
        assert_eq!(record, decoded);

        let item = decoded.into_item(3);
        assert_eq!(item.id, 3);
        assert_eq!(item.code, "383");
    }

    #[test]
    fn test_date_codec() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_to_date(date_to_days(date)).unwrap(), date);
    }
}
