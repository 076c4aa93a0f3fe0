//! Catalog definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One version of a named reference table.
///
/// All versions of "the same" catalog share an `identifier`; the
/// `(identifier, version)` pair is unique. A catalog is immutable once
/// created, except for the item-set growth that happens exactly once at
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Store-assigned internal id.
    pub id: u64,
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
    /// Date from which this version is considered current.
    pub effective_date: NaiveDate,
}

/// A catalog version to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalog {
    /// Stable key grouping all versions of the same catalog.
    pub identifier: String,
    /// Version string, unique within an identifier.
    pub version: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Short name.
    #[serde(default)]
    pub short_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Effective date; defaults to today when omitted.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

impl NewCatalog {
    /// Create a new catalog draft with the given identifier and version.
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
            name: String::new(),
            short_name: String::new(),
            description: String::new(),
            effective_date: None,
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the short name.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the effective date.
    pub fn effective_on(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_catalog_builder() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let draft = NewCatalog::new("okei", "2.1")
            .with_name("Units of measurement")
            .with_short_name("OKEI")
            .effective_on(date);

        assert_eq!(draft.identifier, "okei");
        assert_eq!(draft.version, "2.1");
        assert_eq!(draft.name, "Units of measurement");
        assert_eq!(draft.short_name, "OKEI");
        assert!(draft.description.is_empty());
        assert_eq!(draft.effective_date, Some(date));
    }

    #[test]
    fn test_new_catalog_defaults() {
        let draft = NewCatalog::new("okv", "1");
        assert!(draft.name.is_empty());
        assert!(draft.effective_date.is_none());
    }
}
