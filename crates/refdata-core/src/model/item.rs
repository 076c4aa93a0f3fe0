//! Catalog item definitions.

use serde::{Deserialize, Serialize};

/// One code/value entry.
///
/// An item may belong to any number of catalog versions at once: an
/// unchanged item is carried forward by reference to every new version
/// that inherits it, never cloned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Store-assigned internal id.
    pub id: u64,
    /// Item identifier; may coincide with a prior version's item to
    /// signal continuity.
    pub identifier: String,
    /// Identifier of the catalog this item conceptually belongs to.
    pub parent_identifier: String,
    /// Entry code.
    pub code: String,
    /// Entry value.
    pub value: String,
}

/// An item to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    /// Item identifier.
    pub identifier: String,
    /// Identifier of the catalog this item belongs to.
    pub parent_identifier: String,
    /// Entry code.
    pub code: String,
    /// Entry value.
    pub value: String,
}

impl NewItem {
    /// Create a new item draft.
    pub fn new(
        identifier: impl Into<String>,
        parent_identifier: impl Into<String>,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            parent_identifier: parent_identifier.into(),
            code: code.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item() {
        let draft = NewItem::new("okei-383", "okei", "383", "Rouble");
        assert_eq!(draft.identifier, "okei-383");
        assert_eq!(draft.parent_identifier, "okei");
        assert_eq!(draft.code, "383");
        assert_eq!(draft.value, "Rouble");
    }
}
