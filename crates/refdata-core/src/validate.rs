//! Batch membership validation of raw item records.

use serde::Serialize;
use serde_json::Value;

use crate::model::CatalogItem;

/// Per-batch validation outcome.
///
/// `results` pairs every input with its verdict in input order; N inputs
/// always produce N verdicts, duplicates and malformed entries included.
/// `short_results` is the bare verdict list in the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Verdicts only, in input order.
    pub short_results: Vec<bool>,
    /// Each input paired with its verdict, in input order.
    pub results: Vec<(Value, bool)>,
}

/// Fields a structurally valid candidate carries.
///
/// `code` and `value` are mandatory non-empty strings; the identifier
/// fields are compared only when the candidate supplies them. Unknown
/// extra fields are ignored.
struct Candidate<'a> {
    code: &'a str,
    value: &'a str,
    identifier: Option<&'a str>,
    parent_identifier: Option<&'a str>,
}

/// Validates raw item records against a resolved catalog version.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Check each candidate for membership in the target's item set.
    ///
    /// `target_items` is `None` when target resolution failed; every
    /// candidate is then reported `false` rather than raising. A
    /// structurally invalid candidate is `false` as well and never aborts
    /// the batch.
    pub fn validate(target_items: Option<&[CatalogItem]>, candidates: &[Value]) -> ValidationReport {
        let results: Vec<(Value, bool)> = candidates
            .iter()
            .map(|raw| {
                let verdict = match target_items {
                    Some(items) => Candidate::parse(raw)
                        .map(|c| c.matches_any(items))
                        .unwrap_or(false),
                    None => false,
                };
                (raw.clone(), verdict)
            })
            .collect();

        ValidationReport {
            short_results: results.iter().map(|(_, v)| *v).collect(),
            results,
        }
    }
}

impl<'a> Candidate<'a> {
    /// Structural check: object shape, required fields, field types.
    fn parse(raw: &'a Value) -> Option<Self> {
        let object = raw.as_object()?;

        let code = object.get("code")?.as_str()?;
        let value = object.get("value")?.as_str()?;
        if code.is_empty() || value.is_empty() {
            return None;
        }

        Some(Self {
            code,
            value,
            identifier: optional_str(object.get("identifier"))?,
            parent_identifier: optional_str(object.get("parent_identifier"))?,
        })
    }

    /// Set membership: equal on every supplied field to at least one item.
    fn matches_any(&self, items: &[CatalogItem]) -> bool {
        items.iter().any(|item| {
            item.code == self.code
                && item.value == self.value
                && self.identifier.is_none_or(|s| item.identifier == s)
                && self
                    .parent_identifier
                    .is_none_or(|s| item.parent_identifier == s)
        })
    }
}

/// Absent field → `Some(None)`; present string → `Some(Some(_))`;
/// present non-string → `None` (structurally invalid).
fn optional_str(field: Option<&Value>) -> Option<Option<&str>> {
    match field {
        None => Some(None),
        Some(value) => value.as_str().map(Some),
    }
}
