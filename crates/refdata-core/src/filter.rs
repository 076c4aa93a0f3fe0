//! Relevant-date reduction over catalog listings.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::Catalog;
use crate::resolve::version_order;

/// Reduce a multi-identifier listing to the versions relevant on a date.
///
/// With `as_of` unset this is a pass-through: callers distinguish "no date
/// filter requested" from "filter to empty". With a date, catalogs
/// effective after it are dropped, then exactly one catalog per identifier
/// survives: the maximum by effective date (resolver tie-break on equal
/// dates). Identifiers whose versions are all in the future contribute
/// nothing. First-seen identifier order is preserved; any further sorting
/// is the caller's concern.
pub fn relevant_on(catalogs: Vec<Catalog>, as_of: Option<NaiveDate>) -> Vec<Catalog> {
    let Some(as_of) = as_of else {
        return catalogs;
    };

    let mut order = Vec::new();
    let mut best: HashMap<String, Catalog> = HashMap::new();

    for catalog in catalogs {
        if catalog.effective_date > as_of {
            continue;
        }
        match best.entry(catalog.identifier.clone()) {
            Entry::Vacant(slot) => {
                order.push(catalog.identifier.clone());
                slot.insert(catalog);
            }
            Entry::Occupied(mut slot) => {
                if version_order(&catalog) > version_order(slot.get()) {
                    slot.insert(catalog);
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|identifier| best.remove(&identifier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog(id: u64, identifier: &str, version: &str, effective: NaiveDate) -> Catalog {
        Catalog {
            id,
            identifier: identifier.to_string(),
            version: version.to_string(),
            name: String::new(),
            short_name: String::new(),
            description: String::new(),
            effective_date: effective,
        }
    }

    #[test]
    fn test_keeps_latest_version_per_identifier() {
        let input = vec![
            catalog(1, "x", "1.0", date(2021, 1, 1)),
            catalog(2, "x", "2.0", date(2021, 6, 1)),
            catalog(3, "y", "1.0", date(2021, 3, 1)),
        ];

        let out = relevant_on(input, Some(date(2021, 5, 1)));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, 1); // x@2021-01-01: 2.0 is still in the future
        assert_eq!(out[1].id, 3); // y@2021-03-01
    }

    #[test]
    fn test_no_date_is_a_pass_through() {
        let input = vec![
            catalog(1, "x", "1.0", date(2021, 1, 1)),
            catalog(2, "x", "2.0", date(2021, 6, 1)),
        ];

        let out = relevant_on(input.clone(), None);
        assert_eq!(out, input);
    }

    #[test]
    fn test_all_future_versions_mean_absence() {
        let input = vec![
            catalog(1, "x", "1.0", date(2022, 1, 1)),
            catalog(2, "y", "1.0", date(2021, 1, 1)),
        ];

        let out = relevant_on(input, Some(date(2021, 6, 1)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].identifier, "y");
    }

    #[test]
    fn test_empty_input() {
        assert!(relevant_on(Vec::new(), Some(date(2021, 1, 1))).is_empty());
        assert!(relevant_on(Vec::new(), None).is_empty());
    }

    #[test]
    fn test_equal_dates_break_by_version() {
        let input = vec![
            catalog(1, "x", "1.0", date(2021, 1, 1)),
            catalog(2, "x", "1.1", date(2021, 1, 1)),
        ];

        let out = relevant_on(input, Some(date(2021, 2, 1)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].version, "1.1");
    }
}
