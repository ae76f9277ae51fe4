//! Typed query state derived once per request from the raw query string

use chrono::NaiveDate;

use crate::types::FieldValue;

/// A resolved ordering key and direction.
///
/// Submitted as a single `ordering` value where a leading `-` marks a
/// descending sort, e.g. `-received_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(key) => SortSpec {
                key: key.to_string(),
                descending: true,
            },
            None => SortSpec {
                key: raw.to_string(),
                descending: false,
            },
        }
    }

    /// The `ordering` query value this spec round-trips to
    pub fn query_value(&self) -> String {
        if self.descending {
            format!("-{}", self.key)
        } else {
            self.key.clone()
        }
    }
}

/// The cleaned mapping of field name to submitted value, in form-field
/// order, plus the resolved sort.
///
/// Only non-empty, successfully cleaned values are ever inserted, so
/// presence in the map is what "active filter" means. The `ordering`
/// entry is kept in the map (when the request supplied a valid choice)
/// so reconstructed query strings preserve it, but it is never treated
/// as a filter.
#[derive(Debug, Clone)]
pub struct QueryState {
    values: Vec<(&'static str, FieldValue)>,
    sort: SortSpec,
}

impl QueryState {
    pub fn new(default_sort: SortSpec) -> Self {
        QueryState {
            values: Vec::new(),
            sort: default_sort,
        }
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Insert a cleaned value, replacing any earlier value for the field
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        if let Some(entry) = self.values.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
        } else {
            self.values.push((name, value));
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.values.retain(|(key, _)| *key != name);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(FieldValue::as_date)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether any filter beyond the ordering is in effect
    pub fn is_filtered(&self) -> bool {
        self.values.iter().any(|(key, _)| *key != "ordering")
    }

    /// Active field names in insertion (form-field) order
    pub fn active_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(key, _)| *key)
    }

    /// Reconstruct the full query string
    pub fn query_string(&self) -> String {
        self.query_string_without(&[])
    }

    /// Reconstruct the query string with the given fields removed; this
    /// is what a filter chip links to
    pub fn query_string_without(&self, excluded: &[&str]) -> String {
        self.values
            .iter()
            .filter(|(key, _)| !excluded.contains(key))
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.query_value())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Merge a GOV.UK-style split date submission (`field_0`/`field_1`/
/// `field_2` = day/month/year) into a single `YYYY-MM-DD` candidate.
///
/// An explicit pre-parse step: the combined value still goes through
/// the normal date cleaner and is dropped if the parts do not form a
/// date.
pub fn combine_split_date(
    raw: &std::collections::HashMap<String, String>,
    field: &str,
) -> Option<String> {
    let part = |index: usize| {
        raw.get(&format!("{}_{}", field, index))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };
    let (day, month, year) = (part(0)?, part(1)?, part(2)?);
    Some(format!("{:0>4}-{:0>2}-{:0>2}", year, month, day))
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sort_spec_parse() {
        let ascending = SortSpec::parse("amount");
        assert_eq!(ascending.key, "amount");
        assert!(!ascending.descending);

        let descending = SortSpec::parse("-received_at");
        assert_eq!(descending.key, "received_at");
        assert!(descending.descending);
        assert_eq!(descending.query_value(), "-received_at");
    }

    #[test]
    fn test_insert_preserves_order_and_replaces() {
        let mut query = QueryState::new(SortSpec::parse("-received_at"));
        query.insert("status", FieldValue::text("pending"));
        query.insert("prison", FieldValue::text("BXI"));
        query.insert("status", FieldValue::text("credited"));

        let fields: Vec<_> = query.active_fields().collect();
        assert_eq!(fields, vec!["status", "prison"]);
        assert_eq!(query.text("status"), Some("credited"));
    }

    #[test]
    fn test_query_string_without_excludes_only_named_fields() {
        let mut query = QueryState::new(SortSpec::parse("-received_at"));
        query.insert("status", FieldValue::text("pending"));
        query.insert("prison", FieldValue::text("BXI"));
        query.insert("ordering", FieldValue::text("-amount"));

        assert_eq!(
            query.query_string_without(&["status"]),
            "prison=BXI&ordering=-amount"
        );
        assert_eq!(
            query.query_string(),
            "status=pending&prison=BXI&ordering=-amount"
        );
    }

    #[test]
    fn test_query_string_encodes_values() {
        let mut query = QueryState::new(SortSpec::parse("sender_name"));
        query.insert("sender_name", FieldValue::text("Mary Stevenson"));
        assert_eq!(query.query_string(), "sender_name=Mary%20Stevenson");
    }

    #[test]
    fn test_is_filtered_ignores_ordering() {
        let mut query = QueryState::new(SortSpec::parse("-received_at"));
        assert!(!query.is_filtered());
        query.insert("ordering", FieldValue::text("amount"));
        assert!(!query.is_filtered());
        query.insert("status", FieldValue::text("pending"));
        assert!(query.is_filtered());
    }

    #[test]
    fn test_combine_split_date() {
        let mut raw = HashMap::new();
        raw.insert("received_at__gte_0".to_string(), "13".to_string());
        raw.insert("received_at__gte_1".to_string(), "2".to_string());
        raw.insert("received_at__gte_2".to_string(), "2018".to_string());

        assert_eq!(
            combine_split_date(&raw, "received_at__gte"),
            Some("2018-02-13".to_string())
        );
        assert_eq!(combine_split_date(&raw, "received_at__lt"), None);
    }
}
