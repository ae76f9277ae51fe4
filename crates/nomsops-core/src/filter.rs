//! The generic filter-form engine.
//!
//! A form is a static table of field specs plus three kinds of hooks:
//!
//! - resolvers: cross-field cleaning steps run after per-field cleaning,
//!   e.g. clearing bank-detail fields unless the payment method selects
//!   them;
//! - describe hooks: produce human-readable "chip" descriptions for a
//!   filter group and claim the fields they covered so the generic
//!   `Label: value` fallback skips them;
//! - predicate hooks: per record, either reject it outright
//!   (`StopFiltering`) or pass and mark the fields they fully handled so
//!   the generic equality fallback skips them.
//!
//! Evaluation is a pure function of the cleaned query state and the
//! record slice: clean, describe, filter, then a stable sort on the
//! resolved ordering key.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::fields::{FieldKind, FieldSpec};
use crate::query::{combine_split_date, QueryState, SortSpec};
use crate::records::Record;
use crate::types::{Choices, FieldValue};

/// Returned by a predicate hook to reject the record under evaluation.
/// Only that record is dropped; the request carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record rejected by filter")]
pub struct StopFiltering;

/// A removable filter chip: human-readable label plus the query string
/// that removes exactly this filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDescription {
    pub label: String,
    pub removal_query: String,
}

/// Statically registered description hook for one filter group
pub struct DescribeHook {
    /// Fields this hook covers; the generic fallback skips them whether
    /// or not the hook emitted anything
    pub claims: &'static [&'static str],
    pub describe: fn(&QueryState, &mut Vec<FilterDescription>),
}

/// Statically registered predicate hook for one filter group
pub struct PredicateHook<R: Record> {
    /// Fields this hook fully handles; the equality fallback skips them
    pub handles: &'static [&'static str],
    pub test: fn(&QueryState, &R) -> Result<(), StopFiltering>,
}

/// A complete filter form: field specs, ordering choices and the hook
/// tables, all registered statically
pub struct FormSpec<R: Record + 'static> {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    /// Valid `ordering` values with their human labels
    pub ordering_choices: Choices,
    pub default_ordering: &'static str,
    pub resolvers: &'static [fn(&mut QueryState)],
    pub describers: &'static [DescribeHook],
    pub predicates: &'static [PredicateHook<R>],
    /// Named field groups, used to open the matching form sections
    pub sections: &'static [(&'static str, &'static [&'static str])],
}

/// Everything a view needs from one evaluation
#[derive(Debug)]
pub struct FilterOutcome<R> {
    pub query: QueryState,
    pub objects: Vec<R>,
    pub descriptions: Vec<FilterDescription>,
}

impl<R: Record + 'static> FormSpec<R> {
    /// Clean the raw query parameters into a typed query state.
    ///
    /// Invalid values are dropped, not reported: the prototype favours
    /// permissive filtering over strict error surfacing.
    pub fn parse_query(&self, raw: &HashMap<String, String>) -> QueryState {
        let mut query = QueryState::new(SortSpec::parse(self.default_ordering));

        for spec in self.fields {
            let submitted = raw
                .get(spec.name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .or_else(|| {
                    if matches!(spec.kind, FieldKind::Date) {
                        combine_split_date(raw, spec.name)
                    } else {
                        None
                    }
                });
            let Some(submitted) = submitted else { continue };
            match spec.clean(&submitted) {
                Ok(value) => query.insert(spec.name, value),
                Err(err) => {
                    log::debug!(
                        "{}: discarding invalid value for {}: {}",
                        self.name,
                        spec.name,
                        err
                    );
                }
            }
        }

        for resolve in self.resolvers {
            resolve(&mut query);
        }

        if let Some(submitted) = raw.get("ordering").filter(|value| !value.is_empty()) {
            if self
                .ordering_choices
                .iter()
                .any(|(key, _)| *key == submitted.as_str())
            {
                query.insert("ordering", FieldValue::text(submitted.clone()));
                query.set_sort(SortSpec::parse(submitted));
            } else {
                log::debug!("{}: discarding unknown ordering {}", self.name, submitted);
            }
        }

        query
    }

    /// Chip descriptions for every active filter: group hooks first,
    /// then a generic `Label: value` entry for each unclaimed field
    pub fn descriptions(&self, query: &QueryState) -> Vec<FilterDescription> {
        let mut described: HashSet<&str> = HashSet::new();
        described.insert("ordering");

        let mut descriptions = Vec::new();
        for hook in self.describers {
            (hook.describe)(query, &mut descriptions);
            described.extend(hook.claims.iter().copied());
        }

        for spec in self.fields {
            if described.contains(spec.name) {
                continue;
            }
            let Some(value) = query.get(spec.name) else { continue };
            descriptions.push(FilterDescription {
                label: format!("{}: {}", spec.label, value.query_value()),
                removal_query: query.query_string_without(&[spec.name]),
            });
        }

        descriptions
    }

    /// Whether a record satisfies every active filter
    fn matches(&self, query: &QueryState, record: &R) -> bool {
        let mut handled: HashSet<&str> = HashSet::new();
        handled.insert("ordering");

        for hook in self.predicates {
            match (hook.test)(query, record) {
                Ok(()) => handled.extend(hook.handles.iter().copied()),
                Err(StopFiltering) => return false,
            }
        }

        for spec in self.fields {
            if handled.contains(spec.name) {
                continue;
            }
            let Some(expected) = query.get(spec.name) else { continue };
            match record.field(spec.name) {
                Some(actual) if actual == *expected => {}
                _ => return false,
            }
        }

        true
    }

    /// Filter and sort the record list.
    ///
    /// The sort is stable and the comparator is reversed for descending
    /// orderings, so ties keep the source list's original order either
    /// way (source lists are pre-sorted by a stable primary key).
    pub fn evaluate(&self, query: &QueryState, records: &[R]) -> Vec<R> {
        let mut objects: Vec<R> = records
            .iter()
            .filter(|record| self.matches(query, record))
            .cloned()
            .collect();

        let sort = query.sort().clone();
        objects.sort_by(|a, b| {
            let ordering = match (a.field(&sort.key), b.field(&sort.key)) {
                (Some(x), Some(y)) => x.compare(&y),
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (None, None) => std::cmp::Ordering::Equal,
            };
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        objects
    }

    /// Clean, filter, sort and describe in one call
    pub fn apply(&self, raw: &HashMap<String, String>, records: &[R]) -> FilterOutcome<R> {
        let query = self.parse_query(raw);
        let objects = self.evaluate(&query, records);
        let descriptions = self.descriptions(&query);
        FilterOutcome {
            query,
            objects,
            descriptions,
        }
    }

    /// Whether any field of the named section is active, used to keep
    /// that section of the form open
    pub fn is_section_selected(&self, query: &QueryState, section: &str) -> bool {
        self.sections
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, fields)| fields.iter().any(|field| query.is_active(field)))
            .unwrap_or(false)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

// ==================== Tests ====================
