//! Semantic filter equality and the set operations built on it.
//!
//! Two filters are equal when their source, field and operator identifiers
//! match exactly and their values normalize to the same comparison key.
//! Global free-text filters compare by value alone.
//!
//! All operations are pure: they return a new sequence and keep the
//! relative order of every retained filter.

use tracing::{debug, warn};

use crate::config::UpdateMissPolicy;
use crate::filter::Filter;
use crate::normalize::{normalize_global, normalize_stored};
use crate::schema::SchemaSnapshot;

/// Compares and combines filters against one schema snapshot.
///
/// # Example
///
/// ```
/// use sifter_engine::{Filter, FilterMatcher, SchemaSnapshot};
///
/// let schema = SchemaSnapshot::default();
/// let matcher = FilterMatcher::new(&schema);
///
/// let filters = matcher.add(Filter::global("invoice"), &[]);
/// let filters = matcher.add(Filter::global("  INVOICE "), &filters);
/// assert_eq!(filters.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterMatcher<'s> {
    schema: &'s SchemaSnapshot,
    update_miss: UpdateMissPolicy,
}

impl<'s> FilterMatcher<'s> {
    pub fn new(schema: &'s SchemaSnapshot) -> Self {
        FilterMatcher {
            schema,
            update_miss: UpdateMissPolicy::default(),
        }
    }

    /// Sets what [`update`](Self::update) does when the original is gone.
    pub fn with_update_miss(mut self, policy: UpdateMissPolicy) -> Self {
        self.update_miss = policy;
        self
    }

    pub fn schema(&self) -> &'s SchemaSnapshot {
        self.schema
    }

    /// Returns `true` when `a` and `b` express the same constraint.
    pub fn filters_match(&self, a: &Filter, b: &Filter) -> bool {
        if a.is_global() && b.is_global() {
            return normalize_global(&a.value) == normalize_global(&b.value);
        }
        a.source == b.source
            && a.field == b.field
            && a.operator == b.operator
            && normalize_stored(a, self.schema) == normalize_stored(b, self.schema)
    }

    /// Returns `true` if any filter in `existing` matches `candidate`.
    pub fn is_duplicate(&self, candidate: &Filter, existing: &[Filter]) -> bool {
        existing.iter().any(|f| self.filters_match(candidate, f))
    }

    /// Appends `filter` unless it duplicates an existing one.
    pub fn add(&self, filter: Filter, current: &[Filter]) -> Vec<Filter> {
        if self.is_duplicate(&filter, current) {
            debug!(%filter, "ignoring duplicate filter");
            return current.to_vec();
        }
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend_from_slice(current);
        next.push(filter);
        next
    }

    /// Replaces the first filter matching `previous` with `updated`.
    ///
    /// If `updated` duplicates one of the other filters, the matched
    /// filter is removed instead so the result holds no duplicates. When
    /// nothing matches, the configured [`UpdateMissPolicy`] decides
    /// whether `updated` is appended or discarded.
    pub fn update(&self, previous: &Filter, updated: Filter, current: &[Filter]) -> Vec<Filter> {
        let position = current.iter().position(|f| self.filters_match(previous, f));
        match position {
            Some(index) => {
                let collides = current
                    .iter()
                    .enumerate()
                    .any(|(i, f)| i != index && self.filters_match(&updated, f));
                let mut next = current.to_vec();
                if collides {
                    debug!(%previous, %updated, "updated filter duplicates another, removing original");
                    next.remove(index);
                } else {
                    next[index] = updated;
                }
                next
            }
            None => match self.update_miss {
                UpdateMissPolicy::Append => {
                    warn!(%previous, %updated, "updated filter not found, appending");
                    self.add(updated, current)
                }
                UpdateMissPolicy::Drop => {
                    warn!(%previous, %updated, "updated filter not found, discarding");
                    current.to_vec()
                }
            },
        }
    }

    /// Removes every filter matching `target`.
    pub fn remove(&self, target: &Filter, current: &[Filter]) -> Vec<Filter> {
        current
            .iter()
            .filter(|f| !self.filters_match(target, f))
            .cloned()
            .collect()
    }
}
