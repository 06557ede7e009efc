//! An owned filter sequence that reports changes.

use std::fmt;

use crate::config::EngineConfig;
use crate::filter::Filter;
use crate::matcher::FilterMatcher;
use crate::schema::SchemaSnapshot;

type Listener = Box<dyn FnMut(&[Filter]) + Send>;

/// Holds the active filters together with the schema they refer to.
///
/// Each mutation runs the matching set operation from [`FilterMatcher`]
/// and invokes the change listener only when the sequence differs from
/// what it was before.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use sifter_engine::{EngineConfig, Filter, FilterBoard, SchemaSnapshot};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut board = FilterBoard::new(SchemaSnapshot::default(), EngineConfig::default())
///     .on_change(move |filters| sink.lock().unwrap().push(filters.len()));
///
/// board.add(Filter::global("abc"));
/// board.add(Filter::global("ABC")); // duplicate, no notification
/// board.clear();
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
/// ```
pub struct FilterBoard {
    filters: Vec<Filter>,
    schema: SchemaSnapshot,
    config: EngineConfig,
    listener: Option<Listener>,
}

impl FilterBoard {
    pub fn new(schema: SchemaSnapshot, config: EngineConfig) -> Self {
        FilterBoard {
            filters: Vec::new(),
            schema,
            config,
            listener: None,
        }
    }

    /// Registers the callback invoked with the new sequence after a change.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&[Filter]) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn matcher(&self) -> FilterMatcher<'_> {
        FilterMatcher::new(&self.schema).with_update_miss(self.config.update_miss)
    }

    fn commit(&mut self, next: Vec<Filter>) -> bool {
        if next == self.filters {
            return false;
        }
        self.filters = next;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.filters);
        }
        true
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.matcher().is_duplicate(filter, &self.filters)
    }

    /// Adds `filter` unless it duplicates one already present.
    pub fn add(&mut self, filter: Filter) -> bool {
        let next = self.matcher().add(filter, &self.filters);
        self.commit(next)
    }

    pub fn update(&mut self, previous: &Filter, updated: Filter) -> bool {
        let next = self.matcher().update(previous, updated, &self.filters);
        self.commit(next)
    }

    pub fn remove(&mut self, target: &Filter) -> bool {
        let next = self.matcher().remove(target, &self.filters);
        self.commit(next)
    }

    pub fn clear(&mut self) -> bool {
        self.commit(Vec::new())
    }

    /// Replaces the whole sequence, e.g. with filters restored from a search.
    pub fn set_filters(&mut self, filters: Vec<Filter>) -> bool {
        self.commit(filters)
    }

    /// Swaps in a new schema snapshot. Existing filters are kept as they are.
    pub fn replace_schema(&mut self, schema: SchemaSnapshot) {
        self.schema = schema;
    }
}

impl fmt::Debug for FilterBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBoard")
            .field("filters", &self.filters)
            .field("sources", &self.schema.sources.len())
            .field("config", &self.config)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
