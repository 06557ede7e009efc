//! Debounced search requests whose results apply only while current.
//!
//! Every request takes a ticket from a [`SearchCoordinator`]. A newer
//! request supersedes older ones, and unmounting the host supersedes
//! all of them. Results carrying a stale ticket are dropped.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sifter_engine::{EngineConfig, Filter, FilterBoard, SchemaSnapshot};
use tracing::{debug, warn};

/// What the search collaborator returns: a fresh schema and optionally
/// the filters to show with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub schema: SchemaSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
}

impl SearchResult {
    /// Decodes a `{sources, scheme, filters?}` document.
    pub fn from_json(json: &str) -> sifter_engine::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Installs the schema on `board` and, when present, its filters.
    ///
    /// Returns whether the filter sequence changed.
    pub fn apply(self, board: &mut FilterBoard) -> bool {
        board.replace_schema(self.schema);
        match self.filters {
            Some(filters) => board.set_filters(filters),
            None => false,
        }
    }
}

/// Identifies one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Orders search requests and gates their results.
#[derive(Debug)]
pub struct SearchCoordinator {
    generation: AtomicU64,
    mounted: AtomicBool,
    debounce: Duration,
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SearchCoordinator {
    pub fn new(debounce: Duration) -> Self {
        SearchCoordinator {
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
            debounce,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(Duration::from_millis(config.search_debounce_ms))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn begin(&self, query: impl Into<String>) -> SearchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            generation,
            query: query.into(),
        }
    }

    /// Returns `true` while `ticket` is the latest and the host is mounted.
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.mounted.load(Ordering::SeqCst)
            && self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Marks the host as gone. Results arriving afterwards are discarded.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Gates a collaborator outcome on `ticket`.
    ///
    /// A failed request is logged and yields no result.
    pub fn accept<E: Display>(
        &self,
        ticket: &SearchTicket,
        outcome: Result<SearchResult, E>,
    ) -> Option<SearchResult> {
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "search request failed");
                return None;
            }
        };
        if !self.is_current(ticket) {
            debug!(
                query = %ticket.query,
                generation = ticket.generation,
                "discarding stale search result"
            );
            return None;
        }
        Some(result)
    }

    /// Waits out the debounce interval, then runs `fetch` for `query`.
    ///
    /// Returns `None` if another request started during the wait, if the
    /// host unmounted, or if `fetch` failed.
    pub async fn run<F, Fut, E>(&self, query: impl Into<String>, fetch: F) -> Option<SearchResult>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<SearchResult, E>>,
        E: Display,
    {
        let ticket = self.begin(query);
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if !self.is_current(&ticket) {
                debug!(query = %ticket.query, "search superseded before sending");
                return None;
            }
        }
        let outcome = fetch(ticket.query.clone()).await;
        self.accept(&ticket, outcome)
    }
}
