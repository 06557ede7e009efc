//! The canonical filter record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Matches every source, or every field of a source.
pub const WILDCARD: &str = "*";

/// Operator carried by global free-text filters.
pub const GLOBAL_OPERATOR: &str = "contains";

/// One persisted query constraint.
///
/// `value` is always the canonical string form: scalars verbatim, ranges
/// as a compact JSON `{from, to}` object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub source: String,
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl Filter {
    pub fn new(
        source: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Filter {
            source: source.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// A free-text filter across all sources and fields.
    pub fn global(text: impl Into<String>) -> Self {
        Filter::new(WILDCARD, WILDCARD, GLOBAL_OPERATOR, text)
    }

    /// Returns `true` for filters on every source and every field.
    pub fn is_global(&self) -> bool {
        self.source == WILDCARD && self.field == WILDCARD
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} {}",
            self.source, self.field, self.operator, self.value
        )
    }
}
