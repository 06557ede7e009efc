//! Sifter - schema-driven filter normalization and matching.
//!
//! Sifter keeps a list of user-built filters consistent with a schema
//! describing the data they apply to. It provides:
//!
//! - Codecs for wall-clock times (`HH:MM:SS`) and display dates (`DD-MM-YYYY`)
//! - Lookup of a field's data type and operator in a [`SchemaSnapshot`]
//! - Comparison keys that treat equivalent values as equal (`"007"` and `7`)
//! - Duplicate detection, add, update and remove over ordered filter lists
//!
//! # Quick Start
//!
//! ```rust
//! use sifter_engine::{
//!     DataType, Field, Filter, FilterMatcher, FilterScheme, Operator, Primitive,
//!     SchemaSnapshot, Scope, Source,
//! };
//!
//! let scheme = FilterScheme::default().with_data_type(
//!     "money",
//!     DataType::new(Primitive::Number, Scope::Number)
//!         .with_operator("eq", Operator::scalar("equals")),
//! );
//! let orders = Source::new("orders", "Orders")
//!     .with_field("amount", Field::new("Amount", "money"));
//! let schema = SchemaSnapshot::new(vec![orders], scheme);
//!
//! let matcher = FilterMatcher::new(&schema);
//! let filters = matcher.add(Filter::new("orders", "amount", "eq", "7"), &[]);
//!
//! // "007" and "7" are the same number, so this is a duplicate.
//! let filters = matcher.add(Filter::new("orders", "amount", "eq", "007"), &filters);
//! assert_eq!(filters.len(), 1);
//! ```
//!
//! # Value Normalization
//!
//! | Scope | Comparison key |
//! |-------|----------------|
//! | `number` | shortest numeric form (`"007"` → `"7"`, junk → `"NaN"`) |
//! | `date` | ISO-8601 UTC instant, or lowercased text if unparseable |
//! | `time` | lowercased, trimmed `HH:MM:SS` |
//! | `option` | lowercased display label of the option key |
//! | default | lowercased, trimmed text |
//!
//! Range operators compare their compact `{"from":..,"to":..}` JSON, and
//! filters whose field is unknown to the schema compare by the JSON
//! encoding of their raw value.
//!
//! # Error Policy
//!
//! Malformed values never produce errors. Parsers return `None`, formatters
//! return empty or placeholder strings, and every fallback is traced with
//! the `tracing` crate. Only decoding of configuration and schema documents
//! returns [`SifterError`].

mod board;
mod config;
pub mod date;
mod display;
mod error;
mod filter;
mod matcher;
mod normalize;
mod schema;
pub mod time;
mod value;

// Re-export public API
pub use board::FilterBoard;
pub use config::{EngineConfig, UpdateMissPolicy};
pub use date::{convert_to_iso_date, DateInput, DateStorage};
pub use display::{describe_filter, display_value, FilterLabel};
pub use error::{Result, SifterError};
pub use filter::{Filter, GLOBAL_OPERATOR, WILDCARD};
pub use matcher::FilterMatcher;
pub use normalize::{normalize_filter_value, normalize_global, normalize_stored};
pub use schema::{
    get_data_type, DataType, Field, FilterScheme, Operator, Primitive, Resolution,
    SchemaSnapshot, Scope, Source,
};
pub use time::{
    clamp_time, decrement_time_value, format_time, format_time_to_string,
    increment_time_value, is_time_in_range, parse_time_range, parse_time_string, Period, Time,
    TimeFormat, TimeRange, TimeUnit,
};
pub use value::{number_to_string, parse_number, FilterValue, RangeValue, Scalar};
