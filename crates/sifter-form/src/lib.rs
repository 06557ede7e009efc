//! Building filters from user input, and keeping them in step with search.
//!
//! `sifter-form` is the write path on top of [`sifter_engine`]: it turns a
//! sequence of user choices into a canonical [`Filter`](sifter_engine::Filter)
//! and applies schema updates from a search collaborator without letting a
//! stale response overwrite a newer one.
//!
//! # Quick Start
//!
//! ```
//! use sifter_engine::{
//!     DataType, EngineConfig, Field, FilterBoard, FilterScheme, Operator, Primitive,
//!     SchemaSnapshot, Scope, Source,
//! };
//! use sifter_form::FilterForm;
//!
//! let scheme = FilterScheme::default().with_data_type(
//!     "clock",
//!     DataType::new(Primitive::Time, Scope::Time)
//!         .with_operator("during", Operator::range("during")),
//! );
//! let shifts = Source::new("shifts", "Shifts").with_field("start", Field::new("Start", "clock"));
//! let mut board = FilterBoard::new(SchemaSnapshot::new(vec![shifts], scheme), EngineConfig::default());
//!
//! let mut form = FilterForm::new();
//! form.select_source("shifts");
//! form.select_field("start");
//! form.select_operator("during", board.schema());
//! form.set_range_from("09:00:00");
//! form.set_range_to("05:00:00 PM");
//! form.submit_to(&mut board).unwrap();
//!
//! assert_eq!(board.filters()[0].value, r#"{"from":"09:00:00","to":"17:00:00"}"#);
//! ```
//!
//! # Form Stages
//!
//! ```text
//! Empty ─source→ SourceChosen ─field→ FieldChosen ─operator→ OperatorChosen ─value→ Ready
//!   ↑                                                                                  │
//!   └─────────────────────────────────── submit ──────────────────────────────────────┘
//! ```
//!
//! Picking a different source clears field, operator and value. Picking a
//! different field clears operator and value. Switching between scalar and
//! range operators reshapes the value instead of clearing it.
//!
//! # Search
//!
//! [`SearchCoordinator`] numbers each request. Only the latest request's
//! result is returned, and nothing is returned once the host unmounts.

mod choices;
mod error;
mod form;
mod search;
mod serialize;

// Re-export public API
pub use choices::{
    field_choices, operator_choices, option_choices, source_choices, value_kind, Choice,
    ValueKind, ValueShape,
};
pub use error::{FormError, FormField, ValidationErrors};
pub use form::{FilterDraft, FilterForm, FormStage, ValuePart};
pub use search::{SearchCoordinator, SearchResult, SearchTicket};
pub use serialize::{editable_value, serialize_value};
