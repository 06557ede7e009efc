//! Filter schema documents and lookups against them.
//!
//! A [`SchemaSnapshot`] pairs the list of [`Source`]s with the
//! [`FilterScheme`] describing each data type. Snapshots are immutable;
//! a new search result replaces the whole snapshot.
//!
//! Every lookup returns `None` on a miss. Callers treat a miss as "no
//! canonicalization possible" and fall back to raw handling.

use indexmap::IndexMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// The underlying kind of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Primitive {
    #[default]
    String,
    Number,
    Date,
    Time,
    Option,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Date => "date",
            Primitive::Time => "time",
            Primitive::Option => "option",
        }
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        match s.as_str() {
            "number" => Primitive::Number,
            "date" => Primitive::Date,
            "time" => Primitive::Time,
            "option" => Primitive::Option,
            _ => Primitive::String,
        }
    }
}

impl From<Primitive> for String {
    fn from(p: Primitive) -> Self {
        p.as_str().to_string()
    }
}

/// Selects the codec used to normalize and format values.
///
/// Unknown scope names read as [`Scope::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    Date,
    Time,
    Option,
    Number,
    #[default]
    Default,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Date => "date",
            Scope::Time => "time",
            Scope::Option => "option",
            Scope::Number => "number",
            Scope::Default => "default",
        }
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        match s.as_str() {
            "date" => Scope::Date,
            "time" => Scope::Time,
            "option" => Scope::Option,
            "number" => Scope::Number,
            _ => Scope::Default,
        }
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator a data type can be filtered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub display: String,
    /// Range operators take a `{from, to}` value.
    #[serde(default)]
    pub range: bool,
}

impl Operator {
    pub fn scalar(display: impl Into<String>) -> Self {
        Operator {
            display: display.into(),
            range: false,
        }
    }

    pub fn range(display: impl Into<String>) -> Self {
        Operator {
            display: display.into(),
            range: true,
        }
    }
}

/// Describes how values of one data type are compared and shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    #[serde(default)]
    pub primitive: Primitive,
    #[serde(default)]
    pub scope: Scope,
    /// Value to display label, for enumerated types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub filtering_operators: IndexMap<String, Operator>,
}

impl DataType {
    pub fn new(primitive: Primitive, scope: Scope) -> Self {
        DataType {
            primitive,
            scope,
            ..DataType::default()
        }
    }

    pub fn with_operator(mut self, id: impl Into<String>, operator: Operator) -> Self {
        self.filtering_operators.insert(id.into(), operator);
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options
            .get_or_insert_with(IndexMap::new)
            .insert(value.into(), label.into());
        self
    }

    pub fn operator(&self, id: &str) -> Option<&Operator> {
        self.filtering_operators.get(id)
    }

    /// The display label for an enumerated value, if declared.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|options| options.get(value))
            .map(String::as_str)
    }
}

/// All data types known to a schema, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterScheme {
    #[serde(default)]
    pub data_types: IndexMap<String, DataType>,
}

impl FilterScheme {
    pub fn with_data_type(mut self, id: impl Into<String>, data_type: DataType) -> Self {
        self.data_types.insert(id.into(), data_type);
        self
    }
}

/// A field within a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub display: String,
    /// Key into [`FilterScheme::data_types`].
    pub data_type: String,
}

impl Field {
    pub fn new(display: impl Into<String>, data_type: impl Into<String>) -> Self {
        Field {
            display: display.into(),
            data_type: data_type.into(),
        }
    }
}

/// A filterable data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub source: String,
    pub display: String,
    #[serde(default)]
    pub fields: IndexMap<String, Field>,
}

impl Source {
    pub fn new(source: impl Into<String>, display: impl Into<String>) -> Self {
        Source {
            source: source.into(),
            display: display.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, id: impl Into<String>, field: Field) -> Self {
        self.fields.insert(id.into(), field);
        self
    }
}

/// Looks up the data type declared for `field` of `source`.
pub fn get_data_type<'s>(
    source: &str,
    field: &str,
    sources: &'s [Source],
    scheme: &'s FilterScheme,
) -> Option<&'s DataType> {
    let Some(found) = sources.iter().find(|s| s.source == source) else {
        debug!(source, "unknown filter source");
        return None;
    };
    let Some(declared) = found.fields.get(field) else {
        debug!(source, field, "unknown field for source");
        return None;
    };
    let data_type = scheme.data_types.get(&declared.data_type);
    if data_type.is_none() {
        debug!(source, field, data_type = %declared.data_type, "unknown data type");
    }
    data_type
}

/// The data type and operator resolved for one filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolution<'s> {
    pub data_type: Option<&'s DataType>,
    pub operator: Option<&'s Operator>,
}

impl<'s> Resolution<'s> {
    pub fn is_range(&self) -> bool {
        self.operator.is_some_and(|op| op.range)
    }

    pub fn scope(&self) -> Option<Scope> {
        self.data_type.map(|dt| dt.scope)
    }
}

/// Sources plus scheme, as returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub scheme: FilterScheme,
}

impl SchemaSnapshot {
    pub fn new(sources: Vec<Source>, scheme: FilterScheme) -> Self {
        SchemaSnapshot { sources, scheme }
    }

    /// Decodes a snapshot from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn source(&self, source: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.source == source)
    }

    pub fn field(&self, source: &str, field: &str) -> Option<&Field> {
        self.source(source).and_then(|s| s.fields.get(field))
    }

    pub fn data_type(&self, source: &str, field: &str) -> Option<&DataType> {
        get_data_type(source, field, &self.sources, &self.scheme)
    }

    pub fn operator(&self, source: &str, field: &str, operator: &str) -> Option<&Operator> {
        let found = self.data_type(source, field)?.operator(operator);
        if found.is_none() {
            debug!(source, field, operator, "operator not defined for data type");
        }
        found
    }

    pub fn resolve(&self, source: &str, field: &str, operator: &str) -> Resolution<'_> {
        let data_type = self.data_type(source, field);
        let operator = data_type.and_then(|dt| dt.operator(operator));
        Resolution {
            data_type,
            operator,
        }
    }
}
