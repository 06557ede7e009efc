//! Selectable options for each step of the filter form.

use sifter_engine::{DataType, Primitive, SchemaSnapshot, Scope};

/// One selectable entry: an identifier and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn new(value: &str, label: &str) -> Self {
        Choice {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// The kind of input used to enter a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Date,
    Time,
    /// Pick one of the enumerated options.
    Choice(Vec<Choice>),
}

/// Shape of the value input for a chosen field and operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueShape {
    pub kind: ValueKind,
    /// Range operators take a `from` and a `to` input.
    pub range: bool,
}

pub fn source_choices(schema: &SchemaSnapshot) -> Vec<Choice> {
    schema
        .sources
        .iter()
        .map(|s| Choice::new(&s.source, &s.display))
        .collect()
}

pub fn field_choices(schema: &SchemaSnapshot, source: &str) -> Vec<Choice> {
    schema
        .source(source)
        .map(|s| {
            s.fields
                .iter()
                .map(|(id, field)| Choice::new(id, &field.display))
                .collect()
        })
        .unwrap_or_default()
}

pub fn operator_choices(schema: &SchemaSnapshot, source: &str, field: &str) -> Vec<Choice> {
    schema
        .data_type(source, field)
        .map(|dt| {
            dt.filtering_operators
                .iter()
                .map(|(id, op)| Choice::new(id, &op.display))
                .collect()
        })
        .unwrap_or_default()
}

pub fn option_choices(data_type: &DataType) -> Vec<Choice> {
    data_type
        .options
        .iter()
        .flatten()
        .map(|(value, label)| Choice::new(value, label))
        .collect()
}

/// The input kind selected by a data type's scope.
pub fn value_kind(data_type: &DataType) -> ValueKind {
    match data_type.scope {
        Scope::Date => ValueKind::Date,
        Scope::Time => ValueKind::Time,
        Scope::Option => ValueKind::Choice(option_choices(data_type)),
        Scope::Number => ValueKind::Number,
        Scope::Default if data_type.primitive == Primitive::Number => ValueKind::Number,
        Scope::Default => ValueKind::Text,
    }
}
