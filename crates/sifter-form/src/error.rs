//! Error types for the filter form.

use std::collections::BTreeMap;
use std::fmt;

/// A part of the filter form that can carry an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Source,
    Field,
    Operator,
    Value,
    RangeFrom,
    RangeTo,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Source => "source",
            FormField::Field => "field",
            FormField::Operator => "operator",
            FormField::Value => "value",
            FormField::RangeFrom => "from",
            FormField::RangeTo => "to",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message per field wins.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors returned when a filter draft cannot be submitted.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// One or more fields failed validation.
    #[error("filter is incomplete: {0}")]
    Invalid(ValidationErrors),
}

impl FormError {
    /// The field-level messages behind this error.
    pub fn errors(&self) -> &ValidationErrors {
        match self {
            FormError::Invalid(errors) => errors,
        }
    }
}
