//! Comparison keys for filter values.
//!
//! [`normalize_filter_value`] maps a raw value to a string that is equal
//! for every way a user could have written the same constraint. The key
//! is only meant for comparison. It is neither the stored form nor the
//! displayed form.

use tracing::debug;

use crate::date;
use crate::filter::Filter;
use crate::schema::{DataType, SchemaSnapshot, Scope};
use crate::value::{number_to_string, parse_number, FilterValue, Scalar};

fn lower_trim(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Comparison key for `value` interpreted under `filter`'s schema entry.
///
/// Resolution order:
///
/// 1. No data type for `(source, field)`: the JSON encoding of `value`.
/// 2. Range operator with a range value: the compact range JSON.
/// 3. Otherwise by scope: dates to ISO-8601, numbers to their shortest
///    form, enumerated keys to their lowercased label, anything else
///    lowercased and trimmed.
pub fn normalize_filter_value(
    value: &FilterValue,
    filter: &Filter,
    schema: &SchemaSnapshot,
) -> String {
    let resolution = schema.resolve(&filter.source, &filter.field, &filter.operator);
    let Some(data_type) = resolution.data_type else {
        return value.to_json();
    };

    if let (true, FilterValue::Range(range)) = (resolution.is_range(), value) {
        return range.to_json();
    }

    normalize_scalar(value, data_type)
}

fn normalize_scalar(value: &FilterValue, data_type: &DataType) -> String {
    match (data_type.scope, value) {
        (Scope::Number, FilterValue::Scalar(Scalar::Number(n))) => number_to_string(*n),
        (Scope::Number, _) => number_to_string(parse_number(&value.to_stored_string())),
        (Scope::Date, _) => {
            let text = value.to_stored_string();
            date::canonical_date(&text).unwrap_or_else(|| {
                debug!(value = %text, "date filter value is not a recognizable date");
                lower_trim(&text)
            })
        }
        (Scope::Option, _) => {
            let text = value.to_stored_string();
            match data_type.option_label(&text) {
                Some(label) => lower_trim(label),
                None => lower_trim(&text),
            }
        }
        // Time values are already in storage form here.
        (Scope::Time, _) | (Scope::Default, _) => lower_trim(&value.to_stored_string()),
    }
}

/// Comparison key for the stored value of `filter`.
pub fn normalize_stored(filter: &Filter, schema: &SchemaSnapshot) -> String {
    let range = schema
        .operator(&filter.source, &filter.field, &filter.operator)
        .is_some_and(|op| op.range);
    let value = FilterValue::from_stored(&filter.value, range);
    normalize_filter_value(&value, filter, schema)
}

/// Comparison key for a global free-text value.
pub fn normalize_global(value: &str) -> String {
    lower_trim(value)
}
