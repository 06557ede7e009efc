//! Human-readable labels for filters.

use crate::config::EngineConfig;
use crate::date;
use crate::filter::Filter;
use crate::schema::{DataType, SchemaSnapshot, Scope};
use crate::time::{format_time, parse_time_string};
use crate::value::FilterValue;

const ALL_SOURCES: &str = "All sources";
const ALL_FIELDS: &str = "All fields";

/// Display labels for each part of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLabel {
    pub source: String,
    pub field: String,
    pub operator: String,
    pub value: String,
}

fn display_scalar(text: &str, data_type: &DataType, config: &EngineConfig) -> String {
    match data_type.scope {
        Scope::Time => match parse_time_string(text) {
            Some(time) => format_time(Some(&time), config.time_format),
            None => text.to_string(),
        },
        Scope::Date => date::display_date(text).unwrap_or_else(|| text.to_string()),
        Scope::Option => data_type
            .option_label(text)
            .map_or_else(|| text.to_string(), str::to_string),
        Scope::Number | Scope::Default => text.to_string(),
    }
}

/// The display string for a filter's stored value.
///
/// Ranges render as `"<from> - <to>"` with each end formatted for its
/// type. Values without a schema entry are shown verbatim.
pub fn display_value(filter: &Filter, schema: &SchemaSnapshot, config: &EngineConfig) -> String {
    let resolution = schema.resolve(&filter.source, &filter.field, &filter.operator);
    let Some(data_type) = resolution.data_type else {
        return filter.value.clone();
    };
    match FilterValue::from_stored(&filter.value, resolution.is_range()) {
        FilterValue::Range(range) => format!(
            "{} - {}",
            display_scalar(&range.from, data_type, config),
            display_scalar(&range.to, data_type, config)
        ),
        FilterValue::Scalar(scalar) => {
            display_scalar(&scalar.to_canonical_string(), data_type, config)
        }
    }
}

/// Labels for every part of `filter`, falling back to raw identifiers.
pub fn describe_filter(filter: &Filter, schema: &SchemaSnapshot, config: &EngineConfig) -> FilterLabel {
    if filter.is_global() {
        return FilterLabel {
            source: ALL_SOURCES.to_string(),
            field: ALL_FIELDS.to_string(),
            operator: filter.operator.clone(),
            value: filter.value.clone(),
        };
    }

    let source = schema
        .source(&filter.source)
        .map_or_else(|| filter.source.clone(), |s| s.display.clone());
    let field = schema
        .field(&filter.source, &filter.field)
        .map_or_else(|| filter.field.clone(), |f| f.display.clone());
    let operator = schema
        .resolve(&filter.source, &filter.field, &filter.operator)
        .operator
        .map_or_else(|| filter.operator.clone(), |op| op.display.clone());

    FilterLabel {
        source,
        field,
        operator,
        value: display_value(filter, schema, config),
    }
}
