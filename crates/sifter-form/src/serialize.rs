//! Conversion between draft values and stored filter values.
//!
//! Submission writes the storage form of a value: times as `HH:MM:SS`,
//! dates in the configured [`DateStorage`](sifter_engine::DateStorage)
//! form, ranges as a compact `{"from":..,"to":..}` object. Loading a
//! filter for editing goes the other way and produces what the inputs
//! display.

use sifter_engine::date::{display_date, to_storage_date};
use sifter_engine::{
    format_time_to_string, parse_time_string, DataType, EngineConfig, FilterValue, RangeValue,
    Resolution, Scope,
};
use tracing::warn;

fn serialize_time(text: &str) -> String {
    let time = parse_time_string(text);
    if time.is_none() {
        warn!(value = text, "time value does not parse, storing empty");
    }
    format_time_to_string(time.as_ref())
}

fn serialize_side(text: &str, scope: Scope, config: &EngineConfig) -> String {
    match scope {
        Scope::Time => serialize_time(text),
        Scope::Date => to_storage_date(text, config.date_storage),
        Scope::Option | Scope::Number | Scope::Default => text.to_string(),
    }
}

/// The stored string for a draft value under `data_type`.
///
/// Values of unknown fields are stringified as they are.
pub fn serialize_value(
    value: &FilterValue,
    data_type: Option<&DataType>,
    config: &EngineConfig,
) -> String {
    let scope = data_type.map_or(Scope::Default, |dt| dt.scope);
    match value {
        FilterValue::Range(range) => RangeValue::new(
            serialize_side(&range.from, scope, config),
            serialize_side(&range.to, scope, config),
        )
        .to_json(),
        FilterValue::Scalar(scalar) => {
            serialize_side(&scalar.to_canonical_string(), scope, config)
        }
    }
}

fn editable_side(text: &str, scope: Option<Scope>) -> String {
    match scope {
        Some(Scope::Date) => display_date(text).unwrap_or_else(|| text.to_string()),
        _ => text.to_string(),
    }
}

/// Decodes a stored value back into the form the inputs edit.
///
/// Dates are shown as `DD-MM-YYYY` whichever form they were stored in.
pub fn editable_value(stored: &str, resolution: &Resolution<'_>) -> FilterValue {
    let scope = resolution.scope();
    match FilterValue::from_stored(stored, resolution.is_range()) {
        FilterValue::Range(range) => FilterValue::Range(RangeValue::new(
            editable_side(&range.from, scope),
            editable_side(&range.to, scope),
        )),
        FilterValue::Scalar(scalar) => {
            FilterValue::from(editable_side(&scalar.to_canonical_string(), scope))
        }
    }
}
