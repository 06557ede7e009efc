//! Filter values.
//!
//! A filter carries either a single [`Scalar`] or a [`RangeValue`]. On the
//! wire both collapse to one canonical string: scalars verbatim, ranges as a
//! compact JSON object `{"from":..,"to":..}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single, non-range value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    /// Canonical string form. Numbers use the shortest round-trip notation.
    pub fn to_canonical_string(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Number(n) => number_to_string(*n),
        }
    }

    /// Returns `true` for text that is empty once trimmed. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Text(s) => s.trim().is_empty(),
            Scalar::Number(_) => false,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

/// Both ends of a range, each already in its type's canonical string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeValue {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl RangeValue {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        RangeValue {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns `true` only when both ends are present.
    pub fn is_complete(&self) -> bool {
        !self.from.trim().is_empty() && !self.to.trim().is_empty()
    }

    /// Compact JSON encoding with `from` before `to`.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "from": self.from, "to": self.to }).to_string()
    }

    /// Decodes a JSON `{from, to}` object. Missing ends decode as empty.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// A raw filter value: either a scalar or a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Range(RangeValue),
    Scalar(Scalar),
}

impl FilterValue {
    /// Decodes a stored filter value.
    ///
    /// For range operators a JSON `{from, to}` object becomes a
    /// [`FilterValue::Range`]. Everything else, including malformed range
    /// JSON, is kept as text.
    pub fn from_stored(value: &str, range: bool) -> Self {
        if range {
            match RangeValue::from_json(value) {
                Some(parsed) => return FilterValue::Range(parsed),
                None => debug!(value, "range filter value is not a JSON object"),
            }
        }
        FilterValue::Scalar(Scalar::Text(value.to_string()))
    }

    /// The canonical stored string for this value.
    pub fn to_stored_string(&self) -> String {
        match self {
            FilterValue::Scalar(scalar) => scalar.to_canonical_string(),
            FilterValue::Range(range) => range.to_json(),
        }
    }

    /// JSON encoding of the raw value, used when no schema is available.
    pub fn to_json(&self) -> String {
        match self {
            FilterValue::Scalar(Scalar::Text(s)) => serde_json::Value::from(s.as_str()).to_string(),
            FilterValue::Scalar(Scalar::Number(n)) => number_to_string(*n),
            FilterValue::Range(range) => range.to_json(),
        }
    }

    /// A value is empty when its text is blank or either range end is missing.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Scalar(scalar) => scalar.is_empty(),
            FilterValue::Range(range) => !range.is_complete(),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, FilterValue::Range(_))
    }

    pub fn as_range(&self) -> Option<&RangeValue> {
        match self {
            FilterValue::Range(range) => Some(range),
            FilterValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FilterValue::Scalar(scalar) => Some(scalar),
            FilterValue::Range(_) => None,
        }
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Scalar(Scalar::Text(String::new()))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stored_string())
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Scalar(Scalar::from(s))
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Scalar(Scalar::from(s))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Scalar(Scalar::Number(n))
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Scalar(Scalar::from(n))
    }
}

impl From<Scalar> for FilterValue {
    fn from(scalar: Scalar) -> Self {
        FilterValue::Scalar(scalar)
    }
}

impl From<RangeValue> for FilterValue {
    fn from(range: RangeValue) -> Self {
        FilterValue::Range(range)
    }
}

/// Formats a number the way a browser's `Number.prototype.toString` does.
///
/// Digits are the shortest that round-trip. Magnitudes below `1e-6` or
/// from `1e21` up use exponent form (`1e-7`, `1.5e+21`); everything else
/// is plain decimal. `-0` prints as `0`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    if n.fract() == 0.0 {
        return format!("{}", n as i128);
    }
    format!("{}", n)
}

/// Parses text as a number with browser `Number()` leniency: surrounding
/// whitespace is ignored and blank text is zero. Unparseable text is `NaN`.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}
