//! Calendar dates between display form and ISO-8601.
//!
//! The display form is `DD-MM-YYYY`. Dates coming from display input are
//! anchored at local noon so that converting them to a UTC instant never
//! moves them onto the previous or next calendar day.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::value::RangeValue;

static DISPLAY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("valid display date pattern"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid ISO date pattern"));

/// Format string for the display form.
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// How a submitted date is written into a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStorage {
    /// `DD-MM-YYYY`
    #[default]
    Display,
    /// `YYYY-MM-DD`
    Iso,
}

/// Input accepted by [`convert_to_iso_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Range {
        from: Option<&'a str>,
        to: Option<&'a str>,
    },
    Missing,
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for DateInput<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(DateInput::Missing, DateInput::Text)
    }
}

impl<'a> From<&'a RangeValue> for DateInput<'a> {
    fn from(range: &'a RangeValue) -> Self {
        DateInput::Range {
            from: Some(range.from.as_str()),
            to: Some(range.to.as_str()),
        }
    }
}

impl<'a> DateInput<'a> {
    /// The text to convert. Ranges prefer `from` and fall back to `to`.
    fn text(self) -> &'a str {
        match self {
            DateInput::Text(s) => s,
            DateInput::Range { from, to } => from
                .filter(|s| !s.trim().is_empty())
                .or(to)
                .unwrap_or(""),
            DateInput::Missing => "",
        }
    }
}

/// Parses `DD-MM-YYYY` into a calendar date.
pub fn parse_display_date(input: &str) -> Option<NaiveDate> {
    let caps = DISPLAY_DATE.captures(input.trim())?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The instant at 12:00 local time on `date`.
pub fn local_noon(date: NaiveDate) -> Option<DateTime<Local>> {
    let noon = date.and_hms_opt(12, 0, 0)?;
    Local.from_local_datetime(&noon).earliest()
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-01T11:00:00.000Z`.
pub fn to_iso_string<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts a display date (or the preferred end of a range) to ISO-8601.
///
/// Anything that is not a valid `DD-MM-YYYY` date falls back to the
/// current instant so that form rendering always has a value to show.
pub fn convert_to_iso_date<'a>(input: impl Into<DateInput<'a>>) -> String {
    let text = input.into().text();
    match parse_display_date(text).and_then(local_noon) {
        Some(instant) => to_iso_string(&instant),
        None => {
            warn!(input = text, "unparseable display date, using current date");
            to_iso_string(&Local::now())
        }
    }
}

/// Parses an ISO-8601 date or date-time.
///
/// RFC 3339 values keep their offset. Date-times without an offset are
/// read as local time, and bare `YYYY-MM-DD` dates are anchored at local
/// noon like display dates.
pub fn parse_iso_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc));
    }
    if ISO_DATE.is_match(input) {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        return local_noon(date).map(|local| local.with_timezone(&Utc));
    }
    None
}

/// Reads either date form into a UTC instant.
pub fn parse_any_date(input: &str) -> Option<DateTime<Utc>> {
    parse_iso_date(input).or_else(|| {
        parse_display_date(input)
            .and_then(local_noon)
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Canonical ISO-8601 string for any accepted date form.
pub fn canonical_date(input: &str) -> Option<String> {
    parse_any_date(input).map(|instant| to_iso_string(&instant))
}

/// `DD-MM-YYYY` for any accepted date form, in local time.
pub fn display_date(input: &str) -> Option<String> {
    parse_any_date(input).map(|instant| {
        instant
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string()
    })
}

/// Formats a date for storage in a filter value.
///
/// Unreadable input falls back to today, matching [`convert_to_iso_date`].
pub fn to_storage_date(input: &str, storage: DateStorage) -> String {
    let instant = match parse_any_date(input) {
        Some(instant) => instant.with_timezone(&Local),
        None => {
            warn!(input, "unparseable date, using current date");
            Local::now()
        }
    };
    match storage {
        DateStorage::Display => instant.format(DISPLAY_FORMAT).to_string(),
        DateStorage::Iso => instant.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn display_dates_parse() {
        assert_eq!(
            parse_display_date("01-03-2024"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_display_date(" 9-12-1999 "),
            NaiveDate::from_ymd_opt(1999, 12, 9)
        );
        assert_eq!(parse_display_date("31-02-2024"), None);
        assert_eq!(parse_display_date("2024-03-01"), None);
        assert_eq!(parse_display_date("01-03"), None);
    }

    #[test]
    fn converted_dates_land_on_local_noon() {
        let iso = convert_to_iso_date("15-06-2023");
        let local = DateTime::parse_from_rfc3339(&iso)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!((local.year(), local.month(), local.day()), (2023, 6, 15));
        assert_eq!(local.hour(), 12);
    }

    #[test]
    fn range_input_prefers_from() {
        let range = RangeValue::new("01-01-2020", "31-12-2020");
        assert_eq!(
            convert_to_iso_date(&range),
            convert_to_iso_date("01-01-2020")
        );

        let only_to = RangeValue::new("", "31-12-2020");
        assert_eq!(
            convert_to_iso_date(&only_to),
            convert_to_iso_date("31-12-2020")
        );
    }

    #[test]
    fn malformed_input_falls_back_to_now() {
        let before = Utc::now();
        let iso = convert_to_iso_date("not a date");
        let parsed = DateTime::parse_from_rfc3339(&iso).unwrap();
        assert!(parsed.with_timezone(&Utc) >= before - chrono::Duration::seconds(1));

        assert!(!convert_to_iso_date(DateInput::Missing).is_empty());
    }

    #[test]
    fn both_forms_share_a_canonical_instant() {
        assert_eq!(canonical_date("01-03-2024"), canonical_date("2024-03-01"));
        let iso = convert_to_iso_date("01-03-2024");
        assert_eq!(canonical_date(&iso), Some(iso.clone()));
        assert_eq!(canonical_date("tomorrow"), None);
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(display_date("2024-03-01").as_deref(), Some("01-03-2024"));
        assert_eq!(display_date("01-03-2024").as_deref(), Some("01-03-2024"));
        assert_eq!(display_date("garbage"), None);
    }

    #[test]
    fn storage_forms() {
        assert_eq!(to_storage_date("01-03-2024", DateStorage::Display), "01-03-2024");
        assert_eq!(to_storage_date("01-03-2024", DateStorage::Iso), "2024-03-01");
        assert_eq!(to_storage_date("2024-03-01", DateStorage::Display), "01-03-2024");
    }
}
