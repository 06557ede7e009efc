//! Wall-clock time values and their string forms.
//!
//! A [`Time`] is held in 12-hour form (`hours` in `1..=12` plus a
//! [`Period`]). Two string forms exist:
//!
//! - **storage**: `HH:MM:SS` on a 24-hour clock, used inside filter values
//! - **display**: either 24-hour `HH:MM:SS` or 12-hour `HH:MM:SS AM`
//!
//! Nothing in this module fails loudly. Malformed input yields `None`
//! (or an empty/placeholder string) and a debug-level trace.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::RangeValue;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;
const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})(?: (AM|PM|am|pm))?$").expect("valid time pattern")
});

/// Placeholder shown when there is no time to display.
pub const TIME_PLACEHOLDER: &str = "--:--:--";

/// Half of the day on a 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AM" | "am" => Ok(Period::Am),
            "PM" | "pm" => Ok(Period::Pm),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display convention for [`format_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `HH:MM:SS AM`
    #[serde(rename = "12h")]
    H12,
    /// `HH:MM:SS`
    #[default]
    #[serde(rename = "24h")]
    H24,
}

/// The unit adjusted by [`increment_time_value`] and [`decrement_time_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn seconds(self) -> u32 {
        match self {
            TimeUnit::Hours => 3600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }
}

/// A time of day in 12-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    /// Hour on a 12-hour clock, `1..=12`.
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub period: Period,
}

impl Time {
    /// Builds a time from 12-hour components, rejecting out-of-range parts.
    pub fn new(hours: u8, minutes: u8, seconds: u8, period: Period) -> Option<Self> {
        if !(1..=12).contains(&hours) || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Time {
            hours,
            minutes,
            seconds,
            period,
        })
    }

    /// Builds a time from a 24-hour clock reading.
    ///
    /// Hour 0 becomes 12 AM and hour 12 becomes 12 PM.
    pub fn from_24h(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return None;
        }
        let (hours, period) = match hours {
            0 => (12, Period::Am),
            1..=11 => (hours, Period::Am),
            12 => (12, Period::Pm),
            _ => (hours - 12, Period::Pm),
        };
        Some(Time {
            hours,
            minutes,
            seconds,
            period,
        })
    }

    /// Hour on a 24-hour clock, `0..=23`.
    pub fn hours_24(&self) -> u8 {
        match (self.period, self.hours) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        }
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hours_24()) * 60 + u32::from(self.minutes)
    }

    pub fn seconds_since_midnight(&self) -> u32 {
        self.minutes_since_midnight() * 60 + u32::from(self.seconds)
    }

    fn from_seconds_since_midnight(total: u32) -> Self {
        let total = total % SECONDS_PER_DAY;
        let hours = (total / 3600) as u8;
        let minutes = ((total / 60) % 60) as u8;
        let seconds = (total % 60) as u8;
        // Components are in range by construction.
        Time::from_24h(hours, minutes, seconds).unwrap_or(MIDNIGHT)
    }

    /// The storage form, `HH:MM:SS` on a 24-hour clock.
    pub fn to_storage_string(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.hours_24(),
            self.minutes,
            self.seconds
        )
    }
}

const MIDNIGHT: Time = Time {
    hours: 12,
    minutes: 0,
    seconds: 0,
    period: Period::Am,
};

impl Default for Time {
    fn default() -> Self {
        MIDNIGHT
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

/// Both ends of a time range, each parsed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub from: Option<Time>,
    pub to: Option<Time>,
}

/// Parses `HH:MM:SS`, optionally followed by a space and `AM`/`PM`.
///
/// Every segment is two digits. The clock part is read on a 24-hour
/// clock. When a period suffix is present and the hour is in `1..=12`,
/// the hour is taken as a 12-hour reading in that period; otherwise the
/// period is derived from the hour.
pub fn parse_time_string(input: &str) -> Option<Time> {
    let Some(caps) = TIME_PATTERN.captures(input.trim()) else {
        debug!(input, "time value is not HH:MM:SS");
        return None;
    };
    let hours: u8 = caps[1].parse().ok()?;
    let minutes: u8 = caps[2].parse().ok()?;
    let seconds: u8 = caps[3].parse().ok()?;
    let period = caps.get(4).and_then(|m| m.as_str().parse::<Period>().ok());

    let parsed = match period {
        Some(period) if (1..=12).contains(&hours) => Time::new(hours, minutes, seconds, period),
        _ => Time::from_24h(hours, minutes, seconds),
    };
    if parsed.is_none() {
        debug!(input, "time value is out of range");
    }
    parsed
}

/// Converts a time to its `HH:MM:SS` storage form. `None` yields `""`.
pub fn format_time_to_string(time: Option<&Time>) -> String {
    time.map(Time::to_storage_string).unwrap_or_default()
}

/// Renders a time for display in the given format.
pub fn format_time(time: Option<&Time>, format: TimeFormat) -> String {
    let Some(time) = time else {
        return TIME_PLACEHOLDER.to_string();
    };
    match format {
        TimeFormat::H24 => time.to_storage_string(),
        TimeFormat::H12 => format!(
            "{:02}:{:02}:{:02} {}",
            time.hours, time.minutes, time.seconds, time.period
        ),
    }
}

/// Advances one unit, carrying into larger units and wrapping at midnight.
pub fn increment_time_value(time: &Time, unit: TimeUnit) -> Time {
    Time::from_seconds_since_midnight(time.seconds_since_midnight() + unit.seconds())
}

/// Steps back one unit, borrowing from larger units and wrapping at midnight.
pub fn decrement_time_value(time: &Time, unit: TimeUnit) -> Time {
    Time::from_seconds_since_midnight(
        time.seconds_since_midnight() + SECONDS_PER_DAY - unit.seconds(),
    )
}

fn bounds(min: Option<&Time>, max: Option<&Time>) -> (u32, u32) {
    (
        min.map_or(0, Time::minutes_since_midnight),
        max.map_or(LAST_MINUTE_OF_DAY, Time::minutes_since_midnight),
    )
}

/// Returns `true` when `time` lies within the inclusive bounds.
///
/// Comparison is at minute resolution. Missing bounds cover the whole day.
pub fn is_time_in_range(time: &Time, min: Option<&Time>, max: Option<&Time>) -> bool {
    let (lo, hi) = bounds(min, max);
    let t = time.minutes_since_midnight();
    lo <= t && t <= hi
}

/// Saturates `time` to the nearest bound when it falls outside them.
pub fn clamp_time(time: &Time, min: Option<&Time>, max: Option<&Time>) -> Time {
    let (lo, hi) = bounds(min, max);
    let t = time.minutes_since_midnight();
    match (min, max) {
        (Some(min), _) if t < lo => *min,
        (_, Some(max)) if t > hi => *max,
        _ => *time,
    }
}

/// Decodes a JSON `{from, to}` object of storage-form times.
///
/// Malformed JSON yields an empty range; each side that fails to parse
/// is `None` on its own.
pub fn parse_time_range(json: &str) -> TimeRange {
    match serde_json::from_str::<RangeValue>(json) {
        Ok(range) => TimeRange {
            from: parse_time_string(&range.from),
            to: parse_time_string(&range.to),
        },
        Err(err) => {
            debug!(json, error = %err, "time range is not a JSON object");
            TimeRange::default()
        }
    }
}
