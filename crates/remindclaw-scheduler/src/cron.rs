//! Lightweight cron expression evaluator.
//! Supports: "MIN HOUR DOM MON DOW" (5-field, no seconds)
//! Field forms: *, N, N-M, comma lists, */N (numeric fields only).
//! Day of week takes three-letter names (MON..SUN, any case) — numeric
//! day-of-week values are rejected, not silently mismatched.
//!
//! Day of month and day of week are conjunctive: when both are restricted,
//! both must match. There is no "either-or" union between the two.

use chrono::{Datelike, Timelike, Weekday};
use remindclaw_core::error::{RemindClawError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 5-field schedule expression.
///
/// Fields keep their written form; individual field validation happens at
/// match time, so the first field that fails to match is also the first one
/// to report a bad value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExpression {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

impl ScheduleExpression {
    /// Split an expression line into its five fields.
    pub fn parse(expression: &str) -> Result<Self> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(RemindClawError::malformed(format!(
                "'{expression}' has {} fields, need 5 (MIN HOUR DOM MON DOW)",
                parts.len()
            )));
        }
        Ok(Self {
            minute: parts[0].to_string(),
            hour: parts[1].to_string(),
            day_of_month: parts[2].to_string(),
            month: parts[3].to_string(),
            day_of_week: parts[4].to_string(),
        })
    }

    /// Does this expression match the given local time?
    ///
    /// The caller hands in a zone-localized, minute-truncated instant; only
    /// minute-granularity components are read. Fields are checked in order
    /// and the first non-matching field short-circuits the rest, so only its
    /// validation errors can surface.
    pub fn matches_at<T: Datelike + Timelike>(&self, at: &T) -> Result<bool> {
        if !field_matches(&self.minute, at.minute(), 0, 59, true)? {
            return Ok(false);
        }
        if !field_matches(&self.hour, at.hour(), 0, 23, true)? {
            return Ok(false);
        }
        if !field_matches(&self.day_of_month, at.day(), 1, 31, true)? {
            return Ok(false);
        }
        if !field_matches(&self.month, at.month(), 1, 12, true)? {
            return Ok(false);
        }
        weekday_matches(&self.day_of_week, at.weekday())
    }
}

impl fmt::Display for ScheduleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

impl FromStr for ScheduleExpression {
    type Err = RemindClawError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Check one numeric schedule field against a value.
///
/// `allow_step` gates the "*/N" form per field.
pub fn field_matches(
    field: &str,
    value: u32,
    min: u32,
    max: u32,
    allow_step: bool,
) -> Result<bool> {
    if field == "*" {
        return Ok(true);
    }

    // "1,2,3" — union of sub-terms, first match wins
    if field.contains(',') {
        for part in field.split(',') {
            if field_matches(part, value, min, max, allow_step)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    // "*/N" — every Nth unit starting at the field minimum
    if let Some(step) = field.strip_prefix("*/") {
        let divisor: u32 = step.parse().map_err(|_| {
            RemindClawError::InvalidStepDivisor(format!("non-numeric divisor in '{field}'"))
        })?;
        if divisor == 0 {
            return Err(RemindClawError::InvalidStepDivisor(format!(
                "divisor in '{field}' must be positive"
            )));
        }
        return Ok(allow_step && (value - min) % divisor == 0);
    }

    // "8-14" — inclusive range (the recurrence compiler emits these bands)
    if let Some((lo, hi)) = field.split_once('-') {
        let lo = parse_bounded(lo, min, max)?;
        let hi = parse_bounded(hi, min, max)?;
        if lo > hi {
            return Err(RemindClawError::malformed(format!("inverted range '{field}'")));
        }
        return Ok((lo..=hi).contains(&value));
    }

    Ok(parse_bounded(field, min, max)? == value)
}

/// Check the day-of-week field against a weekday.
///
/// This field takes names, never numbers, and has no step form.
pub fn weekday_matches(field: &str, weekday: Weekday) -> Result<bool> {
    if field == "*" {
        return Ok(true);
    }
    for part in field.split(',') {
        if part == "*" {
            return Ok(true);
        }
        if weekday_from_name(part)? == weekday {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Map a three-letter weekday name (any case) to a chrono weekday.
pub(crate) fn weekday_from_name(name: &str) -> Result<Weekday> {
    match name.to_ascii_uppercase().as_str() {
        "MON" => Ok(Weekday::Mon),
        "TUE" => Ok(Weekday::Tue),
        "WED" => Ok(Weekday::Wed),
        "THU" => Ok(Weekday::Thu),
        "FRI" => Ok(Weekday::Fri),
        "SAT" => Ok(Weekday::Sat),
        "SUN" => Ok(Weekday::Sun),
        _ if name.parse::<i64>().is_ok() => Err(RemindClawError::InvalidWeekday(format!(
            "day of week must be a three-letter name (MON, TUE, ...), not a number: '{name}'"
        ))),
        _ => Err(RemindClawError::InvalidWeekday(format!(
            "unrecognized day of week '{name}', expected MON..SUN or *"
        ))),
    }
}

/// Parse a single integer term and enforce its unit range.
fn parse_bounded(term: &str, min: u32, max: u32) -> Result<u32> {
    let n: u32 = term.parse().map_err(|_| {
        RemindClawError::malformed(format!("invalid field value '{term}', expected a number or *"))
    })?;
    if n < min || n > max {
        return Err(RemindClawError::OutOfRangeValue(format!(
            "{n} is outside {min}-{max}"
        )));
    }
    Ok(n)
}
