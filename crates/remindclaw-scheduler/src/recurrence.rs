//! Recurrence phrase compiler and cadence rules.
//!
//! Two phrase grammars compile into a cron expression plus a cadence rule
//! the cron grammar cannot express on its own:
//!
//! ```text
//! "starting 2025-01-01 every 7 days at 09:00"
//!     → "0 9 * * *"     + EveryNDays { start: 2025-01-01, every_days: 7 }
//! "on 2nd Tuesday in March at 08:30"
//!     → "30 8 8-14 3 *" + OnWeekday { iso_weekday: 2 }
//! ```
//!
//! Anything else is treated as a raw 5-field cron line. The ordinal bands
//! approximate "the Nth weekday": "2nd Tuesday" becomes days 8-14, and the
//! cadence rule narrows that band to the right weekday. A month layout that
//! pushes the true Nth weekday outside its band is a known limit of the
//! grammar, not something the compiler corrects.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use remindclaw_core::error::{RemindClawError, Result};
use serde::{Deserialize, Serialize};

use crate::cron::{ScheduleExpression, weekday_from_name};

static EVERY_N_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^starting\s+(?P<start>.+)\s+every\s+(?P<days>[0-9]{1,3})\s+days\s+at\s+(?P<hours>[0-9]{1,2}):(?P<minutes>[0-9]{2})",
    )
    .unwrap()
});

static NTH_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^on\s+(?P<ordinal>[a-zA-Z1-5]+)\s+(?P<dayofweek>[a-zA-Z]{3,})\s+in\s+(?P<month>[a-zA-Z]{3,}|every month)\s+at\s+(?P<hours>[0-9]{1,2}):(?P<minutes>[0-9]{2})",
    )
    .unwrap()
});

/// Extra firing constraint attached to a schedule expression.
///
/// Exactly one variant per compiled reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// The cron expression says it all.
    Unconstrained,
    /// Fires on `start` and every `every_days` after it, never before it.
    EveryNDays { start: NaiveDate, every_days: u32 },
    /// Fires only on dates with this ISO weekday (1 = Monday .. 7 = Sunday).
    /// Pairs with an ordinal day-of-month band in the expression.
    OnWeekday { iso_weekday: u8 },
}

impl Cadence {
    /// Does the cadence hold on this calendar date?
    pub fn holds(&self, date: NaiveDate) -> bool {
        match self {
            Cadence::Unconstrained => true,
            Cadence::EveryNDays { start, every_days } => {
                if date < *start {
                    return false;
                }
                let elapsed = date.signed_duration_since(*start).num_days();
                elapsed % i64::from(*every_days) == 0
            }
            Cadence::OnWeekday { iso_weekday } => {
                date.weekday().number_from_monday() == u32::from(*iso_weekday)
            }
        }
    }
}

/// A compiled recurrence: cron expression plus cadence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub expression: ScheduleExpression,
    pub cadence: Cadence,
}

/// Compile a recurrence phrase into its schedule constraints.
///
/// Phrases opening with "starting" or "on" must match their grammar; any
/// other phrase is the literal cron escape hatch.
pub fn compile(phrase: &str) -> Result<RecurrenceSpec> {
    if phrase.starts_with("starting") {
        return compile_every_n_days(phrase);
    }
    if phrase.starts_with("on") {
        return compile_nth_weekday(phrase);
    }
    Ok(RecurrenceSpec {
        expression: ScheduleExpression::parse(phrase)?,
        cadence: Cadence::Unconstrained,
    })
}

fn compile_every_n_days(phrase: &str) -> Result<RecurrenceSpec> {
    let caps = EVERY_N_DAYS
        .captures(phrase)
        .ok_or_else(|| RemindClawError::unrecognized(format!("'{phrase}'")))?;

    let start = parse_anchor_date(&caps["start"])?;
    let every_days = parse_component(&caps["days"])?;
    if every_days == 0 {
        return Err(RemindClawError::unrecognized(format!(
            "'{phrase}': interval must be at least 1 day"
        )));
    }
    let hours = parse_component(&caps["hours"])?;
    let minutes = parse_component(&caps["minutes"])?;

    Ok(RecurrenceSpec {
        expression: ScheduleExpression::parse(&format!("{minutes} {hours} * * *"))?,
        cadence: Cadence::EveryNDays { start, every_days },
    })
}

fn compile_nth_weekday(phrase: &str) -> Result<RecurrenceSpec> {
    let caps = NTH_WEEKDAY
        .captures(phrase)
        .ok_or_else(|| RemindClawError::unrecognized(format!("'{phrase}'")))?;

    let band = match &caps["ordinal"] {
        "1st" => "1-7",
        "2nd" => "8-14",
        "3rd" => "15-21",
        "4th" => "22-28",
        other => {
            return Err(RemindClawError::unrecognized(format!(
                "unsupported ordinal '{other}', expected 1st..4th"
            )));
        }
    };
    let weekday = weekday_from_name(&caps["dayofweek"][..3])?;
    let month = month_field(&caps["month"])?;
    let hours = parse_component(&caps["hours"])?;
    let minutes = parse_component(&caps["minutes"])?;

    Ok(RecurrenceSpec {
        expression: ScheduleExpression::parse(&format!("{minutes} {hours} {band} {month} *"))?,
        cadence: Cadence::OnWeekday {
            iso_weekday: weekday.number_from_monday() as u8,
        },
    })
}

/// Parse the free-form date text of a "starting ..." phrase.
/// ISO dates plus the common human spellings.
fn parse_anchor_date(text: &str) -> Result<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%d.%m.%Y",
        "%m/%d/%Y",
        "%B %d, %Y",
        "%d %B %Y",
    ];
    let text = text.trim();
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    Err(RemindClawError::unrecognized(format!(
        "unparseable start date '{text}'"
    )))
}

/// Map a month token ("mar", "sept", "every month") to a cron month field.
fn month_field(token: &str) -> Result<String> {
    if token == "every month" {
        return Ok("*".to_string());
    }
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lowered = token.to_ascii_lowercase();
    match MONTHS.iter().position(|name| *name == &lowered[..3]) {
        Some(index) => Ok((index + 1).to_string()),
        None => Err(RemindClawError::unrecognized(format!(
            "unknown month '{token}'"
        ))),
    }
}

/// Parse a numeric capture. The grammars only capture digit runs, so this
/// cannot fail on matched input.
fn parse_component(digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| RemindClawError::unrecognized(format!("'{digits}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compile_every_n_days() {
        let spec = compile("starting 2025-01-01 every 7 days at 09:00").unwrap();
        assert_eq!(spec.expression.to_string(), "0 9 * * *");
        assert_eq!(
            spec.cadence,
            Cadence::EveryNDays {
                start: date(2025, 1, 1),
                every_days: 7,
            }
        );
    }

    #[test]
    fn test_compile_every_n_days_human_date() {
        let spec = compile("starting March 3, 2025 every 14 days at 7:05").unwrap();
        assert_eq!(spec.expression.to_string(), "5 7 * * *");
        assert_eq!(
            spec.cadence,
            Cadence::EveryNDays {
                start: date(2025, 3, 3),
                every_days: 14,
            }
        );
    }

    #[test]
    fn test_compile_rejects_zero_interval() {
        assert!(matches!(
            compile("starting 2025-01-01 every 0 days at 09:00"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
    }

    #[test]
    fn test_compile_rejects_bad_start_date() {
        assert!(matches!(
            compile("starting someday every 7 days at 09:00"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
    }

    #[test]
    fn test_compile_nth_weekday() {
        let spec = compile("on 2nd Tuesday in March at 08:30").unwrap();
        assert_eq!(spec.expression.to_string(), "30 8 8-14 3 *");
        assert_eq!(spec.cadence, Cadence::OnWeekday { iso_weekday: 2 });
    }

    #[test]
    fn test_compile_nth_weekday_every_month() {
        let spec = compile("on 1st Fri in every month at 7:05").unwrap();
        assert_eq!(spec.expression.to_string(), "5 7 1-7 * *");
        assert_eq!(spec.cadence, Cadence::OnWeekday { iso_weekday: 5 });
    }

    #[test]
    fn test_compile_four_letter_tokens() {
        // "thur" and "sept" resolve by three-letter prefix.
        let spec = compile("on 4th thur in sept at 18:15").unwrap();
        assert_eq!(spec.expression.to_string(), "15 18 22-28 9 *");
        assert_eq!(spec.cadence, Cadence::OnWeekday { iso_weekday: 4 });
    }

    #[test]
    fn test_compile_rejects_unsupported_ordinal() {
        assert!(matches!(
            compile("on 5th Tue in May at 09:00"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
    }

    #[test]
    fn test_compile_rejects_unknown_weekday_and_month() {
        assert!(matches!(
            compile("on 2nd Xyz in March at 08:30"),
            Err(RemindClawError::InvalidWeekday(_))
        ));
        assert!(matches!(
            compile("on 2nd Tue in Foo at 08:30"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
    }

    #[test]
    fn test_compile_raw_expression_passthrough() {
        let spec = compile("0 9 * * MON").unwrap();
        assert_eq!(spec.expression.to_string(), "0 9 * * MON");
        assert_eq!(spec.cadence, Cadence::Unconstrained);
    }

    #[test]
    fn test_compile_rejects_garbage() {
        // Neither grammar keyword, not 5 fields.
        assert!(matches!(
            compile("remind me daily"),
            Err(RemindClawError::MalformedExpression(_))
        ));
        // Grammar keyword but no grammar match.
        assert!(matches!(
            compile("starting tomorrow whenever"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
        assert!(matches!(
            compile("on the next full moon at 09:00"),
            Err(RemindClawError::UnrecognizedPhrase(_))
        ));
    }

    #[test]
    fn test_every_n_days_holds() {
        let cadence = Cadence::EveryNDays {
            start: date(2025, 1, 6),
            every_days: 7,
        };
        assert!(cadence.holds(date(2025, 1, 6)));
        assert!(cadence.holds(date(2025, 1, 13)));
        assert!(cadence.holds(date(2025, 2, 3)));
        for offset in 1..7 {
            assert!(!cadence.holds(date(2025, 1, 6 + offset)));
        }
        assert!(!cadence.holds(date(2025, 1, 5)));
        assert!(!cadence.holds(date(2024, 12, 30)));
    }

    #[test]
    fn test_every_single_day_holds_everywhere() {
        let cadence = Cadence::EveryNDays {
            start: date(2025, 1, 1),
            every_days: 1,
        };
        assert!(cadence.holds(date(2025, 1, 1)));
        assert!(cadence.holds(date(2025, 1, 2)));
        assert!(cadence.holds(date(2025, 6, 30)));
        assert!(!cadence.holds(date(2024, 12, 31)));
    }

    #[test]
    fn test_on_weekday_holds() {
        let cadence = Cadence::OnWeekday { iso_weekday: 2 };
        assert!(cadence.holds(date(2025, 3, 4))); // Tuesday
        assert!(cadence.holds(date(2025, 3, 11)));
        assert!(!cadence.holds(date(2025, 3, 10))); // Monday
        assert!(!cadence.holds(date(2025, 3, 12))); // Wednesday
    }

    #[test]
    fn test_unconstrained_holds() {
        assert!(Cadence::Unconstrained.holds(date(2025, 1, 1)));
    }

    #[test]
    fn test_spec_serde_round_trip() {
        let spec = compile("starting 2025-01-01 every 7 days at 09:00").unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let back: RecurrenceSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
