//! Dispatch decision — should this reminder fire right now?
//!
//! Called once per (reminder, tick) pair. Pure and idempotent: the verdict
//! is the whole contract with the delivery side. Safe to evaluate
//! concurrently across reminders and ticks.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use remindclaw_core::error::{RemindClawError, Result};
use remindclaw_core::types::{ReminderBook, ReminderMessage};
use serde::{Deserialize, Serialize};

use crate::recurrence::{self, RecurrenceSpec};

/// Trigger events older than this many seconds are dropped, not retried.
pub const RETRY_TIMEOUT_SECS: i64 = 24 * 60 * 60;

/// Outcome of a dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The schedule matches and the trigger is fresh — deliver.
    Fire,
    /// Not a scheduled moment for this reminder.
    Skip,
    /// The trigger event outlived the retry timeout — drop it.
    Expired,
}

/// Decide whether a reminder should fire at `now`.
///
/// `now` is localized to `timezone` (UTC wall clock when none) and truncated
/// to the minute exactly once, before any field or cadence check. Matcher
/// errors propagate: a stored expression that fails validation is a
/// configuration defect, never a `Skip`.
pub fn decide(
    spec: &RecurrenceSpec,
    timezone: Option<Tz>,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Verdict> {
    let local = match timezone {
        Some(tz) => now.with_timezone(&tz).naive_local(),
        None => now.naive_utc(),
    };
    let local = truncate_to_minute(local);

    let due = spec.expression.matches_at(&local)? && spec.cadence.holds(local.date());

    // Stale triggers are dropped no matter what the schedule says.
    let age = now.signed_duration_since(created_at);
    if age.num_seconds() > RETRY_TIMEOUT_SECS {
        tracing::warn!("⏱️ Dropped stale trigger ({}s old)", age.num_seconds());
        return Ok(Verdict::Expired);
    }

    Ok(if due { Verdict::Fire } else { Verdict::Skip })
}

/// Zero out seconds and sub-second precision.
fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Parse the instance-creation timestamp handed over by the trigger system.
/// RFC3339 first; a naive "YYYY-MM-DDTHH:MM:SS" is taken as UTC.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(t.and_utc());
    }
    Err(RemindClawError::InvalidTimestamp(text.to_string()))
}

/// One reminder definition compiled for dispatch: the rendered message, its
/// schedule constraints, and the zone the schedule is written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledReminder {
    pub message: ReminderMessage,
    pub spec: RecurrenceSpec,
    /// None = evaluate on the UTC wall clock.
    pub timezone: Option<Tz>,
}

impl CompiledReminder {
    /// Decide whether this reminder should fire at `now`.
    pub fn decide(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<Verdict> {
        decide(&self.spec, self.timezone, created_at, now)
    }
}

/// Compile every reminder in a book. Runs at configuration-refresh time, so
/// phrase and zone defects surface here rather than at tick time.
pub fn compile_reminders(book: &ReminderBook) -> Result<Vec<CompiledReminder>> {
    let timezone = book
        .timezone
        .as_deref()
        .map(|name| {
            name.parse::<Tz>()
                .map_err(|_| RemindClawError::UnknownTimezone(name.to_string()))
        })
        .transpose()?;

    let mut compiled = Vec::new();
    for recipient in &book.recipients {
        for reminder in &recipient.reminders {
            let spec = recurrence::compile(&reminder.schedule)?;
            compiled.push(CompiledReminder {
                message: ReminderMessage {
                    from: book.from.clone(),
                    to: recipient.to.clone(),
                    subject: reminder.subject.clone(),
                    html_content: reminder.html_content.clone(),
                },
                spec,
                timezone,
            });
        }
    }
    tracing::debug!("📨 Compiled {} reminders", compiled.len());
    Ok(compiled)
}
