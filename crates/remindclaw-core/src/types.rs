//! Reminder data model — the shapes external collaborators hand the core.
//!
//! A configuration loader fills a [`ReminderBook`]; the scheduler compiles it
//! into per-reminder dispatch units. No file I/O happens here.

use serde::{Deserialize, Serialize};

/// Root reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderBook {
    /// Sender address used for every reminder.
    pub from: String,
    /// IANA zone name the schedules are written in (e.g. "Europe/Amsterdam").
    /// None = schedules are evaluated on the UTC wall clock.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

/// One recipient and their reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// Destination address.
    pub to: String,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

/// One reminder definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Subject line of the outgoing notification.
    pub subject: String,
    /// Optional HTML body.
    #[serde(default)]
    pub html_content: Option<String>,
    /// Recurrence phrase: "starting <date> every <N> days at <H>:<MM>",
    /// "on <1st..4th> <weekday> in <month|every month> at <H>:<MM>",
    /// or a raw 5-field cron line.
    pub schedule: String,
}

/// A rendered reminder ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(default)]
    pub html_content: Option<String>,
}

impl ReminderMessage {
    /// Body to hand the delivery channel. Providers reject empty bodies, so a
    /// single space stands in for a missing one.
    pub fn body(&self) -> &str {
        match self.html_content.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => " ",
        }
    }
}
