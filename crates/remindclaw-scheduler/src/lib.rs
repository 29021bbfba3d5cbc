//! # RemindClaw Scheduler
//!
//! The decision core: given a compiled reminder and the current instant,
//! should it fire right now?
//!
//! ## Architecture
//! ```text
//! configuration refresh (external loader hands us a ReminderBook):
//!   "starting 2025-01-01 every 7 days at 09:00"
//!     → compile → RecurrenceSpec { "0 9 * * *", EveryNDays { 2025-01-01, 7 } }
//!
//! every tick, per reminder:
//!   decide(spec, created_at, now)
//!     ├── localize now to the configured zone, drop seconds
//!     ├── cron expression must match          (cron.rs)
//!     ├── cadence rule must hold for the date (recurrence.rs)
//!     └── trigger older than 24h → Expired    (dispatch.rs)
//! ```
//!
//! Everything here is pure and synchronous; delivery, storage, and the timer
//! that calls us live elsewhere.

pub mod cron;
pub mod dispatch;
pub mod recurrence;

pub use cron::ScheduleExpression;
pub use dispatch::{CompiledReminder, Verdict, compile_reminders, decide, parse_instant};
pub use recurrence::{Cadence, RecurrenceSpec, compile};
