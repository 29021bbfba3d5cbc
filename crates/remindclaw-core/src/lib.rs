//! # RemindClaw Core
//!
//! Shared types, traits, and error handling for RemindClaw.
//!
//! The decision core consumes a [`ReminderBook`] supplied by an external
//! configuration loader and hands `Fire` verdicts to an external
//! [`DeliveryChannel`]. Neither side lives in this workspace; their
//! interfaces do.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{RemindClawError, Result};
pub use traits::DeliveryChannel;
pub use types::{Recipient, Reminder, ReminderBook, ReminderMessage};
