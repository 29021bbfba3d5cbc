//! Unified error types for RemindClaw.

use thiserror::Error;

/// Result type alias using RemindClawError.
pub type Result<T> = std::result::Result<T, RemindClawError>;

#[derive(Error, Debug)]
pub enum RemindClawError {
    // Schedule expression errors
    #[error("Malformed schedule expression: {0}")]
    MalformedExpression(String),

    #[error("Schedule value out of range: {0}")]
    OutOfRangeValue(String),

    #[error("Invalid step divisor: {0}")]
    InvalidStepDivisor(String),

    #[error("Invalid day of week: {0}")]
    InvalidWeekday(String),

    // Recurrence phrase errors
    #[error("Unrecognized recurrence phrase: {0}")]
    UnrecognizedPhrase(String),

    // Configuration errors
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // Delivery errors
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl RemindClawError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedExpression(msg.into())
    }

    pub fn unrecognized(msg: impl Into<String>) -> Self {
        Self::UnrecognizedPhrase(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}
