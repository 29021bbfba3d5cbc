//! Delivery seam — the scheduler decides, a channel delivers.

use crate::error::Result;
use crate::types::ReminderMessage;

/// Trait for outbound delivery channel implementations.
///
/// The decision core never sends anything itself; on a `Fire` verdict the
/// caller pushes the message through one of these. A non-2xx provider
/// response surfaces as a `Delivery` error.
#[async_trait::async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Channel name for logs ("sendgrid", "smtp", ...).
    fn name(&self) -> &str;

    /// Deliver one reminder.
    async fn send(&self, message: &ReminderMessage) -> Result<()>;
}
