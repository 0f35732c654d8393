//! Notification dispatch: quiet hours, batching windows, and
//! webhook signing.

mod batch;
mod channel;
mod quiet_hours;
mod signing;

pub use batch::{batch_key, should_flush_batch, BatchKey};
pub use channel::{ChannelSendOutcome, ChannelSender, WebhookChannelSender};
pub use quiet_hours::{in_quiet_hours, QuietHours};
pub use signing::sign_payload;
