use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{FarmerInterest, LandlordPost, Stored};

/// Outbound message handed to the mail transport. Template rendering beyond
/// this shape is the transport's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait describing the outbound mail seam. Implementations own transport
/// timeouts and retry policy; the workflow issues exactly one attempt per
/// recipient per submission.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError>;
}

/// Per-recipient delivery failure. Logged by the workflow, never surfaced to
/// the submitting client, never aborts sibling deliveries.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("recipient rejected: {0}")]
    Rejected(String),
}

/// Compose the notification sent to a matched landlord.
pub fn match_notification(
    from: &str,
    farmer: &FarmerInterest,
    landlord: &Stored<LandlordPost>,
) -> EmailMessage {
    EmailMessage {
        from: from.to_string(),
        to: landlord.record.email.clone(),
        subject: "Farmer Interest in Your Land - FarmRent".to_string(),
        body: format!(
            "A farmer is willing to pay ${:.2}/acre for land in {} \
             (your asking price: ${:.2}/acre). Contact them at {}.",
            farmer.offered_price, farmer.county, landlord.record.asking_price, farmer.email
        ),
    }
}
