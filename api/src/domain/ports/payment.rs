//! Payment gateway port trait

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PaymentError;

/// A single charge for a priced order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeRequest {
    pub order_number: String,
    /// Unique per charge attempt, sent to the provider to deduplicate retries
    /// of the same network call
    pub idempotency_key: String,
    /// Amount in the smallest currency unit
    pub amount: i32,
    pub currency: String,
    pub email: String,
    /// Card token produced by the payment provider's checkout widget
    pub token: String,
}

/// What the gateway decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved { transaction_id: String },
    Declined { reason: String },
}

impl PaymentOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved { .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the buyer. `Err` means the gateway could not be reached or
    /// answered something unexpected; a refused card is `Ok(Declined)`.
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentOutcome, PaymentError>;
}
