//! Offline payment gateway for development and tests

use async_trait::async_trait;
use rand::Rng;

use crate::domain::ports::{ChargeRequest, PaymentGateway, PaymentOutcome};
use crate::error::PaymentError;

/// Token the fake gateway always refuses, mirroring Stripe's test token
pub const DECLINED_TOKEN: &str = "tok_chargeDeclined";

/// Approves every charge except an empty token or [`DECLINED_TOKEN`]
#[derive(Debug, Default)]
pub struct FakePaymentGateway;

impl FakePaymentGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentOutcome, PaymentError> {
        let token = request.token.trim();

        if token.is_empty() || token == DECLINED_TOKEN {
            tracing::info!(order_number = %request.order_number, "Fake gateway declined charge");
            return Ok(PaymentOutcome::Declined {
                reason: "card_declined".to_string(),
            });
        }

        let transaction_id = format!("fake_{}", hex::encode(rand::thread_rng().gen::<[u8; 8]>()));
        tracing::info!(
            order_number = %request.order_number,
            amount = request.amount,
            %transaction_id,
            "Fake gateway approved charge"
        );

        Ok(PaymentOutcome::Approved { transaction_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: &str) -> ChargeRequest {
        ChargeRequest {
            order_number: "LVR-20300714-DEADBEEF".to_string(),
            idempotency_key: "LVR-20300714-DEADBEEF-1".to_string(),
            amount: 1600,
            currency: "eur".to_string(),
            email: "buyer@example.com".to_string(),
            token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn approves_regular_token() {
        let outcome = FakePaymentGateway::new()
            .charge(&request("tok_visa"))
            .await
            .unwrap();
        match outcome {
            PaymentOutcome::Approved { transaction_id } => {
                assert!(transaction_id.starts_with("fake_"));
                assert_eq!(transaction_id.len(), "fake_".len() + 16);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn declines_test_token() {
        let outcome = FakePaymentGateway::new()
            .charge(&request(DECLINED_TOKEN))
            .await
            .unwrap();
        assert!(!outcome.is_approved());
    }

    #[tokio::test]
    async fn declines_missing_token() {
        let outcome = FakePaymentGateway::new()
            .charge(&request("  "))
            .await
            .unwrap();
        assert!(!outcome.is_approved());
    }
}
