//! Stripe charges client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChargeRequest, PaymentGateway, PaymentOutcome};
use crate::error::PaymentError;

/// Charges cards through the Stripe `/v1/charges` endpoint
pub struct StripePaymentGateway {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl StripePaymentGateway {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct CreateChargeForm<'a> {
    amount: i32,
    currency: &'a str,
    source: &'a str,
    description: String,
    receipt_email: &'a str,
    #[serde(rename = "metadata[order_number]")]
    order_number: &'a str,
}

#[derive(Deserialize)]
struct ChargeResponse {
    id: String,
    status: String,
    #[serde(default)]
    paid: bool,
    #[serde(default)]
    failure_message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: StripeApiError,
}

#[derive(Deserialize)]
struct StripeApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    decline_code: Option<String>,
}

/// Map a Stripe answer to a payment outcome.
///
/// 402 is Stripe's card error: the charge was refused, the call itself worked.
fn outcome_from_response(status: u16, body: &str) -> Result<PaymentOutcome, PaymentError> {
    match status {
        200..=299 => {
            let charge: ChargeResponse = serde_json::from_str(body)
                .map_err(|e| PaymentError::Deserialization(e.to_string()))?;

            if charge.paid && charge.status == "succeeded" {
                Ok(PaymentOutcome::Approved {
                    transaction_id: charge.id,
                })
            } else {
                Ok(PaymentOutcome::Declined {
                    reason: charge.failure_message.unwrap_or(charge.status),
                })
            }
        }
        402 => {
            let envelope: ErrorEnvelope = serde_json::from_str(body)
                .map_err(|e| PaymentError::Deserialization(e.to_string()))?;
            let error = envelope.error;
            let reason = error
                .decline_code
                .or(error.code)
                .or(error.message)
                .unwrap_or_else(|| "card_declined".to_string());

            Ok(PaymentOutcome::Declined { reason })
        }
        _ => {
            let message = serde_json::from_str::<ErrorEnvelope>(body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| body.to_string());

            Err(PaymentError::Api { status, message })
        }
    }
}

impl StripePaymentGateway {
    fn charge_request(&self, request: &ChargeRequest) -> RequestBuilder {
        let form = CreateChargeForm {
            amount: request.amount,
            currency: &request.currency,
            source: &request.token,
            description: format!("Commande {}", request.order_number),
            receipt_email: &request.email,
            order_number: &request.order_number,
        };

        self.http
            .post(self.api_url("/charges"))
            .basic_auth(&self.secret_key, None::<&str>)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(&form)
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentOutcome, PaymentError> {
        let response = self.charge_request(request).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        outcome_from_response(status, &body)
    }
}
