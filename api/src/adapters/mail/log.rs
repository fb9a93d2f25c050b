//! Mailer that only logs, used when no SMTP server is configured

use async_trait::async_trait;

use super::templates::{contact_forward, order_confirmation};
use crate::domain::entities::{ContactMessage, Order};
use crate::domain::ports::Mailer;
use crate::error::MailError;

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError> {
        let mail = order_confirmation(order);
        tracing::info!(
            to = order.email().unwrap_or_default(),
            subject = %mail.subject,
            "Order confirmation (not sent, no SMTP configured)"
        );
        tracing::debug!(body = %mail.body, "Order confirmation body");
        Ok(())
    }

    async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), MailError> {
        let mail = contact_forward(message);
        tracing::info!(
            from = %message.email,
            subject = %mail.subject,
            "Contact message (not sent, no SMTP configured)"
        );
        tracing::debug!(body = %mail.body, "Contact message body");
        Ok(())
    }
}
