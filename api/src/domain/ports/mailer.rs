//! Mailer port trait

use async_trait::async_trait;

use crate::domain::entities::{ContactMessage, Order};
use crate::error::MailError;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the buyer the summary of a persisted order
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError>;

    /// Forward a contact-form message to the museum's inbox
    async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), MailError>;
}
