//! Contact form service

use std::sync::Arc;

use crate::app::validation::{validate_email, validate_text, MAX_FIELD_LENGTH, MAX_MESSAGE_LENGTH};
use crate::domain::entities::ContactMessage;
use crate::domain::ports::Mailer;
use crate::error::AppError;

pub struct ContactService<ML: Mailer + ?Sized> {
    mailer: Arc<ML>,
}

impl<ML: Mailer + ?Sized> ContactService<ML> {
    pub fn new(mailer: Arc<ML>) -> Self {
        Self { mailer }
    }

    /// Validate a contact-form submission and forward it to the museum.
    ///
    /// Unlike order confirmations, a delivery failure is reported to the
    /// visitor since nothing else records the message.
    pub async fn send(&self, message: ContactMessage) -> Result<(), AppError> {
        let message = ContactMessage {
            name: message.name.trim().to_string(),
            email: message.email.trim().to_string(),
            subject: message.subject.trim().to_string(),
            message: message.message.trim().to_string(),
        };

        validate_text("Name", &message.name, MAX_FIELD_LENGTH)?;
        validate_email(&message.email)?;
        validate_text("Subject", &message.subject, MAX_FIELD_LENGTH)?;
        validate_text("Message", &message.message, MAX_MESSAGE_LENGTH)?;

        self.mailer.send_contact_message(&message).await?;

        tracing::info!(from = %message.email, subject = %message.subject, "Contact message sent");
        Ok(())
    }
}
