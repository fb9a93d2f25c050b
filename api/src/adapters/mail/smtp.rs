//! SMTP mailer using lettre

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::templates::{contact_forward, order_confirmation, MailContent};
use crate::config::SmtpConfig;
use crate::domain::entities::{ContactMessage, Order};
use crate::domain::ports::Mailer;
use crate::error::MailError;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    contact_recipient: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str, contact_recipient: &str) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(from)?,
            contact_recipient: parse_mailbox(contact_recipient)?,
        })
    }

    async fn send(
        &self,
        to: Mailbox,
        reply_to: Option<Mailbox>,
        content: MailContent,
    ) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(content.subject)
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to);
        }

        let message = builder
            .body(content.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::Address(format!("{address}: {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError> {
        let to = parse_mailbox(order.email().unwrap_or_default())?;
        self.send(to, None, order_confirmation(order)).await
    }

    async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), MailError> {
        let reply_to = parse_mailbox(&message.email)?;
        self.send(
            self.contact_recipient.clone(),
            Some(reply_to),
            contact_forward(message),
        )
        .await
    }
}
