//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod mailer;
pub mod payment;
pub mod repositories;
pub mod sessions;

pub use mailer::Mailer;
#[cfg(test)]
pub use payment::MockPaymentGateway;
pub use payment::{ChargeRequest, PaymentGateway, PaymentOutcome};
pub use repositories::OrderRepository;
pub use sessions::SessionStore;
