//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mail;
pub mod memory;
pub mod payment;
pub mod postgres;

pub use mail::{LogMailer, SmtpMailer};
pub use memory::InMemorySessionStore;
pub use payment::{FakePaymentGateway, StripePaymentGateway};
pub use postgres::PostgresOrderRepository;
