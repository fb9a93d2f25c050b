//! Payment gateway adapters

pub mod fake;
pub mod stripe;

pub use fake::FakePaymentGateway;
pub use stripe::StripePaymentGateway;
