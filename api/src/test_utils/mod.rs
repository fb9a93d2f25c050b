//! Test utilities
//!
//! In-memory port implementations and test fixtures for unit testing.
//!
//! The repository and mailer are hand-written so tests can inspect what was
//! stored or sent. The payment gateway is mocked with mockall
//! (`MockPaymentGateway`), where expectations on the charge matter more.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
