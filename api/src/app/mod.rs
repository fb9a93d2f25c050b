//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod contact_service;
pub mod order_workflow;
pub mod validation;

pub use contact_service::ContactService;
pub use order_workflow::{CheckoutOutcome, OrderDetails, OrderWorkflow, WorkflowSettings};

use crate::domain::ports::{Mailer, OrderRepository, PaymentGateway, SessionStore};

/// Workflow wired to trait objects, as held by the HTTP layer
pub type DynOrderWorkflow =
    OrderWorkflow<dyn OrderRepository, dyn SessionStore, dyn PaymentGateway, dyn Mailer>;

pub type DynContactService = ContactService<dyn Mailer>;
