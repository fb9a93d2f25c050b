//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{Order, OrderId};
use crate::error::DomainError;

/// Durable storage for paid orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a paid order together with its tickets and return its new id
    async fn persist(&self, order: &Order) -> Result<OrderId, DomainError>;

    /// Count tickets already sold for a visit date
    async fn count_tickets_for_date(&self, date: NaiveDate) -> Result<u64, DomainError>;

    /// Check whether an order number is already taken
    async fn order_number_exists(&self, order_number: &str) -> Result<bool, DomainError>;
}
