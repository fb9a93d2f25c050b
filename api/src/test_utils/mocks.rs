//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{ContactMessage, Order, OrderId};
use crate::domain::ports::{Mailer, OrderRepository};
use crate::error::{DomainError, MailError};

// ============================================================================
// In-Memory Order Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderRepository {
    persisted: Arc<RwLock<Vec<Order>>>,
    /// Tickets sold by other orders, per visit date
    sold: Arc<RwLock<HashMap<NaiveDate, u64>>>,
    all_numbers_taken: bool,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `count` tickets were already sold for `date`
    pub fn with_sold(self, date: NaiveDate, count: u64) -> Self {
        self.sold.write().unwrap().insert(date, count);
        self
    }

    /// Report every order number as taken
    pub fn with_all_numbers_taken(mut self) -> Self {
        self.all_numbers_taken = true;
        self
    }

    pub fn persisted(&self) -> Vec<Order> {
        self.persisted.read().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn persist(&self, order: &Order) -> Result<OrderId, DomainError> {
        let mut persisted = self.persisted.write().unwrap();

        if let Some(number) = order.order_number() {
            if persisted.iter().any(|o| o.order_number() == Some(number)) {
                return Err(DomainError::Database(format!(
                    "duplicate order number {}",
                    number
                )));
            }
        }

        let id = OrderId(persisted.len() as i32 + 1);
        let mut stored = order.clone();
        stored.set_id(id);
        persisted.push(stored);
        Ok(id)
    }

    async fn count_tickets_for_date(&self, date: NaiveDate) -> Result<u64, DomainError> {
        let preset = self.sold.read().unwrap().get(&date).copied().unwrap_or(0);
        let persisted: u64 = self
            .persisted
            .read()
            .unwrap()
            .iter()
            .filter(|o| o.visit_date() == Some(date))
            .map(|o| o.tickets().len() as u64)
            .sum();
        Ok(preset + persisted)
    }

    async fn order_number_exists(&self, order_number: &str) -> Result<bool, DomainError> {
        if self.all_numbers_taken {
            return Ok(true);
        }
        Ok(self
            .persisted
            .read()
            .unwrap()
            .iter()
            .any(|o| o.order_number() == Some(order_number)))
    }
}

// ============================================================================
// Recording Mailer
// ============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    confirmations: Arc<RwLock<Vec<Order>>>,
    contact_messages: Arc<RwLock<Vec<ContactMessage>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn confirmations(&self) -> Vec<Order> {
        self.confirmations.read().unwrap().clone()
    }

    pub fn contact_messages(&self) -> Vec<ContactMessage> {
        self.contact_messages.read().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_order_confirmation(&self, order: &Order) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.confirmations.write().unwrap().push(order.clone());
        Ok(())
    }

    async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.contact_messages.write().unwrap().push(message.clone());
        Ok(())
    }
}
