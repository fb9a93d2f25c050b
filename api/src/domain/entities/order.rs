//! Order domain entity
//!
//! The order (commande) aggregate: buyer, visit date and the tickets bought
//! for that date. An order lives in the visitor's session until it is paid,
//! and is persisted once, at the success step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ticket::{Ticket, TicketId};

/// Transient identity of an order while it only exists in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderKey(pub Uuid);

impl OrderKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier, assigned on persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderId(pub i32);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an order in the ordering flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    /// Created on entering the flow, nothing submitted yet
    Started,
    /// Buyer email, visit date and quantity accepted
    DetailsEntered,
    /// Tickets filled in and total computed
    Priced,
    /// Last payment attempt failed
    CheckoutFailed,
    /// Payment accepted, waiting for the success step
    Paid,
}

impl std::fmt::Display for OrderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStage::Started => write!(f, "started"),
            OrderStage::DetailsEntered => write!(f, "details_entered"),
            OrderStage::Priced => write!(f, "priced"),
            OrderStage::CheckoutFailed => write!(f, "checkout_failed"),
            OrderStage::Paid => write!(f, "paid"),
        }
    }
}

/// The order aggregate
///
/// `total_price` and `order_number` stay `None` until the pricing and
/// checkout steps have run.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    key: OrderKey,
    id: Option<OrderId>,
    email: Option<String>,
    visit_date: Option<NaiveDate>,
    quantity: u32,
    total_price: Option<i32>,
    order_number: Option<String>,
    tickets: Vec<Ticket>,
    stage: OrderStage,
    payment_attempts: u32,
    created_at: DateTime<Utc>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            key: OrderKey::new(),
            id: None,
            email: None,
            visit_date: None,
            quantity: 0,
            total_price: None,
            order_number: None,
            tickets: Vec::new(),
            stage: OrderStage::Started,
            payment_attempts: 0,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> OrderKey {
        self.key
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn set_id(&mut self, id: OrderId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = Some(email.into());
        self
    }

    pub fn visit_date(&self) -> Option<NaiveDate> {
        self.visit_date
    }

    pub fn set_visit_date(&mut self, visit_date: NaiveDate) -> &mut Self {
        self.visit_date = Some(visit_date);
        self
    }

    /// Number of tickets the buyer asked for on the details step
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) -> &mut Self {
        self.quantity = quantity;
        self
    }

    pub fn total_price(&self) -> Option<i32> {
        self.total_price
    }

    pub fn set_total_price(&mut self, total_price: i32) -> &mut Self {
        self.total_price = Some(total_price);
        self
    }

    pub fn clear_total_price(&mut self) -> &mut Self {
        self.total_price = None;
        self
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn set_order_number(&mut self, order_number: impl Into<String>) -> &mut Self {
        self.order_number = Some(order_number.into());
        self
    }

    pub fn clear_order_number(&mut self) -> &mut Self {
        self.order_number = None;
        self
    }

    pub fn stage(&self) -> OrderStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: OrderStage) -> &mut Self {
        self.stage = stage;
        self
    }

    /// Number of charges tried for this order so far
    pub fn payment_attempts(&self) -> u32 {
        self.payment_attempts
    }

    /// Count a new charge attempt and return its 1-based number.
    pub fn record_payment_attempt(&mut self) -> u32 {
        self.payment_attempts = self.payment_attempts.saturating_add(1);
        self.payment_attempts
    }

    /// Key identifying one charge attempt at the payment provider.
    ///
    /// Stable for a given attempt, different for each retry of the same order.
    pub fn payment_idempotency_key(&self) -> Option<String> {
        let order_number = self.order_number.as_deref()?;
        Some(format!("{}-{}", order_number, self.payment_attempts))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn contains_ticket(&self, id: &TicketId) -> bool {
        self.tickets.iter().any(|t| t.id == *id)
    }

    /// Append a ticket unless one with the same identity is already present.
    pub fn add_ticket(&mut self, mut ticket: Ticket) -> &mut Self {
        if !self.contains_ticket(&ticket.id) {
            ticket.set_order(Some(self.key));
            self.tickets.push(ticket);
        }
        self
    }

    /// Detach a ticket from the order and hand it back.
    pub fn remove_ticket(&mut self, id: &TicketId) -> Option<Ticket> {
        let position = self.tickets.iter().position(|t| t.id == *id)?;
        let mut ticket = self.tickets.remove(position);
        if ticket.order() == Some(self.key) {
            ticket.set_order(None);
        }
        Some(ticket)
    }

    /// Detach every ticket, returning them in order.
    pub fn clear_tickets(&mut self) -> Vec<Ticket> {
        let ids: Vec<TicketId> = self.tickets.iter().map(|t| t.id).collect();
        ids.iter().filter_map(|id| self.remove_ticket(id)).collect()
    }

    /// Sum of the tariff prices of the current tickets.
    ///
    /// Returns `None` while the visit date is unknown.
    pub fn price_of_tickets(&self) -> Option<i32> {
        let visit_date = self.visit_date?;
        Some(
            self.tickets
                .iter()
                .map(|t| t.tariff(visit_date).price())
                .sum(),
        )
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewTicket;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_ticket(first_name: &str, birth_date: NaiveDate) -> Ticket {
        Ticket::new(NewTicket {
            first_name: first_name.to_string(),
            last_name: "Martin".to_string(),
            country: "FR".to_string(),
            birth_date,
            reduced: false,
        })
    }

    #[test]
    fn new_order_has_nothing_computed() {
        let order = Order::new();
        assert_eq!(order.stage(), OrderStage::Started);
        assert!(order.id().is_none());
        assert!(order.email().is_none());
        assert!(order.total_price().is_none());
        assert!(order.order_number().is_none());
        assert!(order.tickets().is_empty());
    }

    #[test]
    fn add_ticket_sets_back_reference() {
        let mut order = Order::new();
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));

        assert_eq!(order.tickets().len(), 1);
        assert_eq!(order.tickets()[0].order(), Some(order.key()));
    }

    #[test]
    fn add_ticket_is_idempotent_per_identity() {
        let mut order = Order::new();
        let ticket = make_ticket("Jean", date(1980, 1, 1));

        order.add_ticket(ticket.clone());
        order.add_ticket(ticket.clone());
        order.add_ticket(ticket);

        assert_eq!(order.tickets().len(), 1);
    }

    #[test]
    fn add_ticket_accepts_identical_content_with_new_identity() {
        let mut order = Order::new();
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));

        assert_eq!(order.tickets().len(), 2);
    }

    #[test]
    fn remove_ticket_clears_back_reference() {
        let mut order = Order::new();
        let ticket = make_ticket("Jean", date(1980, 1, 1));
        let id = ticket.id;
        order.add_ticket(ticket);

        let removed = order.remove_ticket(&id).unwrap();

        assert!(removed.order().is_none());
        assert!(order.tickets().is_empty());
        assert!(!order.contains_ticket(&id));
    }

    #[test]
    fn remove_unknown_ticket_is_noop() {
        let mut order = Order::new();
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));

        assert!(order.remove_ticket(&TicketId::new()).is_none());
        assert_eq!(order.tickets().len(), 1);
    }

    #[test]
    fn ticket_moved_to_another_order_keeps_new_owner() {
        let mut first = Order::new();
        let mut second = Order::new();
        let ticket = make_ticket("Jean", date(1980, 1, 1));
        let id = ticket.id;

        first.add_ticket(ticket);
        let ticket = first.remove_ticket(&id).unwrap();
        second.add_ticket(ticket);

        assert_eq!(second.tickets()[0].order(), Some(second.key()));
    }

    #[test]
    fn clear_tickets_detaches_all() {
        let mut order = Order::new();
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));
        order.add_ticket(make_ticket("Marie", date(1985, 1, 1)));

        let removed = order.clear_tickets();

        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].first_name, "Jean");
        assert!(removed.iter().all(|t| t.order().is_none()));
        assert!(order.tickets().is_empty());
    }

    #[test]
    fn price_of_tickets_needs_visit_date() {
        let mut order = Order::new();
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));
        assert!(order.price_of_tickets().is_none());

        order.set_visit_date(date(2030, 6, 1));
        assert_eq!(order.price_of_tickets(), Some(1600));
    }

    #[test]
    fn price_of_tickets_changes_with_tickets() {
        let mut order = Order::new();
        order.set_visit_date(date(2030, 6, 1));
        order.add_ticket(make_ticket("Jean", date(1980, 1, 1)));
        order.add_ticket(make_ticket("Lou", date(2022, 1, 1)));
        assert_eq!(order.price_of_tickets(), Some(1600 + 800));

        order.add_ticket(make_ticket("Paul", date(1960, 1, 1)));
        assert_eq!(order.price_of_tickets(), Some(1600 + 800 + 1200));
    }

    #[test]
    fn setters_chain() {
        let mut order = Order::new();
        order
            .set_email("buyer@example.com")
            .set_visit_date(date(2030, 6, 1))
            .set_quantity(3)
            .set_total_price(4800)
            .set_order_number("LVR-20300601-ABCDEF12");

        assert_eq!(order.email(), Some("buyer@example.com"));
        assert_eq!(order.quantity(), 3);
        assert_eq!(order.total_price(), Some(4800));
        assert_eq!(order.order_number(), Some("LVR-20300601-ABCDEF12"));

        order.clear_total_price().clear_order_number();
        assert!(order.total_price().is_none());
        assert!(order.order_number().is_none());
    }

    #[test]
    fn payment_attempts_give_distinct_idempotency_keys() {
        let mut order = Order::new();
        assert!(order.payment_idempotency_key().is_none());

        order.set_order_number("LVR-20300601-ABCDEF12");
        assert_eq!(order.record_payment_attempt(), 1);
        let first = order.payment_idempotency_key().unwrap();
        assert_eq!(first, "LVR-20300601-ABCDEF12-1");
        assert_eq!(order.payment_idempotency_key().unwrap(), first);

        assert_eq!(order.record_payment_attempt(), 2);
        assert_eq!(order.payment_attempts(), 2);
        assert_ne!(order.payment_idempotency_key().unwrap(), first);
    }

    #[test]
    fn stage_ordering_follows_flow() {
        assert!(OrderStage::Started < OrderStage::DetailsEntered);
        assert!(OrderStage::DetailsEntered < OrderStage::Priced);
        assert!(OrderStage::Priced < OrderStage::CheckoutFailed);
        assert!(OrderStage::CheckoutFailed < OrderStage::Paid);
        assert_eq!(OrderStage::CheckoutFailed.to_string(), "checkout_failed");
    }
}
