//! Ticket domain entity
//!
//! A single admission line-item (billet) inside an order.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::order::OrderKey;
use super::tariff::Tariff;

/// Unique identifier for a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TicketId(pub Uuid);

impl TicketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ticket holder admitted on the order's visit date
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: TicketId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub birth_date: NaiveDate,
    /// Holder claims the reduced rate (student, employee, veteran...)
    pub reduced: bool,
    /// Owning order, set by `Order::add_ticket`
    #[serde(skip)]
    order: Option<OrderKey>,
}

impl Ticket {
    pub fn new(new_ticket: NewTicket) -> Self {
        Self {
            id: TicketId::new(),
            first_name: new_ticket.first_name,
            last_name: new_ticket.last_name,
            country: new_ticket.country,
            birth_date: new_ticket.birth_date,
            reduced: new_ticket.reduced,
            order: None,
        }
    }

    /// The order this ticket currently belongs to
    pub fn order(&self) -> Option<OrderKey> {
        self.order
    }

    pub(super) fn set_order(&mut self, order: Option<OrderKey>) {
        self.order = order;
    }

    /// Tariff that applies to this holder for a visit on `visit_date`
    pub fn tariff(&self, visit_date: NaiveDate) -> Tariff {
        Tariff::for_holder(self.birth_date, visit_date, self.reduced)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data submitted for one ticket holder
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub birth_date: NaiveDate,
    pub reduced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_ticket(birth_date: NaiveDate, reduced: bool) -> Ticket {
        Ticket::new(NewTicket {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            country: "GB".to_string(),
            birth_date,
            reduced,
        })
    }

    #[test]
    fn new_ticket_has_no_owner() {
        let ticket = make_ticket(date(1990, 1, 1), false);
        assert!(ticket.order().is_none());
    }

    #[test]
    fn new_tickets_get_distinct_ids() {
        let a = make_ticket(date(1990, 1, 1), false);
        let b = make_ticket(date(1990, 1, 1), false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn tariff_uses_age_on_visit_date() {
        let ticket = make_ticket(date(2010, 6, 15), false);
        assert_eq!(ticket.tariff(date(2022, 6, 14)), Tariff::Child);
        assert_eq!(ticket.tariff(date(2022, 6, 15)), Tariff::Normal);
    }

    #[test]
    fn full_name_joins_names() {
        let ticket = make_ticket(date(1990, 1, 1), false);
        assert_eq!(ticket.full_name(), "Ada Lovelace");
    }

    #[test]
    fn serialized_ticket_hides_owner() {
        let ticket = make_ticket(date(1990, 1, 1), true);
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(json.contains("Lovelace"));
        assert!(json.contains("\"reduced\":true"));
        assert!(!json.contains("order"));
    }

    #[test]
    fn ticket_id_display() {
        let id = TicketId(uuid::Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }
}
