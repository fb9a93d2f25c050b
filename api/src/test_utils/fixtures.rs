//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{Duration, NaiveDate, Utc};

use crate::app::OrderDetails;
use crate::config::Config;
use crate::domain::entities::{ContactMessage, NewTicket, Order, OrderStage, Ticket};

/// A visit date safely in the future
pub fn future_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(30)
}

/// Details-step input for `quantity` tickets on [`future_date`]
pub fn test_details(quantity: u32) -> OrderDetails {
    OrderDetails {
        email: "buyer@example.com".to_string(),
        visit_date: future_date(),
        quantity,
    }
}

fn holder(first_name: &str, birth_date: NaiveDate) -> NewTicket {
    NewTicket {
        first_name: first_name.to_string(),
        last_name: "Martin".to_string(),
        country: "FR".to_string(),
        birth_date,
        reduced: false,
    }
}

/// Holder paying the normal tariff
pub fn adult(first_name: &str) -> NewTicket {
    holder(first_name, NaiveDate::from_ymd_opt(1980, 5, 1).unwrap())
}

/// Holder about eight years old on [`future_date`]
pub fn child(first_name: &str) -> NewTicket {
    holder(first_name, Utc::now().date_naive() - Duration::days(8 * 365))
}

/// Holder paying the senior tariff
pub fn senior(first_name: &str) -> NewTicket {
    holder(first_name, NaiveDate::from_ymd_opt(1950, 3, 15).unwrap())
}

/// A paid order with an adult and a child, ready for the success step
pub fn paid_order() -> Order {
    let mut order = Order::new();
    order
        .set_email("buyer@example.com")
        .set_visit_date(future_date())
        .set_quantity(2)
        .add_ticket(Ticket::new(adult("Jean")))
        .add_ticket(Ticket::new(child("Lou")));

    let total = order.price_of_tickets().unwrap();
    order
        .set_total_price(total)
        .set_order_number("LVR-20300714-DEADBEEF")
        .set_stage(OrderStage::Paid);
    order
}

pub fn contact_message() -> ContactMessage {
    ContactMessage {
        name: "Jean Martin".to_string(),
        email: "visitor@example.com".to_string(),
        subject: "Horaires".to_string(),
        message: "Le musée est-il ouvert le mardi ?".to_string(),
    }
}

/// Configuration for in-process servers, with rate limiting disabled
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        port: 0,
        daily_capacity: 1000,
        availability_warning_threshold: 25,
        max_tickets_per_order: 10,
        session_ttl_minutes: 30,
        order_number_prefix: "LVR".to_string(),
        currency: "eur".to_string(),
        stripe_secret_key: None,
        stripe_api_url: "https://api.stripe.com".to_string(),
        smtp: None,
        mail_from: "billetterie@example.com".to_string(),
        contact_recipient: "contact@example.com".to_string(),
        contact_rate_per_second: None,
        contact_rate_burst: 5,
    }
}
