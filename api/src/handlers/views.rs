//! Page models
//!
//! The JSON documents returned by page routes: what a template would be
//! rendered with.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{Flash, Order, OrderStage, Tariff, Ticket};
use crate::locale::{Locale, Page};

/// Envelope shared by every page
#[derive(Debug, Serialize)]
pub struct PageModel<T: Serialize> {
    pub locale: Locale,
    pub page: Page,
    pub flashes: Vec<FlashView>,
    #[serde(flatten)]
    pub content: T,
}

impl<T: Serialize> PageModel<T> {
    pub fn new(locale: Locale, page: Page, flashes: &[Flash], content: T) -> Self {
        Self {
            locale,
            page,
            flashes: flashes
                .iter()
                .map(|flash| FlashView::new(locale, flash))
                .collect(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlashView {
    pub level: &'static str,
    #[serde(flatten)]
    pub flash: Flash,
    pub message: String,
}

impl FlashView {
    pub fn new(locale: Locale, flash: &Flash) -> Self {
        Self {
            level: flash.level(),
            flash: flash.clone(),
            message: locale.flash_message(flash),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub birth_date: NaiveDate,
    pub reduced: bool,
    pub tariff: Tariff,
    pub price: i32,
    pub price_display: String,
}

impl TicketView {
    fn new(ticket: &Ticket, visit_date: NaiveDate, locale: Locale) -> Self {
        let tariff = ticket.tariff(visit_date);
        Self {
            id: ticket.id.to_string(),
            first_name: ticket.first_name.clone(),
            last_name: ticket.last_name.clone(),
            country: ticket.country.clone(),
            birth_date: ticket.birth_date,
            reduced: ticket.reduced,
            tariff,
            price: tariff.price(),
            price_display: locale.price(tariff.price()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub email: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub quantity: u32,
    pub stage: OrderStage,
    pub total_price: Option<i32>,
    pub total_price_display: Option<String>,
    pub order_number: Option<String>,
    pub tickets: Vec<TicketView>,
}

impl OrderView {
    pub fn new(order: &Order, locale: Locale) -> Self {
        let tickets = match order.visit_date() {
            Some(date) => order
                .tickets()
                .iter()
                .map(|t| TicketView::new(t, date, locale))
                .collect(),
            None => Vec::new(),
        };

        Self {
            id: order.id().map(|id| id.0),
            email: order.email().map(str::to_string),
            visit_date: order.visit_date(),
            quantity: order.quantity(),
            stage: order.stage(),
            total_price: order.total_price(),
            total_price_display: order.total_price().map(|p| locale.price(p)),
            order_number: order.order_number().map(str::to_string),
            tickets,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TariffView {
    pub tariff: Tariff,
    pub price: i32,
    pub price_display: String,
}

impl TariffView {
    pub fn all(locale: Locale) -> Vec<Self> {
        [
            Tariff::Baby,
            Tariff::Child,
            Tariff::Normal,
            Tariff::Senior,
            Tariff::Reduced,
        ]
        .into_iter()
        .map(|tariff| Self {
            tariff,
            price: tariff.price(),
            price_display: locale.price(tariff.price()),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::paid_order;

    #[test]
    fn flash_view_is_localized() {
        let view = FlashView::new(Locale::En, &Flash::PaymentFailed);
        assert_eq!(view.level, "error");
        assert!(view.message.contains("payment"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "payment_failed");
    }

    #[test]
    fn order_view_carries_ticket_prices() {
        let order = paid_order();
        let view = OrderView::new(&order, Locale::Fr);

        assert_eq!(view.tickets.len(), 2);
        assert_eq!(
            view.tickets.iter().map(|t| t.price).sum::<i32>(),
            order.total_price().unwrap()
        );
        assert_eq!(view.total_price_display.as_deref(), Some("24,00 €"));
    }

    #[test]
    fn page_model_flattens_content() {
        #[derive(Serialize)]
        struct Content {
            answer: u32,
        }

        let model = PageModel::new(Locale::Fr, Page::Home, &[], Content { answer: 42 });
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["locale"], "fr");
        assert_eq!(json["page"], "home");
        assert_eq!(json["answer"], 42);
    }
}
