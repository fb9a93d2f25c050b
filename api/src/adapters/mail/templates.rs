//! Plain-text mail bodies

use std::fmt::Write;

use crate::domain::entities::{format_price, ContactMessage, Order};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
    pub subject: String,
    pub body: String,
}

/// Summary mailed to the buyer once the order is paid and stored
pub fn order_confirmation(order: &Order) -> MailContent {
    let order_number = order.order_number().unwrap_or_default();
    let visit_date = order
        .visit_date()
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();

    let mut body = String::new();
    let _ = writeln!(body, "Merci pour votre commande / Thank you for your order.");
    let _ = writeln!(body);
    let _ = writeln!(body, "Commande / Order: {}", order_number);
    let _ = writeln!(body, "Date de visite / Visit date: {}", visit_date);
    let _ = writeln!(body);

    if let Some(date) = order.visit_date() {
        for ticket in order.tickets() {
            let tariff = ticket.tariff(date);
            let _ = writeln!(
                body,
                "- {} ({}, {}) : {}",
                ticket.full_name(),
                ticket.country,
                tariff,
                format_price(tariff.price())
            );
        }
    }

    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Total : {}",
        format_price(order.total_price().unwrap_or_default())
    );
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Présentez ce message à l'entrée du musée. / Show this message at the museum entrance."
    );
    if order.tickets().iter().any(|t| t.reduced) {
        let _ = writeln!(
            body,
            "Un justificatif sera demandé pour les tarifs réduits. / Proof of eligibility is required for reduced tickets."
        );
    }

    MailContent {
        subject: format!("Musée du Louvre - Commande {}", order_number),
        body,
    }
}

/// Contact-form message as forwarded to the museum's inbox
pub fn contact_forward(message: &ContactMessage) -> MailContent {
    MailContent {
        subject: format!("[Contact] {}", message.subject),
        body: format!(
            "De / From: {} <{}>\n\n{}\n",
            message.name, message.email, message.message
        ),
    }
}
