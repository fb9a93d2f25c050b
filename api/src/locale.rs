//! Site locales
//!
//! French pages live at the root, English pages under `/en`.

use serde::Serialize;

use crate::domain::entities::{format_price, Flash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    /// Route of a page in this locale
    pub fn path(self, page: Page) -> &'static str {
        match (self, page) {
            (Locale::Fr, Page::Home) => "/",
            (Locale::Fr, Page::Order) => "/commande",
            (Locale::Fr, Page::Selection) => "/selection",
            (Locale::Fr, Page::Confirmation) => "/confirmation",
            (Locale::Fr, Page::Checkout) => "/checkout",
            (Locale::Fr, Page::Success) => "/succes",
            (Locale::Fr, Page::Error) => "/erreur",
            (Locale::Fr, Page::Cancel) => "/cancel",
            (Locale::Fr, Page::LegalNotice) => "/mentions-legales",
            (Locale::Fr, Page::Contact) => "/contact",
            (Locale::Fr, Page::Terms) => "/conditions-generales",
            (Locale::En, Page::Home) => "/en",
            (Locale::En, Page::Order) => "/en/order",
            (Locale::En, Page::Selection) => "/en/selection",
            (Locale::En, Page::Confirmation) => "/en/confirmation",
            (Locale::En, Page::Checkout) => "/en/checkout",
            (Locale::En, Page::Success) => "/en/success",
            (Locale::En, Page::Error) => "/en/error",
            (Locale::En, Page::Cancel) => "/en/cancel",
            (Locale::En, Page::LegalNotice) => "/en/legal-notice",
            (Locale::En, Page::Contact) => "/en/contact",
            (Locale::En, Page::Terms) => "/en/terms",
        }
    }

    pub fn flash_message(self, flash: &Flash) -> String {
        match (self, flash) {
            (Locale::Fr, Flash::LowAvailability { remaining }) => format!(
                "Attention, il ne reste que {} billets disponibles pour ce jour.",
                remaining
            ),
            (Locale::En, Flash::LowAvailability { remaining }) => format!(
                "Warning, only {} tickets are left for this day.",
                remaining
            ),
            (Locale::Fr, Flash::PaymentFailed) => {
                "Une erreur s'est produite durant le paiement. Veuillez réessayer s'il vous plaît."
                    .to_string()
            }
            (Locale::En, Flash::PaymentFailed) => {
                "An error occurred during payment. Please try again.".to_string()
            }
            (Locale::Fr, Flash::ContactSent) => {
                "Votre message a bien été envoyé, vous pouvez retourner à l'accueil du site"
                    .to_string()
            }
            (Locale::En, Flash::ContactSent) => {
                "Your message has been sent, you can go back to the home page".to_string()
            }
        }
    }

    /// Price formatted for display in this locale
    pub fn price(self, cents: i32) -> String {
        match self {
            Locale::Fr => format_price(cents),
            Locale::En => {
                let sign = if cents < 0 { "-" } else { "" };
                let cents = cents.unsigned_abs();
                format!("{}€{}.{:02}", sign, cents / 100, cents % 100)
            }
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Fr
    }
}

/// Pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Order,
    Selection,
    Confirmation,
    Checkout,
    Success,
    Error,
    Cancel,
    LegalNotice,
    Contact,
    Terms,
}
