//! HTTP handlers
//!
//! Axum request handlers for the site pages. Every handler receives the page
//! locale and the visitor's session id as request extensions.

pub mod contact;
pub mod order;
pub mod pages;
pub mod views;

pub use contact::{contact_page, send_contact};
pub use order::{
    cancel, checkout, confirmation, order_form, selection_form, submit_order, submit_selection,
    success,
};
pub use pages::{error_page, home, legal_notice, terms};
