//! Mailer adapters

pub mod log;
pub mod smtp;
pub mod templates;

pub use log::LogMailer;
pub use smtp::SmtpMailer;
