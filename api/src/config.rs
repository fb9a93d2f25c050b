use std::env;
use std::str::FromStr;

use anyhow::{ensure, Context};

/// Upper bound for `SESSION_TTL_MINUTES`, one week
const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Tickets that can be sold for a single visit date
    pub daily_capacity: u32,
    /// Remaining tickets under which the selection page warns the visitor
    pub availability_warning_threshold: u32,
    pub max_tickets_per_order: u32,
    pub session_ttl_minutes: i64,
    /// Prefix of generated order numbers
    pub order_number_prefix: String,
    pub currency: String,
    /// Stripe secret key; the fake gateway is used when absent
    pub stripe_secret_key: Option<String>,
    pub stripe_api_url: String,
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
    /// Inbox receiving contact-form messages
    pub contact_recipient: String,
    /// Contact form rate limit per peer IP; disabled when `None`
    pub contact_rate_per_second: Option<u64>,
    pub contact_rate_burst: u32,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let smtp = match env::var("SMTP_HOST").ok() {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_var("SMTP_PORT", 587)?,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            }),
            None => None,
        };

        let contact_rate_per_second: u64 = parse_var("CONTACT_RATE_PER_SECOND", 1)?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            daily_capacity: parse_var("DAILY_CAPACITY", 1000)?,
            availability_warning_threshold: parse_var("AVAILABILITY_WARNING_THRESHOLD", 25)?,
            max_tickets_per_order: parse_var("MAX_TICKETS_PER_ORDER", 10)?,
            session_ttl_minutes: session_ttl_minutes(parse_var("SESSION_TTL_MINUTES", 30)?)?,
            order_number_prefix: env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|_| "LVR".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "eur".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            stripe_api_url: env::var("STRIPE_API_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            smtp,
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Musée du Louvre <billetterie@localhost>".to_string()),
            contact_recipient: env::var("CONTACT_RECIPIENT")
                .unwrap_or_else(|_| "contact@localhost".to_string()),
            contact_rate_per_second: (contact_rate_per_second > 0)
                .then_some(contact_rate_per_second),
            contact_rate_burst: parse_var("CONTACT_RATE_BURST", 5)?,
        })
    }
}

fn session_ttl_minutes(minutes: i64) -> anyhow::Result<i64> {
    ensure!(
        (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes),
        "SESSION_TTL_MINUTES must be between 1 and {}, got {}",
        MAX_SESSION_TTL_MINUTES,
        minutes
    );
    Ok(minutes)
}

/// Read and parse an optional environment variable
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} has an invalid value: {:?}", name, raw))
}
