//! Session domain entities
//!
//! What the ordering flow keeps between two requests of the same visitor.

use serde::Serialize;

use super::order::Order;

/// Opaque identifier carried by the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Flash {
    /// Fewer tickets than the warning threshold remain for the visit date
    LowAvailability { remaining: u32 },
    /// The last checkout attempt was declined or could not reach the gateway
    PaymentFailed,
    /// The contact form message was handed to the mailer
    ContactSent,
}

impl Flash {
    /// Presentation level, used as the flash bag name
    pub fn level(&self) -> &'static str {
        match self {
            Flash::LowAvailability { .. } => "warning",
            Flash::PaymentFailed => "error",
            Flash::ContactSent => "contact-mail",
        }
    }
}

/// Everything stored for one session
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub order: Option<Order>,
    pub flashes: Vec<Flash>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.order.is_none() && self.flashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_levels() {
        assert_eq!(Flash::LowAvailability { remaining: 3 }.level(), "warning");
        assert_eq!(Flash::PaymentFailed.level(), "error");
        assert_eq!(Flash::ContactSent.level(), "contact-mail");
    }

    #[test]
    fn default_session_is_empty() {
        let data = SessionData::default();
        assert!(data.is_empty());
    }

    #[test]
    fn session_with_flash_is_not_empty() {
        let data = SessionData {
            order: None,
            flashes: vec![Flash::PaymentFailed],
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn flash_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Flash::LowAvailability { remaining: 12 }).unwrap();
        assert_eq!(json, r#"{"kind":"low_availability","remaining":12}"#);
    }
}
