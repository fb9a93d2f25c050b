//! Input validation shared by the services

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::domain::entities::NewTicket;
use crate::error::DomainError;

/// Longest accepted free-text field (names, countries, subjects)
pub const MAX_FIELD_LENGTH: usize = 255;

/// Longest accepted contact message body
pub const MAX_MESSAGE_LENGTH: usize = 5000;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.len() > MAX_FIELD_LENGTH || !email_regex().is_match(email) {
        return Err(DomainError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(())
}

/// Require a trimmed, non-empty value of bounded length
pub fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

pub fn validate_visit_date(visit_date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if visit_date < today {
        return Err(DomainError::Validation(
            "Visit date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: u32, max: u32) -> Result<(), DomainError> {
    if quantity == 0 || quantity > max {
        return Err(DomainError::Validation(format!(
            "Ticket quantity must be between 1 and {}",
            max
        )));
    }
    Ok(())
}

/// Check one ticket holder submitted for a visit on `visit_date`
pub fn validate_new_ticket(
    position: usize,
    ticket: &NewTicket,
    visit_date: NaiveDate,
) -> Result<(), DomainError> {
    let label = |field: &str| format!("Ticket {}: {}", position + 1, field);
    validate_text(&label("first name"), &ticket.first_name, MAX_FIELD_LENGTH)?;
    validate_text(&label("last name"), &ticket.last_name, MAX_FIELD_LENGTH)?;
    validate_text(&label("country"), &ticket.country, MAX_FIELD_LENGTH)?;
    if ticket.birth_date > visit_date {
        return Err(DomainError::Validation(format!(
            "Ticket {}: birth date cannot be after the visit date",
            position + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holder() -> NewTicket {
        NewTicket {
            first_name: "Jean".to_string(),
            last_name: "Martin".to_string(),
            country: "FR".to_string(),
            birth_date: date(1980, 1, 1),
            reduced: false,
        }
    }

    #[test]
    fn accepts_plain_email() {
        assert!(validate_email("visitor@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate_email("visitor").is_err());
        assert!(validate_email("visitor@").is_err());
        assert!(validate_email("visitor@example").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn visit_date_today_is_allowed() {
        let today = date(2030, 1, 10);
        assert!(validate_visit_date(today, today).is_ok());
        assert!(validate_visit_date(date(2030, 1, 9), today).is_err());
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(0, 10).is_err());
        assert!(validate_quantity(1, 10).is_ok());
        assert!(validate_quantity(10, 10).is_ok());
        assert!(validate_quantity(11, 10).is_err());
    }

    #[test]
    fn text_must_not_be_blank() {
        assert!(validate_text("name", "   ", 10).is_err());
        assert!(validate_text("name", "Zoé", 3).is_ok());
        assert!(validate_text("name", "Zoée", 3).is_err());
    }

    #[test]
    fn ticket_holder_needs_names_and_country() {
        let mut ticket = holder();
        ticket.country = String::new();
        let err = validate_new_ticket(1, &ticket, date(2030, 1, 1)).unwrap_err();
        assert!(err.to_string().contains("Ticket 2: country"));
    }

    #[test]
    fn ticket_holder_cannot_be_born_after_visit() {
        let mut ticket = holder();
        ticket.birth_date = date(2030, 1, 2);
        assert!(validate_new_ticket(0, &ticket, date(2030, 1, 1)).is_err());
        assert!(validate_new_ticket(0, &holder(), date(2030, 1, 1)).is_ok());
    }
}
