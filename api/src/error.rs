//! Unified error types for the ticketing API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `PaymentError`: Payment gateway errors
//! - `MailError`: Mail delivery errors
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::locale::{Locale, Page};

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Payment gateway errors
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message build error: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// No order in the session, or its details were never submitted
    #[error("Order not found in session")]
    OrderNotFound,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Build the response for a visitor browsing in `locale`
    pub fn into_localized_response(self, locale: Locale) -> Response {
        let (status, error, details) = match &self {
            AppError::OrderNotFound => {
                tracing::debug!("No order in session, redirecting to error page");
                return Redirect::to(locale.path(Page::Error)).into_response();
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Payment(e) => {
                tracing::error!("Payment error: {}", e);
                (StatusCode::BAD_GATEWAY, "Payment service error", None)
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {}", e);
                (StatusCode::BAD_GATEWAY, "Mail service error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_localized_response(Locale::default())
    }
}

/// An `AppError` raised while serving a page of a given locale
#[derive(Debug)]
pub struct LocalizedError {
    pub locale: Locale,
    pub error: AppError,
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        self.error.into_localized_response(self.locale)
    }
}

/// Attach the page locale to an error on its way out of a handler
pub trait ResultExt<T> {
    fn localized(self, locale: Locale) -> Result<T, LocalizedError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn localized(self, locale: Locale) -> Result<T, LocalizedError> {
        self.map_err(|e| LocalizedError {
            locale,
            error: e.into(),
        })
    }
}
