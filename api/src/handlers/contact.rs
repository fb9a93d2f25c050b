//! Contact page handlers

use axum::{extract::State, response::Redirect, Extension, Form, Json};
use serde::Serialize;

use super::views::PageModel;
use crate::domain::entities::{ContactMessage, Flash, SessionId};
use crate::error::{LocalizedError, ResultExt};
use crate::locale::{Locale, Page};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ContactView {
    pub action: &'static str,
    pub home_path: &'static str,
}

/// GET /contact and /en/contact
pub async fn contact_page(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<ContactView>>, LocalizedError> {
    let flashes = state
        .order_workflow
        .take_flashes(&session)
        .await
        .localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Contact,
        &flashes,
        ContactView {
            action: locale.path(Page::Contact),
            home_path: locale.path(Page::Home),
        },
    )))
}

/// POST /contact and /en/contact
pub async fn send_contact(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
    Form(message): Form<ContactMessage>,
) -> Result<Redirect, LocalizedError> {
    state
        .contact_service
        .send(message)
        .await
        .localized(locale)?;

    state
        .order_workflow
        .push_flash(&session, Flash::ContactSent)
        .await
        .localized(locale)?;

    Ok(Redirect::to(locale.path(Page::Contact)))
}
