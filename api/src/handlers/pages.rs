//! Static and informational pages

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use super::views::{PageModel, TariffView};
use crate::domain::entities::SessionId;
use crate::error::{LocalizedError, ResultExt};
use crate::locale::{Locale, Page};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub order_path: &'static str,
    pub tariffs: Vec<TariffView>,
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    pub home_path: &'static str,
    pub contact_path: &'static str,
}

/// GET / and /en
pub async fn home(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<HomeView>>, LocalizedError> {
    let flashes = state
        .order_workflow
        .take_flashes(&session)
        .await
        .localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Home,
        &flashes,
        HomeView {
            order_path: locale.path(Page::Order),
            tariffs: TariffView::all(locale),
        },
    )))
}

/// GET /erreur and /en/error
///
/// Landing page when the session holds no usable order.
pub async fn error_page(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<LinkView>>, LocalizedError> {
    let flashes = state
        .order_workflow
        .take_flashes(&session)
        .await
        .localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Error,
        &flashes,
        links(locale),
    )))
}

/// GET /mentions-legales and /en/legal-notice
pub async fn legal_notice(Extension(locale): Extension<Locale>) -> Json<PageModel<LinkView>> {
    Json(PageModel::new(locale, Page::LegalNotice, &[], links(locale)))
}

/// GET /conditions-generales and /en/terms
pub async fn terms(Extension(locale): Extension<Locale>) -> Json<PageModel<LinkView>> {
    Json(PageModel::new(locale, Page::Terms, &[], links(locale)))
}

fn links(locale: Locale) -> LinkView {
    LinkView {
        home_path: locale.path(Page::Home),
        contact_path: locale.path(Page::Contact),
    }
}
