//! Ordering flow handlers
//!
//! details (`/commande`) -> selection -> confirmation -> checkout -> success.
//! Form posts answer with `303 See Other` to the next step.

use std::collections::HashMap;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::views::{OrderView, PageModel};
use crate::app::{CheckoutOutcome, OrderDetails};
use crate::domain::entities::{Flash, NewTicket, OrderStage, SessionId};
use crate::error::{DomainError, LocalizedError, ResultExt};
use crate::locale::{Locale, Page};
use crate::AppState;

const TICKET_FIELDS: [&str; 5] = ["first_name", "last_name", "country", "birth_date", "reduced"];

/// Details-step form
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub email: String,
    pub visit_date: NaiveDate,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    /// Card token from the payment widget
    #[serde(default, alias = "stripeToken")]
    pub payment_token: String,
}

#[derive(Debug, Serialize)]
pub struct OrderFormView {
    pub email: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub quantity: u32,
    pub min_visit_date: NaiveDate,
    pub max_tickets: u32,
    pub action: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub order: OrderView,
    pub remaining: u32,
    pub action: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub order: OrderView,
    pub currency: String,
    pub checkout_path: &'static str,
    pub cancel_path: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SuccessView {
    pub order: OrderView,
    pub home_path: &'static str,
}

/// GET /commande and /en/order
pub async fn order_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<OrderFormView>>, LocalizedError> {
    let workflow = &state.order_workflow;
    let order = workflow.init_order(&session).await.localized(locale)?;
    let flashes = workflow.take_flashes(&session).await.localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Order,
        &flashes,
        OrderFormView {
            email: order.email().map(str::to_string),
            visit_date: order.visit_date(),
            quantity: order.quantity().max(1),
            min_visit_date: Utc::now().date_naive(),
            max_tickets: workflow.settings().max_tickets_per_order,
            action: locale.path(Page::Order),
        },
    )))
}

/// POST /commande and /en/order
pub async fn submit_order(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<OrderForm>,
) -> Result<Redirect, LocalizedError> {
    state
        .order_workflow
        .submit_details(
            &session,
            OrderDetails {
                email: form.email,
                visit_date: form.visit_date,
                quantity: form.quantity,
            },
        )
        .await
        .localized(locale)?;

    Ok(Redirect::to(locale.path(Page::Selection)))
}

/// GET /selection and /en/selection
///
/// Warns when the visit date is nearly sold out.
pub async fn selection_form(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<SelectionView>>, LocalizedError> {
    let workflow = &state.order_workflow;
    let order = workflow.current_order(&session).await.localized(locale)?;
    let mut flashes = workflow.take_flashes(&session).await.localized(locale)?;

    if let Some(remaining) = workflow
        .availability_warning(&order)
        .await
        .localized(locale)?
    {
        flashes.push(Flash::LowAvailability { remaining });
    }

    let remaining = match order.visit_date() {
        Some(date) => workflow.remaining_capacity(date).await.localized(locale)?,
        None => 0,
    };

    Ok(Json(PageModel::new(
        locale,
        Page::Selection,
        &flashes,
        SelectionView {
            order: OrderView::new(&order, locale),
            remaining,
            action: locale.path(Page::Selection),
        },
    )))
}

/// POST /selection and /en/selection
pub async fn submit_selection(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, LocalizedError> {
    let workflow = &state.order_workflow;
    let tickets = parse_ticket_forms(&form, workflow.settings().max_tickets_per_order)
        .localized(locale)?;

    workflow
        .select_tickets(&session, tickets)
        .await
        .localized(locale)?;

    Ok(Redirect::to(locale.path(Page::Confirmation)))
}

/// GET /confirmation and /en/confirmation
pub async fn confirmation(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Response, LocalizedError> {
    let workflow = &state.order_workflow;
    let order = workflow.current_order(&session).await.localized(locale)?;

    if order.stage() < OrderStage::Priced {
        return Ok(Redirect::to(locale.path(Page::Selection)).into_response());
    }

    let flashes = workflow.take_flashes(&session).await.localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Confirmation,
        &flashes,
        ConfirmationView {
            order: OrderView::new(&order, locale),
            currency: workflow.settings().currency.clone(),
            checkout_path: locale.path(Page::Checkout),
            cancel_path: locale.path(Page::Cancel),
        },
    ))
    .into_response())
}

/// POST /checkout and /en/checkout
///
/// A refused payment sends the visitor back to the confirmation page with an
/// error flash.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect, LocalizedError> {
    let outcome = state
        .order_workflow
        .checkout(&session, &form.payment_token)
        .await
        .localized(locale)?;

    let next = match outcome {
        CheckoutOutcome::Paid => Page::Success,
        CheckoutOutcome::Failed => Page::Confirmation,
    };

    Ok(Redirect::to(locale.path(next)))
}

/// GET /succes and /en/success
pub async fn success(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<PageModel<SuccessView>>, LocalizedError> {
    let order = state
        .order_workflow
        .complete(&session)
        .await
        .localized(locale)?;

    Ok(Json(PageModel::new(
        locale,
        Page::Success,
        &[],
        SuccessView {
            order: OrderView::new(&order, locale),
            home_path: locale.path(Page::Home),
        },
    )))
}

/// GET /cancel and /en/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Extension(session): Extension<SessionId>,
) -> Result<Redirect, LocalizedError> {
    state
        .order_workflow
        .clear_session(&session)
        .await
        .localized(locale)?;

    tracing::debug!("Order cancelled by visitor");
    Ok(Redirect::to(locale.path(Page::Home)))
}

/// Build ticket holders from the indexed selection fields
/// (`first_name_0`, `birth_date_0`, `reduced_0`, ...).
fn parse_ticket_forms(
    form: &HashMap<String, String>,
    max_tickets: u32,
) -> Result<Vec<NewTicket>, DomainError> {
    let indices = form.keys().filter_map(|key| {
        let (field, index) = key.rsplit_once('_')?;
        if !TICKET_FIELDS.contains(&field) {
            return None;
        }
        index.parse::<usize>().ok()
    });

    let mut count = 0;
    for index in indices {
        if index >= max_tickets as usize {
            return Err(DomainError::Validation(format!(
                "At most {} tickets per order",
                max_tickets
            )));
        }
        count = count.max(index + 1);
    }

    let field = |name: &str, index: usize| {
        form.get(&format!("{}_{}", name, index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    (0..count)
        .map(|index| {
            let birth_date = field("birth_date", index);
            let birth_date = NaiveDate::parse_from_str(&birth_date, "%Y-%m-%d").map_err(|_| {
                DomainError::Validation(format!("Ticket {}: invalid birth date", index + 1))
            })?;

            Ok(NewTicket {
                first_name: field("first_name", index),
                last_name: field("last_name", index),
                country: field("country", index),
                birth_date,
                reduced: matches!(field("reduced", index).as_str(), "on" | "1" | "true"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn form_with(key: &str) -> HashMap<String, String> {
        HashMap::from([(key.to_string(), "Jean".to_string())])
    }

    #[test]
    fn parses_indexed_holders() {
        let form = form(&[
            ("first_name_0", "Jean"),
            ("last_name_0", "Martin"),
            ("country_0", "FR"),
            ("birth_date_0", "1980-05-01"),
            ("first_name_1", " Lou "),
            ("last_name_1", "Martin"),
            ("country_1", "FR"),
            ("birth_date_1", "2020-02-29"),
            ("reduced_1", "on"),
        ]);

        let tickets = parse_ticket_forms(&form, 10).unwrap();

        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].first_name, "Lou");
        assert!(!tickets[0].reduced);
        assert!(tickets[1].reduced);
        assert_eq!(
            tickets[1].birth_date,
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
    }

    #[test]
    fn empty_form_has_no_holders() {
        assert!(parse_ticket_forms(&HashMap::new(), 10).unwrap().is_empty());
    }

    #[test]
    fn unrelated_fields_are_ignored() {
        let form = form(&[("csrf_token", "abc"), ("page_2", "x")]);
        assert!(parse_ticket_forms(&form, 10).unwrap().is_empty());
    }

    #[test]
    fn bad_birth_date_is_a_validation_error() {
        let form = form(&[("first_name_0", "Jean"), ("birth_date_0", "01/05/1980")]);
        let err = parse_ticket_forms(&form, 10).unwrap_err();
        assert!(err.to_string().contains("Ticket 1"));
    }

    #[test]
    fn huge_index_is_rejected() {
        let form = form(&[("first_name_99999", "Jean")]);
        assert!(parse_ticket_forms(&form, 10).is_err());

        let key = format!("first_name_{}", usize::MAX);
        let form = form_with(&key);
        assert!(matches!(
            parse_ticket_forms(&form, 10),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn index_at_the_limit_is_rejected() {
        assert!(parse_ticket_forms(&form(&[("birth_date_0", "1980-05-01")]), 1).is_ok());
        assert!(parse_ticket_forms(&form(&[("birth_date_1", "1980-05-01")]), 1).is_err());
    }
}
