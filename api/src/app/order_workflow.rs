//! Order workflow service
//!
//! Drives an order through the ordering flow, one HTTP request per step:
//! - details: buyer email, visit date, ticket quantity
//! - selection: ticket holders, availability warning, pricing
//! - checkout: order number + payment
//! - success: persistence + confirmation email
//!
//! The in-progress order lives in the visitor's session; nothing is written
//! to the database before the payment succeeded.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;

use crate::app::validation::{
    validate_email, validate_new_ticket, validate_quantity, validate_visit_date,
};
use crate::domain::entities::{
    Flash, NewTicket, Order, OrderStage, SessionData, SessionId, Ticket,
};
use crate::domain::ports::{ChargeRequest, Mailer, OrderRepository, PaymentGateway, SessionStore};
use crate::error::{AppError, DomainError};

/// Attempts at drawing an unused order number before giving up
const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Tunables of the ordering flow
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub daily_capacity: u32,
    pub availability_warning_threshold: u32,
    pub max_tickets_per_order: u32,
    pub order_number_prefix: String,
    pub currency: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            daily_capacity: 1000,
            availability_warning_threshold: 25,
            max_tickets_per_order: 10,
            order_number_prefix: "LVR".to_string(),
            currency: "eur".to_string(),
        }
    }
}

/// Buyer input of the details step
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub email: String,
    pub visit_date: NaiveDate,
    pub quantity: u32,
}

/// Result of a checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid,
    Failed,
}

/// Service orchestrating the ordering flow
pub struct OrderWorkflow<OR, SS, PG, ML>
where
    OR: OrderRepository + ?Sized,
    SS: SessionStore + ?Sized,
    PG: PaymentGateway + ?Sized,
    ML: Mailer + ?Sized,
{
    orders: Arc<OR>,
    sessions: Arc<SS>,
    payments: Arc<PG>,
    mailer: Arc<ML>,
    settings: WorkflowSettings,
}

impl<OR, SS, PG, ML> OrderWorkflow<OR, SS, PG, ML>
where
    OR: OrderRepository + ?Sized,
    SS: SessionStore + ?Sized,
    PG: PaymentGateway + ?Sized,
    ML: Mailer + ?Sized,
{
    pub fn new(
        orders: Arc<OR>,
        sessions: Arc<SS>,
        payments: Arc<PG>,
        mailer: Arc<ML>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            orders,
            sessions,
            payments,
            mailer,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    // =========================================================================
    // Session-level steps
    // =========================================================================

    /// Return the session's in-progress order, creating and storing a fresh
    /// one when there is none.
    pub async fn init_order(&self, session: &SessionId) -> Result<Order, AppError> {
        let mut data = self.sessions.load(session).await?;

        let order = match data.order.take() {
            Some(order) => order,
            None => {
                let order = Order::new();
                tracing::debug!(order_key = %order.key(), "Starting new order");
                order
            }
        };

        data.order = Some(order.clone());
        self.sessions.save(session, data).await?;

        Ok(order)
    }

    /// Bind the details step to the session's order.
    pub async fn submit_details(
        &self,
        session: &SessionId,
        details: OrderDetails,
    ) -> Result<Order, AppError> {
        let email = details.email.trim().to_string();
        validate_email(&email)?;
        validate_visit_date(details.visit_date, Utc::now().date_naive())?;
        validate_quantity(details.quantity, self.settings.max_tickets_per_order)?;

        let mut data = self.sessions.load(session).await?;
        let mut order = data.order.take().unwrap_or_default();

        if order.stage() == OrderStage::Paid {
            return Err(AppError::Domain(DomainError::Conflict(
                "This order has already been paid".to_string(),
            )));
        }

        if order.visit_date() != Some(details.visit_date) {
            order.clear_order_number();
        }

        order
            .set_email(email)
            .set_visit_date(details.visit_date)
            .set_quantity(details.quantity)
            .clear_total_price()
            .set_stage(OrderStage::DetailsEntered);

        tracing::info!(
            order_key = %order.key(),
            visit_date = %details.visit_date,
            quantity = details.quantity,
            "Order details entered"
        );

        data.order = Some(order.clone());
        self.sessions.save(session, data).await?;

        Ok(order)
    }

    /// Fetch the order whose details have been submitted in this session.
    pub async fn current_order(&self, session: &SessionId) -> Result<Order, AppError> {
        let data = self.sessions.load(session).await?;
        match data.order {
            Some(order) if order.stage() > OrderStage::Started => Ok(order),
            _ => Err(AppError::OrderNotFound),
        }
    }

    /// Bind the selection step: replace the tickets and price the order.
    pub async fn select_tickets(
        &self,
        session: &SessionId,
        tickets: Vec<NewTicket>,
    ) -> Result<Order, AppError> {
        let mut data = self.sessions.load(session).await?;
        let mut order = match data.order.take() {
            Some(order) if order.stage() > OrderStage::Started => order,
            _ => return Err(AppError::OrderNotFound),
        };

        if order.stage() == OrderStage::Paid {
            return Err(AppError::Domain(DomainError::Conflict(
                "This order has already been paid".to_string(),
            )));
        }

        self.create_tickets(&mut order, tickets)?;
        self.compute_price(&mut order)?;

        data.order = Some(order.clone());
        self.sessions.save(session, data).await?;

        Ok(order)
    }

    /// Generate the order number and charge the buyer.
    ///
    /// On failure the order stays in the session, keeps its order number and
    /// an error flash is queued for the confirmation page.
    pub async fn checkout(
        &self,
        session: &SessionId,
        payment_token: &str,
    ) -> Result<CheckoutOutcome, AppError> {
        let mut data = self.sessions.load(session).await?;
        let mut order = match data.order.take() {
            Some(order) if order.stage() > OrderStage::Started => order,
            _ => return Err(AppError::OrderNotFound),
        };

        match order.stage() {
            OrderStage::Paid => {
                data.order = Some(order);
                self.sessions.save(session, data).await?;
                return Ok(CheckoutOutcome::Paid);
            }
            OrderStage::Priced | OrderStage::CheckoutFailed => {}
            _ => {
                return Err(AppError::Domain(DomainError::Validation(
                    "Select your tickets before checking out".to_string(),
                )))
            }
        }

        self.generate_order_number(&mut order).await?;
        order.record_payment_attempt();

        let outcome = if self.pay(&order, payment_token).await? {
            order.set_stage(OrderStage::Paid);
            CheckoutOutcome::Paid
        } else {
            order.set_stage(OrderStage::CheckoutFailed);
            data.flashes.push(Flash::PaymentFailed);
            CheckoutOutcome::Failed
        };

        data.order = Some(order);
        self.sessions.save(session, data).await?;

        Ok(outcome)
    }

    /// Success step: persist the paid order, mail the buyer and close the
    /// session's order so the step cannot run twice.
    pub async fn complete(&self, session: &SessionId) -> Result<Order, AppError> {
        let mut data = self.sessions.load(session).await?;
        let mut order = match data.order.take() {
            Some(order) if order.stage() > OrderStage::Started => order,
            _ => return Err(AppError::OrderNotFound),
        };

        if order.stage() != OrderStage::Paid {
            return Err(AppError::Domain(DomainError::Conflict(
                "This order has not been paid".to_string(),
            )));
        }

        let id = self.orders.persist(&order).await?;
        order.set_id(id);

        tracing::info!(
            order_id = %id,
            order_number = order.order_number().unwrap_or_default(),
            tickets = order.tickets().len(),
            "Order persisted"
        );
        tracing::debug!(?order, "Completed order");

        if let Err(e) = self.mailer.send_order_confirmation(&order).await {
            tracing::warn!(
                error = %e,
                order_id = %id,
                "Failed to send order confirmation"
            );
        }

        data.order = None;
        self.sessions.save(session, data).await?;

        Ok(order)
    }

    /// Discard the in-progress order.
    pub async fn clear_session(&self, session: &SessionId) -> Result<(), AppError> {
        self.sessions.remove(session).await?;
        Ok(())
    }

    /// Queue a one-shot message for the next page.
    pub async fn push_flash(&self, session: &SessionId, flash: Flash) -> Result<(), AppError> {
        let mut data = self.sessions.load(session).await?;
        data.flashes.push(flash);
        self.sessions.save(session, data).await?;
        Ok(())
    }

    /// Pop the messages queued for this session.
    pub async fn take_flashes(&self, session: &SessionId) -> Result<Vec<Flash>, AppError> {
        let mut data = self.sessions.load(session).await?;
        if data.flashes.is_empty() {
            return Ok(Vec::new());
        }
        let flashes = std::mem::take(&mut data.flashes);
        self.save_or_remove(session, data).await?;
        Ok(flashes)
    }

    async fn save_or_remove(&self, session: &SessionId, data: SessionData) -> Result<(), AppError> {
        if data.is_empty() {
            self.sessions.remove(session).await?;
        } else {
            self.sessions.save(session, data).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Order-level operations
    // =========================================================================

    /// Replace the order's tickets with the submitted holders.
    pub fn create_tickets(
        &self,
        order: &mut Order,
        tickets: Vec<NewTicket>,
    ) -> Result<(), DomainError> {
        let visit_date = order.visit_date().ok_or_else(|| {
            DomainError::Validation("Choose a visit date first".to_string())
        })?;

        if tickets.len() != order.quantity() as usize {
            return Err(DomainError::Validation(format!(
                "Expected {} ticket(s), got {}",
                order.quantity(),
                tickets.len()
            )));
        }

        for (position, ticket) in tickets.iter().enumerate() {
            validate_new_ticket(position, ticket, visit_date)?;
        }

        order.clear_tickets();
        for new_ticket in tickets {
            order.add_ticket(Ticket::new(new_ticket));
        }

        Ok(())
    }

    /// Tickets still on sale for a visit date
    pub async fn remaining_capacity(&self, date: NaiveDate) -> Result<u32, AppError> {
        let sold = self.orders.count_tickets_for_date(date).await?;
        let sold = u32::try_from(sold).unwrap_or(u32::MAX);
        Ok(self.settings.daily_capacity.saturating_sub(sold))
    }

    /// Whether fewer tickets than the warning threshold remain for the
    /// order's visit date. Never blocks the order.
    pub async fn check_availability_warning(&self, order: &Order) -> Result<bool, AppError> {
        Ok(self.availability_warning(order).await?.is_some())
    }

    /// Same as `check_availability_warning`, handing back the remaining count.
    pub async fn availability_warning(&self, order: &Order) -> Result<Option<u32>, AppError> {
        let Some(visit_date) = order.visit_date() else {
            return Ok(None);
        };

        let remaining = self.remaining_capacity(visit_date).await?;
        if remaining < self.settings.availability_warning_threshold {
            tracing::info!(%visit_date, remaining, "Low availability for visit date");
            Ok(Some(remaining))
        } else {
            Ok(None)
        }
    }

    /// Set the order's total from its current tickets.
    pub fn compute_price(&self, order: &mut Order) -> Result<i32, DomainError> {
        let total = order.price_of_tickets().ok_or_else(|| {
            DomainError::Validation("Choose a visit date first".to_string())
        })?;

        order.set_total_price(total).set_stage(OrderStage::Priced);

        tracing::debug!(order_key = %order.key(), total, "Order priced");
        Ok(total)
    }

    /// Assign an order number, keeping the one from an earlier attempt.
    pub async fn generate_order_number(&self, order: &mut Order) -> Result<String, AppError> {
        if let Some(existing) = order.order_number() {
            return Ok(existing.to_string());
        }

        let visit_date = order.visit_date().ok_or_else(|| {
            DomainError::Validation("Choose a visit date first".to_string())
        })?;

        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let candidate = format_order_number(
                &self.settings.order_number_prefix,
                visit_date,
                rand::thread_rng().gen(),
            );

            if !self.orders.order_number_exists(&candidate).await? {
                order.set_order_number(candidate.clone());
                tracing::debug!(order_key = %order.key(), order_number = %candidate, "Order number assigned");
                return Ok(candidate);
            }
        }

        Err(AppError::Internal(
            "Could not generate a unique order number".to_string(),
        ))
    }

    /// Charge the order. Gateway errors count as a failed payment.
    pub async fn pay(&self, order: &Order, payment_token: &str) -> Result<bool, AppError> {
        let (Some(order_number), Some(idempotency_key), Some(amount), Some(email)) = (
            order.order_number(),
            order.payment_idempotency_key(),
            order.total_price(),
            order.email(),
        ) else {
            return Err(AppError::Domain(DomainError::Validation(
                "Order must be priced and numbered before payment".to_string(),
            )));
        };

        let request = ChargeRequest {
            order_number: order_number.to_string(),
            idempotency_key,
            amount,
            currency: self.settings.currency.clone(),
            email: email.to_string(),
            token: payment_token.to_string(),
        };

        match self.payments.charge(&request).await {
            Ok(outcome) if outcome.is_approved() => {
                tracing::info!(order_number, amount, "Payment approved");
                Ok(true)
            }
            Ok(outcome) => {
                tracing::warn!(order_number, ?outcome, "Payment declined");
                Ok(false)
            }
            Err(e) => {
                tracing::error!(error = %e, order_number, "Payment gateway error");
                Ok(false)
            }
        }
    }
}

/// `<PREFIX>-<YYYYMMDD>-<8 hex digits>`
pub fn format_order_number(prefix: &str, visit_date: NaiveDate, random: [u8; 4]) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        visit_date.format("%Y%m%d"),
        hex::encode_upper(random)
    )
}
