//! Billetterie API Server
//!
//! Online ticket office of the Musée du Louvre: visitors pick a visit date,
//! name the ticket holders, pay, and receive their tickets by email.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod locale;
mod session;

#[cfg(test)]
mod test_utils;


use adapters::{
    FakePaymentGateway, InMemorySessionStore, LogMailer, PostgresOrderRepository, SmtpMailer,
    StripePaymentGateway,
};
use app::{ContactService, DynContactService, DynOrderWorkflow, OrderWorkflow, WorkflowSettings};
use config::Config;
use domain::ports::{Mailer, OrderRepository, PaymentGateway, SessionStore};
use locale::{Locale, Page};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub order_workflow: Arc<DynOrderWorkflow>,
    pub contact_service: Arc<DynContactService>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        orders: Arc<dyn OrderRepository>,
        sessions: Arc<dyn SessionStore>,
        payments: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let settings = WorkflowSettings {
            daily_capacity: config.daily_capacity,
            availability_warning_threshold: config.availability_warning_threshold,
            max_tickets_per_order: config.max_tickets_per_order,
            order_number_prefix: config.order_number_prefix.clone(),
            currency: config.currency.clone(),
        };

        Self {
            order_workflow: Arc::new(OrderWorkflow::new(
                orders,
                sessions,
                payments,
                mailer.clone(),
                settings,
            )),
            contact_service: Arc::new(ContactService::new(mailer)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the site router: French pages at the root, English under `/en`
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Contact form rate limit, keyed on the peer address of the socket
    let governor_config = match state.config.contact_rate_per_second {
        Some(per_second) => Some(Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(per_second)
                .burst_size(state.config.contact_rate_burst)
                .finish()
                .context("Invalid contact rate limit configuration")?,
        )),
        None => None,
    };

    let mut site: Router<AppState> = Router::new();

    for locale in Locale::ALL {
        let mut contact: Router<AppState> = Router::new().route(
            locale.path(Page::Contact),
            get(handlers::contact_page).post(handlers::send_contact),
        );
        if let Some(config) = &governor_config {
            contact = contact.layer(GovernorLayer {
                config: config.clone(),
            });
        }

        let pages: Router<AppState> = Router::new()
            .route(locale.path(Page::Home), get(handlers::home))
            .route(
                locale.path(Page::Order),
                get(handlers::order_form).post(handlers::submit_order),
            )
            .route(
                locale.path(Page::Selection),
                get(handlers::selection_form).post(handlers::submit_selection),
            )
            .route(locale.path(Page::Confirmation), get(handlers::confirmation))
            .route(locale.path(Page::Checkout), post(handlers::checkout))
            .route(locale.path(Page::Success), get(handlers::success))
            .route(locale.path(Page::Error), get(handlers::error_page))
            .route(locale.path(Page::Cancel), get(handlers::cancel))
            .route(locale.path(Page::LegalNotice), get(handlers::legal_notice))
            .route(locale.path(Page::Terms), get(handlers::terms))
            .merge(contact)
            .layer(Extension(locale));

        site = site.merge(pages);
    }

    Ok(site
        .layer(middleware::from_fn(session::session_middleware))
        // Health check (no session)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,billetterie_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Billetterie API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    let order_repo = Arc::new(PostgresOrderRepository::new(db));
    order_repo
        .ensure_schema()
        .await
        .context("Failed to create database schema")?;

    let session_store = Arc::new(InMemorySessionStore::new(chrono::Duration::minutes(
        config.session_ttl_minutes,
    )));

    // Drop idle sessions in the background
    let purge_store = session_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = purge_store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
        }
    });

    let payments: Arc<dyn PaymentGateway> = match &config.stripe_secret_key {
        Some(secret_key) => Arc::new(StripePaymentGateway::new(
            config.stripe_api_url.clone(),
            secret_key.clone(),
        )),
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set, using the fake payment gateway");
            Arc::new(FakePaymentGateway::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpMailer::new(smtp, &config.mail_from, &config.contact_recipient)
                .context("Failed to configure SMTP mailer")?,
        ),
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer::new())
        }
    };

    let state = AppState::new(config.clone(), order_repo, session_store, payments, mailer);
    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
