//! HTTP API Layer
//!
//! This crate provides the REST API for the freight paperwork system using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_ledger::LedgerReconciler;
use domain_numbering::SequenceAllocator;
use infra_db::{DatabasePool, PostgresLedgerStore, PostgresSequenceStore};

use crate::config::ApiConfig;
use crate::handlers::{
    health, invoices, lorry_receipts, numbering, parties, payments, truck_hiring_notes,
};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub config: ApiConfig,
    pub allocator: Arc<SequenceAllocator<PostgresSequenceStore>>,
    pub reconciler: Arc<LedgerReconciler<PostgresLedgerStore>>,
}

/// Creates the main API router
pub fn create_router(pool: DatabasePool, config: ApiConfig) -> Router {
    let allocator = Arc::new(SequenceAllocator::new(PostgresSequenceStore::new(
        pool.clone(),
    )));
    let reconciler = Arc::new(LedgerReconciler::new(PostgresLedgerStore::new(
        pool.clone(),
    )));
    let state = AppState {
        pool,
        config,
        allocator,
        reconciler,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Lorry receipt routes
    let lorry_receipt_routes = Router::new()
        .route("/", post(lorry_receipts::create_lorry_receipt))
        .route("/", get(lorry_receipts::list_lorry_receipts))
        .route("/:id", get(lorry_receipts::get_lorry_receipt))
        .route("/:id", delete(lorry_receipts::delete_lorry_receipt))
        .route("/:id/charges", put(lorry_receipts::update_charges))
        .route("/:id/status", post(lorry_receipts::update_status));

    // Invoice routes
    let invoice_routes = Router::new()
        .route("/", post(invoices::create_invoice))
        .route("/", get(invoices::list_invoices))
        .route("/:id", get(invoices::get_invoice))
        .route("/:id", put(invoices::update_invoice))
        .route("/:id", delete(invoices::delete_invoice));

    // Truck hiring note routes
    let thn_routes = Router::new()
        .route("/", post(truck_hiring_notes::create_truck_hiring_note))
        .route("/", get(truck_hiring_notes::list_truck_hiring_notes))
        .route("/outstanding", get(truck_hiring_notes::list_outstanding))
        .route("/:id", get(truck_hiring_notes::get_truck_hiring_note))
        .route("/:id", put(truck_hiring_notes::update_truck_hiring_note))
        .route("/:id", delete(truck_hiring_notes::delete_truck_hiring_note))
        .route("/:id/pod", post(truck_hiring_notes::attach_pod))
        .route("/:id/reminder", post(truck_hiring_notes::mark_reminded));

    // Payment routes
    let payment_routes = Router::new()
        .route("/", post(payments::create_payment))
        .route("/", get(payments::list_payments))
        .route("/:id", get(payments::get_payment))
        .route("/:id", put(payments::update_payment))
        .route("/:id", delete(payments::delete_payment));

    // Sequence counter administration routes
    let numbering_routes = Router::new()
        .route("/", get(numbering::list_counters))
        .route("/:key", put(numbering::configure_counter));

    // Party routes
    let customer_routes = Router::new()
        .route("/", post(parties::create_customer))
        .route("/", get(parties::list_customers))
        .route("/:id", get(parties::get_customer))
        .route("/:id", put(parties::update_customer));

    let transporter_routes = Router::new()
        .route("/", post(parties::create_transporter))
        .route("/", get(parties::list_transporters))
        .route("/:id", get(parties::get_transporter))
        .route("/:id", put(parties::update_transporter));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/lorry-receipts", lorry_receipt_routes)
        .nest("/invoices", invoice_routes)
        .nest("/truck-hiring-notes", thn_routes)
        .nest("/payments", payment_routes)
        .nest("/numbering", numbering_routes)
        .nest("/customers", customer_routes)
        .nest("/transporters", transporter_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
