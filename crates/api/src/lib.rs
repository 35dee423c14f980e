//! HTTP API server for the storefront backend.
//!
//! Exposes users, the product catalog and orders over REST, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::Store;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;
use routes::{categories, orders, products, users};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/v1/admin/categories",
            post(categories::save::<S>).get(categories::list::<S>),
        )
        .route(
            "/api/v1/admin/categories/{id}",
            get(categories::get::<S>).delete(categories::delete::<S>),
        )
        .route(
            "/api/v1/admin/products",
            post(products::save::<S>).get(products::list::<S>),
        )
        .route(
            "/api/v1/admin/products/{id}",
            get(products::get::<S>).delete(products::delete::<S>),
        )
        .route(
            "/api/v1/orders",
            post(orders::create::<S>).get(orders::list::<S>),
        )
        .route(
            "/api/v1/orders/update/state/order",
            post(orders::update_state::<S>),
        )
        .route("/api/v1/orders/by-user/{id}", get(orders::by_user::<S>))
        .route("/api/v1/orders/{id}", get(orders::get::<S>))
        .route("/api/v1/users", post(users::save::<S>))
        .route("/api/v1/users/{id}", get(users::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wraps a store in the shared state the handlers expect.
pub fn create_state<S: Store>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
