//! HTTP handlers grouped by resource.

pub mod categories;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod users;

use domain::{CategoryService, OrderService, ProductService, Store, UserService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub users: UserService<S>,
    pub products: ProductService<S>,
    pub categories: CategoryService<S>,
    pub orders: OrderService<S>,
}

impl<S: Store> AppState<S> {
    /// Builds one service per resource, all sharing the same store.
    pub fn new(store: S) -> Self {
        Self {
            users: UserService::new(store.clone()),
            products: ProductService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            orders: OrderService::new(store),
        }
    }
}

/// Parses a numeric id taken from the request path.
fn parse_id<T: From<i32>>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<i32>()
        .map(T::from)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
