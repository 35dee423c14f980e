//! Identifier types shared by every layer of the storefront backend.

mod types;

pub use types::{CategoryId, LineItemId, OrderId, ProductId, UserId};
