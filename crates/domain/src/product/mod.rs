//! Catalog products.

mod service;

pub use service::ProductService;

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId, UserId};

use crate::money::Money;

/// A product offered in the catalog.
///
/// `id` and the timestamps are `None` until the product is first saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub url_image: String,
    pub price: Money,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    /// The user who published the product.
    pub user_id: Option<UserId>,
    pub category_id: Option<CategoryId>,
}
