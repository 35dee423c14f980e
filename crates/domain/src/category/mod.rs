//! Product categories.

mod service;

pub use service::CategoryService;

use chrono::{DateTime, Utc};
use common::CategoryId;

/// A category products are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates an unsaved category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
