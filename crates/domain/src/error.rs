//! Domain error types.

use thiserror::Error;

/// The kind of record a lookup was performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Product,
    Category,
    Order,
}

impl Entity {
    /// Returns the lowercase entity name, used as a metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Product => "product",
            Entity::Category => "category",
            Entity::Order => "order",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn not_found_message(entity: &Entity, id: &i32) -> String {
    match entity {
        Entity::User => format!("El usuario con id: {id} no existe."),
        Entity::Product => format!("Producto con Id: {id} no existe."),
        Entity::Category => format!("Categoría con id: {id} no existe."),
        Entity::Order => format!("Orden con Id: {id} no existe."),
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested record does not exist.
    #[error("{}", not_found_message(.entity, .id))]
    NotFound { entity: Entity, id: i32 },

    /// A raw order state string did not name a known state.
    #[error("Invalid order state: {0}")]
    InvalidOrderState(String),

    /// A monetary amount falls outside the representable range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A raw role string did not name a known role.
    #[error("Invalid user role: {0}")]
    InvalidUserRole(String),

    /// The write violated a uniqueness or referential constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The password could not be hashed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// The underlying store failed.
    #[error("Repository error: {0}")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DomainError {
    /// Shorthand for a [`DomainError::NotFound`].
    pub fn not_found(entity: Entity, id: impl Into<i32>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }
}
