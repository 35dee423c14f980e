//! Repository ports implemented by the storage adapters.
//!
//! Saving an entity without an id inserts it; saving one with an id
//! replaces the stored record wholesale and fails with
//! [`DomainError::NotFound`] if no such record exists. Lookups return
//! `None` rather than failing; turning that into an error is left to the
//! services.

use async_trait::async_trait;
use common::{CategoryId, OrderId, ProductId, UserId};

use crate::category::Category;
use crate::error::DomainError;
use crate::order::{Order, OrderState};
use crate::product::Product;
use crate::user::User;

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> RepoResult<User>;

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Looks a user up by their (unique) email address.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: Product) -> RepoResult<Product>;

    /// Returns every product ordered by id.
    async fn find_all(&self) -> RepoResult<Vec<Product>>;

    async fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>>;

    /// Removes a product, returning whether a row was deleted.
    async fn delete_by_id(&self, id: ProductId) -> RepoResult<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn save(&self, category: Category) -> RepoResult<Category>;

    /// Returns every category ordered by id.
    async fn find_all(&self) -> RepoResult<Vec<Category>>;

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;

    /// Removes a category, returning whether a row was deleted.
    async fn delete_by_id(&self, id: CategoryId) -> RepoResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order together with its line items.
    ///
    /// Updating an order replaces its full set of line items.
    async fn save(&self, order: Order) -> RepoResult<Order>;

    async fn find_by_id(&self, id: OrderId) -> RepoResult<Option<Order>>;

    /// Returns every order ordered by id.
    async fn find_all(&self) -> RepoResult<Vec<Order>>;

    async fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Order>>;

    /// Overwrites only the state column, returning whether a row matched.
    async fn update_state_by_id(&self, id: OrderId, state: OrderState) -> RepoResult<bool>;
}

/// A storage backend implementing every repository port.
pub trait Store:
    UserRepository + ProductRepository + CategoryRepository + OrderRepository + Clone + 'static
{
}

impl<T> Store for T where
    T: UserRepository + ProductRepository + CategoryRepository + OrderRepository + Clone + 'static
{
}
