//! Order service.

use common::{OrderId, UserId};

use crate::error::{DomainError, Entity};
use crate::ports::OrderRepository;

use super::{Order, OrderState};

/// Service for managing orders.
pub struct OrderService<R: OrderRepository> {
    repository: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a new order service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates or replaces an order together with its line items.
    #[tracing::instrument(skip(self, order), fields(order_id = ?order.id, state = %order.state))]
    pub async fn save(&self, order: Order) -> Result<Order, DomainError> {
        if order.checked_total().is_none() {
            return Err(DomainError::InvalidAmount(format!(
                "order total exceeds {} cents",
                i64::MAX
            )));
        }

        let saved = self.repository.save(order).await?;
        metrics::counter!("storefront_saves_total", "entity" => Entity::Order.as_str())
            .increment(1);
        tracing::info!(
            order_id = ?saved.id,
            lines = saved.line_items.len(),
            total = %saved.total(),
            "order saved"
        );
        Ok(saved)
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: OrderId) -> Result<Order, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Order, id))
    }

    /// Lists every order.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        self.repository.find_all().await
    }

    /// Lists the orders placed by one user.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        self.repository.find_by_user_id(user_id).await
    }

    /// Overwrites the state of an order from its raw name.
    #[tracing::instrument(skip(self))]
    pub async fn update_state_by_id(&self, id: OrderId, state: &str) -> Result<(), DomainError> {
        let state: OrderState = state.parse()?;

        if !self.repository.update_state_by_id(id, state).await? {
            return Err(DomainError::not_found(Entity::Order, id));
        }

        metrics::counter!("storefront_order_state_updates_total", "state" => state.as_str())
            .increment(1);
        tracing::info!(%id, %state, "order state updated");
        Ok(())
    }
}
