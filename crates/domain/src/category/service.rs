//! Category service.

use common::CategoryId;

use crate::error::{DomainError, Entity};
use crate::ports::CategoryRepository;

use super::Category;

/// Service for managing product categories.
pub struct CategoryService<R: CategoryRepository> {
    repository: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a new category service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates or replaces a category.
    #[tracing::instrument(skip(self))]
    pub async fn save(&self, category: Category) -> Result<Category, DomainError> {
        let saved = self.repository.save(category).await?;
        metrics::counter!("storefront_saves_total", "entity" => Entity::Category.as_str())
            .increment(1);
        Ok(saved)
    }

    /// Lists every category.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        self.repository.find_all().await
    }

    /// Loads a category by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: CategoryId) -> Result<Category, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Category, id))
    }

    /// Deletes a category, failing if it does not exist.
    ///
    /// A category still referenced by products cannot be deleted and yields
    /// [`DomainError::Conflict`].
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: CategoryId) -> Result<(), DomainError> {
        self.find_by_id(id).await?;

        if !self.repository.delete_by_id(id).await? {
            return Err(DomainError::not_found(Entity::Category, id));
        }

        metrics::counter!("storefront_deletes_total", "entity" => Entity::Category.as_str())
            .increment(1);
        tracing::info!(%id, "category deleted");
        Ok(())
    }
}
