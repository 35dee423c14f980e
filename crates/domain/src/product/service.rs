//! Product service.

use common::ProductId;

use crate::error::{DomainError, Entity};
use crate::ports::ProductRepository;

use super::Product;

/// Service for managing catalog products.
pub struct ProductService<R: ProductRepository> {
    repository: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a new product service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates or replaces a product.
    #[tracing::instrument(skip(self, product), fields(product_id = ?product.id))]
    pub async fn save(&self, product: Product) -> Result<Product, DomainError> {
        tracing::info!(name = %product.name, "saving product");

        let saved = self.repository.save(product).await?;
        metrics::counter!("storefront_saves_total", "entity" => Entity::Product.as_str())
            .increment(1);
        Ok(saved)
    }

    /// Lists every product.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.find_all().await
    }

    /// Loads a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: ProductId) -> Result<Product, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Product, id))
    }

    /// Deletes a product, failing if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: ProductId) -> Result<(), DomainError> {
        self.find_by_id(id).await?;

        if !self.repository.delete_by_id(id).await? {
            // Removed concurrently between the lookup and the delete.
            return Err(DomainError::not_found(Entity::Product, id));
        }

        metrics::counter!("storefront_deletes_total", "entity" => Entity::Product.as_str())
            .increment(1);
        tracing::info!(%id, "product deleted");
        Ok(())
    }
}
