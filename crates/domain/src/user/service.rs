//! User service.

use common::UserId;

use crate::error::{DomainError, Entity};
use crate::ports::UserRepository;

use super::User;

/// Service for managing users.
pub struct UserService<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a new user service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates or replaces a user, hashing a plaintext password first.
    ///
    /// An update that carries no password keeps the stored hash.
    #[tracing::instrument(skip(self, user), fields(user_id = ?user.id, email = %user.email))]
    pub async fn save(&self, mut user: User) -> Result<User, DomainError> {
        match user.id {
            Some(id) if user.password.as_str().is_empty() => {
                let existing = self
                    .repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(Entity::User, id))?;
                user.password = existing.password;
            }
            _ => user.password = std::mem::take(&mut user.password).hashed()?,
        }

        let saved = self.repository.save(user).await?;
        metrics::counter!("storefront_saves_total", "entity" => Entity::User.as_str())
            .increment(1);
        tracing::debug!(user_id = ?saved.id, "user saved");
        Ok(saved)
    }

    /// Loads a user by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::User, id))
    }

    /// Looks a user up by email address.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.find_by_email(email).await
    }
}
