//! Password storage.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::error::DomainError;

/// A user's password, either as received from a client or as an argon2 PHC
/// hash once it has gone through [`Password::hashed`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Password(String);

impl Password {
    /// Wraps a raw value, plaintext or already hashed.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the stored value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the value is an argon2 PHC string.
    pub fn is_hashed(&self) -> bool {
        PasswordHash::new(&self.0)
            .map(|hash| hash.algorithm.as_str().starts_with("argon2"))
            .unwrap_or(false)
    }

    /// Hashes a plaintext password with a fresh salt. Already hashed values
    /// are returned unchanged.
    pub fn hashed(self) -> Result<Self, DomainError> {
        if self.is_hashed() {
            return Ok(self);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map_err(|e| DomainError::PasswordHash(e.to_string()))?;

        Ok(Self(hash.to_string()))
    }

    /// Checks a plaintext candidate against this hash.
    ///
    /// Always false when the stored value is not a hash.
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(hash) => Argon2::default()
                .verify_password(candidate.as_bytes(), &hash)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
