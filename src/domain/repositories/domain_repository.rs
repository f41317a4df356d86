//! Repository trait for the landing domain pool.

use crate::domain::entities::{Domain, NewDomain, UpdateDomain};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing landing domains.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDomainRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_domain.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Registers a new domain (active, never used).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hostname is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_domain: NewDomain) -> Result<Domain, AppError>;

    /// Finds a domain by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Domain>, AppError>;

    /// Finds a domain by hostname (e.g., "lp1.example.com").
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Domain>, AppError>;

    /// Lists domains in selection order: `usage_count` ascending, then
    /// `last_used_at` ascending with never-used first, then `id` ascending.
    ///
    /// # Arguments
    ///
    /// - `only_active` - If true, returns only active domains
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, only_active: bool) -> Result<Vec<Domain>, AppError>;

    /// Updates status and/or referer override.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the domain does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, update: UpdateDomain) -> Result<Domain, AppError>;

    /// Atomically bumps `usage_count` by one and stamps `last_used_at = NOW()`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the domain does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_usage(&self, id: i64) -> Result<Domain, AppError>;
}
