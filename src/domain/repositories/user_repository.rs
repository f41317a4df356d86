//! Repository trait for users and their roles and menus.

use crate::domain::entities::{Menu, NewUser, Role, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Credential store and role/menu lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by username regardless of status.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Roles granted to the user, by name.
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<Role>, AppError>;

    /// Distinct menus reachable through any of the user's roles, by sort order.
    async fn menus_for_user(&self, user_id: i64) -> Result<Vec<Menu>, AppError>;

    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Grants a role by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no role has that name.
    async fn assign_role(&self, user_id: i64, role_name: &str) -> Result<(), AppError>;

    /// Stamps `last_login_at = NOW()`.
    async fn touch_last_login(&self, user_id: i64) -> Result<(), AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;
}
