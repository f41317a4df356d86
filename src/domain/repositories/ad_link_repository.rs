//! Repository trait for ad links.

use crate::domain::entities::{AdLink, AdLinkFilter, LinkStatus, NewAdLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Per-owner counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub total: i64,
    pub running: i64,
    pub stopped: i64,
    pub total_runs: i64,
}

/// Repository interface for ad links.
///
/// Every user-facing read and write is scoped by owner. The only unscoped
/// read is [`AdLinkRepository::list_running`], used by the rotation job.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAdLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdLinkRepository: Send + Sync {
    /// Inserts a new link in the `stopped` state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewAdLink) -> Result<AdLink, AppError>;

    /// Finds a link by id, returning it only if `user_id` owns it.
    async fn find_for_owner(&self, id: i64, user_id: i64) -> Result<Option<AdLink>, AppError>;

    /// Lists the owner's links, newest first.
    async fn list_by_owner(
        &self,
        user_id: i64,
        filter: AdLinkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdLink>, AppError>;

    /// Counts the owner's links matching `filter`.
    async fn count_by_owner(&self, user_id: i64, filter: AdLinkFilter) -> Result<i64, AppError>;

    /// All links currently in the `running` state, across every owner, by id.
    async fn list_running(&self) -> Result<Vec<AdLink>, AppError>;

    /// Sets the status of an owned link.
    ///
    /// Returns `None` when the link does not exist or belongs to someone else.
    async fn update_status(
        &self,
        id: i64,
        user_id: i64,
        status: LinkStatus,
    ) -> Result<Option<AdLink>, AppError>;

    /// Dashboard counters for one owner.
    async fn stats_for_owner(&self, user_id: i64) -> Result<LinkStats, AppError>;
}
