//! Repository trait for rotation run logs.

use crate::domain::entities::{NewRunLog, RunLog};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of rotation attempts. Logs are never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunLogRepository: Send + Sync {
    /// Appends one log record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a missing
    /// ad link (foreign key violation).
    async fn create(&self, new_log: NewRunLog) -> Result<RunLog, AppError>;

    /// Logs of one link, newest first.
    async fn list_for_link(
        &self,
        ad_link_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RunLog>, AppError>;

    async fn count_for_link(&self, ad_link_id: i64) -> Result<i64, AppError>;
}
