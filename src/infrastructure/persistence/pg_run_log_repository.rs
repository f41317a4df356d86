//! PostgreSQL implementation of the run log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewRunLog, RunLog, RunStatus};
use crate::domain::repositories::RunLogRepository;
use crate::error::AppError;
use serde_json::json;

const RUN_LOG_COLUMNS: &str =
    "id, ad_link_id, status, message, old_tracking_template, new_tracking_template, created_at";

#[derive(sqlx::FromRow)]
struct RunLogRow {
    id: i64,
    ad_link_id: i64,
    status: String,
    message: String,
    old_tracking_template: Option<String>,
    new_tracking_template: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RunLogRow> for RunLog {
    type Error = AppError;

    fn try_from(r: RunLogRow) -> Result<Self, Self::Error> {
        let status: RunStatus = r
            .status
            .parse()
            .map_err(|e: String| AppError::internal(e, json!({"run_log_id": r.id})))?;

        Ok(RunLog {
            id: r.id,
            ad_link_id: r.ad_link_id,
            status,
            message: r.message,
            old_tracking_template: r.old_tracking_template,
            new_tracking_template: r.new_tracking_template,
            created_at: r.created_at,
        })
    }
}

/// PostgreSQL repository for rotation run logs. Insert-only.
pub struct PgRunLogRepository {
    pool: Arc<PgPool>,
}

impl PgRunLogRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RunLogRepository for PgRunLogRepository {
    async fn create(&self, new_log: NewRunLog) -> Result<RunLog, AppError> {
        let row: RunLogRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO run_logs (ad_link_id, status, message, old_tracking_template, new_tracking_template)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RUN_LOG_COLUMNS}
            "#
        ))
        .bind(new_log.ad_link_id)
        .bind(new_log.status.as_str())
        .bind(&new_log.message)
        .bind(&new_log.old_tracking_template)
        .bind(&new_log.new_tracking_template)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn list_for_link(
        &self,
        ad_link_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RunLog>, AppError> {
        let rows: Vec<RunLogRow> = sqlx::query_as(&format!(
            r#"
            SELECT {RUN_LOG_COLUMNS}
            FROM run_logs
            WHERE ad_link_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(ad_link_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(RunLog::try_from).collect()
    }

    async fn count_for_link(&self, ad_link_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM run_logs WHERE ad_link_id = $1")
            .bind(ad_link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
