//! PostgreSQL implementation of the domain pool repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Domain, DomainStatus, NewDomain, UpdateDomain};
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;
use serde_json::json;

const DOMAIN_COLUMNS: &str =
    "id, hostname, referer_override, status, usage_count, last_used_at, created_at";

#[derive(sqlx::FromRow)]
struct DomainRow {
    id: i64,
    hostname: String,
    referer_override: Option<String>,
    status: String,
    usage_count: i64,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DomainRow> for Domain {
    type Error = AppError;

    fn try_from(r: DomainRow) -> Result<Self, Self::Error> {
        let status: DomainStatus = r
            .status
            .parse()
            .map_err(|e: String| AppError::internal(e, json!({"domain_id": r.id})))?;

        Ok(Domain::new(
            r.id,
            r.hostname,
            r.referer_override,
            status,
            r.usage_count,
            r.last_used_at,
            r.created_at,
        ))
    }
}

/// PostgreSQL repository for the landing domain pool.
///
/// Usage accounting is a single `UPDATE ... SET usage_count = usage_count + 1`
/// so concurrent writers never lose an increment.
pub struct PgDomainRepository {
    pool: Arc<PgPool>,
}

impl PgDomainRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for PgDomainRepository {
    async fn create(&self, new_domain: NewDomain) -> Result<Domain, AppError> {
        let row: DomainRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO domains (hostname, referer_override)
            VALUES ($1, $2)
            RETURNING {DOMAIN_COLUMNS}
            "#
        ))
        .bind(&new_domain.hostname)
        .bind(&new_domain.referer_override)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Domain>, AppError> {
        let row: Option<DomainRow> =
            sqlx::query_as(&format!("SELECT {DOMAIN_COLUMNS} FROM domains WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(Domain::try_from).transpose()
    }

    async fn find_by_hostname(&self, hostname: &str) -> Result<Option<Domain>, AppError> {
        let row: Option<DomainRow> = sqlx::query_as(&format!(
            "SELECT {DOMAIN_COLUMNS} FROM domains WHERE hostname = $1"
        ))
        .bind(hostname)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Domain::try_from).transpose()
    }

    async fn list(&self, only_active: bool) -> Result<Vec<Domain>, AppError> {
        let rows: Vec<DomainRow> = sqlx::query_as(&format!(
            r#"
            SELECT {DOMAIN_COLUMNS}
            FROM domains
            WHERE (NOT $1 OR status = 'active')
            ORDER BY usage_count ASC, last_used_at ASC NULLS FIRST, id ASC
            "#
        ))
        .bind(only_active)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Domain::try_from).collect()
    }

    async fn update(&self, id: i64, update: UpdateDomain) -> Result<Domain, AppError> {
        let update_referer = update.referer_override.is_some();
        let new_referer = update.referer_override.flatten();

        let row: Option<DomainRow> = sqlx::query_as(&format!(
            r#"
            UPDATE domains SET
                status           = COALESCE($2::TEXT, status),
                referer_override = CASE WHEN $3 THEN $4::TEXT ELSE referer_override END
            WHERE id = $1
            RETURNING {DOMAIN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update_referer)
        .bind(new_referer)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("Domain not found", json!({"id": id})))?
            .try_into()
    }

    async fn increment_usage(&self, id: i64) -> Result<Domain, AppError> {
        let row: Option<DomainRow> = sqlx::query_as(&format!(
            r#"
            UPDATE domains
            SET usage_count = usage_count + 1,
                last_used_at = NOW()
            WHERE id = $1
            RETURNING {DOMAIN_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("Domain not found", json!({"id": id})))?
            .try_into()
    }
}
