//! PostgreSQL implementation of the ad link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AdLink, AdLinkFilter, LinkStatus, NewAdLink};
use crate::domain::repositories::{AdLinkRepository, LinkStats};
use crate::error::AppError;
use serde_json::json;

const AD_LINK_COLUMNS: &str = "id, user_id, affiliate_name, affiliate_url, mcc_account_id, \
     ads_account_id, campaign_name, landing_domain, run_frequency_minutes, referers, status, \
     created_at, updated_at";

/// Owner and filter predicate shared by list and count. `$1` is the owner,
/// `$2`..`$4` are status, affiliate substring and campaign substring.
const OWNER_FILTER: &str = r#"
    user_id = $1
    AND ($2::TEXT IS NULL OR status = $2)
    AND ($3::TEXT IS NULL OR affiliate_name ILIKE '%' || $3 || '%')
    AND ($4::TEXT IS NULL OR campaign_name ILIKE '%' || $4 || '%')
"#;

#[derive(sqlx::FromRow)]
struct AdLinkRow {
    id: i64,
    user_id: i64,
    affiliate_name: String,
    affiliate_url: String,
    mcc_account_id: Option<String>,
    ads_account_id: String,
    campaign_name: String,
    landing_domain: String,
    run_frequency_minutes: i32,
    referers: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdLinkRow> for AdLink {
    type Error = AppError;

    fn try_from(r: AdLinkRow) -> Result<Self, Self::Error> {
        let status: LinkStatus = r
            .status
            .parse()
            .map_err(|e: String| AppError::internal(e, json!({"ad_link_id": r.id})))?;

        Ok(AdLink {
            id: r.id,
            user_id: r.user_id,
            affiliate_name: r.affiliate_name,
            affiliate_url: r.affiliate_url,
            mcc_account_id: r.mcc_account_id,
            ads_account_id: r.ads_account_id,
            campaign_name: r.campaign_name,
            landing_domain: r.landing_domain,
            run_frequency_minutes: r.run_frequency_minutes,
            referers: r.referers,
            status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// PostgreSQL repository for ad links.
pub struct PgAdLinkRepository {
    pool: Arc<PgPool>,
}

impl PgAdLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdLinkRepository for PgAdLinkRepository {
    async fn create(&self, new_link: NewAdLink) -> Result<AdLink, AppError> {
        let row: AdLinkRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO ad_links (
                user_id, affiliate_name, affiliate_url, mcc_account_id, ads_account_id,
                campaign_name, landing_domain, run_frequency_minutes, referers, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {AD_LINK_COLUMNS}
            "#
        ))
        .bind(new_link.user_id)
        .bind(&new_link.affiliate_name)
        .bind(&new_link.affiliate_url)
        .bind(&new_link.mcc_account_id)
        .bind(&new_link.ads_account_id)
        .bind(&new_link.campaign_name)
        .bind(&new_link.landing_domain)
        .bind(new_link.run_frequency_minutes)
        .bind(&new_link.referers)
        .bind(new_link.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_for_owner(&self, id: i64, user_id: i64) -> Result<Option<AdLink>, AppError> {
        let row: Option<AdLinkRow> = sqlx::query_as(&format!(
            "SELECT {AD_LINK_COLUMNS} FROM ad_links WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(AdLink::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        user_id: i64,
        filter: AdLinkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdLink>, AppError> {
        let rows: Vec<AdLinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {AD_LINK_COLUMNS}
            FROM ad_links
            WHERE {OWNER_FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.affiliate_name)
        .bind(filter.campaign_name)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(AdLink::try_from).collect()
    }

    async fn count_by_owner(&self, user_id: i64, filter: AdLinkFilter) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM ad_links WHERE {OWNER_FILTER}"))
                .bind(user_id)
                .bind(filter.status.map(|s| s.as_str()))
                .bind(filter.affiliate_name)
                .bind(filter.campaign_name)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn list_running(&self) -> Result<Vec<AdLink>, AppError> {
        let rows: Vec<AdLinkRow> = sqlx::query_as(&format!(
            "SELECT {AD_LINK_COLUMNS} FROM ad_links WHERE status = 'running' ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(AdLink::try_from).collect()
    }

    async fn update_status(
        &self,
        id: i64,
        user_id: i64,
        status: LinkStatus,
    ) -> Result<Option<AdLink>, AppError> {
        let row: Option<AdLinkRow> = sqlx::query_as(&format!(
            r#"
            UPDATE ad_links
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {AD_LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(status.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(AdLink::try_from).transpose()
    }

    async fn stats_for_owner(&self, user_id: i64) -> Result<LinkStats, AppError> {
        let (total, running, total_runs): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'running'),
                COALESCE((
                    SELECT COUNT(*) FROM run_logs r
                    JOIN ad_links l ON l.id = r.ad_link_id
                    WHERE l.user_id = $1
                ), 0)
            FROM ad_links
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkStats {
            total,
            running,
            stopped: total - running,
            total_runs,
        })
    }
}
