//! DTOs for ad link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::{PageMeta, PaginationParams};
use crate::domain::entities::{
    AdLink, AdLinkFilter, DEFAULT_RUN_FREQUENCY_MINUTES, LinkStatus, NewAdLink, RunLog, RunStatus,
};

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 255))]
    pub affiliate_name: String,

    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048))]
    pub affiliate_url: String,

    #[validate(length(max = 32))]
    pub mcc_account_id: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub ads_account_id: String,

    #[validate(length(min = 1, max = 255))]
    pub campaign_name: String,

    #[validate(length(min = 1, max = 253))]
    pub landing_domain: String,

    /// Minutes between rotations. Defaults to 60.
    #[validate(range(min = 1, max = 10080))]
    pub run_frequency_minutes: Option<i32>,

    /// Comma-separated referer hosts.
    #[validate(length(max = 2048))]
    pub referers: Option<String>,

    /// Initial status. Defaults to `stopped`.
    pub status: Option<LinkStatus>,
}

impl CreateLinkRequest {
    pub fn into_new_link(self, user_id: i64) -> NewAdLink {
        NewAdLink {
            user_id,
            affiliate_name: self.affiliate_name,
            affiliate_url: self.affiliate_url,
            mcc_account_id: self.mcc_account_id,
            ads_account_id: self.ads_account_id,
            campaign_name: self.campaign_name,
            landing_domain: self.landing_domain,
            run_frequency_minutes: self
                .run_frequency_minutes
                .unwrap_or(DEFAULT_RUN_FREQUENCY_MINUTES),
            referers: self.referers,
            status: self.status.unwrap_or(LinkStatus::Stopped),
        }
    }
}

/// Request body for `PATCH /api/links/{id}`. An empty body toggles the status.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLinkStatusRequest {
    pub status: Option<LinkStatus>,
}

/// Query for `GET /api/links`.
#[derive(Debug, Deserialize)]
pub struct LinkListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub status: Option<LinkStatus>,
    pub affiliate_name: Option<String>,
    pub campaign_name: Option<String>,
}

impl LinkListQuery {
    pub fn filter(&self) -> AdLinkFilter {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        AdLinkFilter {
            status: self.status,
            affiliate_name: non_empty(&self.affiliate_name),
            campaign_name: non_empty(&self.campaign_name),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub id: i64,
    pub affiliate_name: String,
    pub affiliate_url: String,
    pub mcc_account_id: Option<String>,
    pub ads_account_id: String,
    pub campaign_name: String,
    pub landing_domain: String,
    pub run_frequency_minutes: i32,
    pub referers: Option<String>,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdLink> for LinkItem {
    fn from(l: AdLink) -> Self {
        Self {
            id: l.id,
            affiliate_name: l.affiliate_name,
            affiliate_url: l.affiliate_url,
            mcc_account_id: l.mcc_account_id,
            ads_account_id: l.ads_account_id,
            campaign_name: l.campaign_name,
            landing_domain: l.landing_domain,
            run_frequency_minutes: l.run_frequency_minutes,
            referers: l.referers,
            status: l.status,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkItem>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct RunLogItem {
    pub id: i64,
    pub status: RunStatus,
    pub message: String,
    pub old_tracking_template: Option<String>,
    pub new_tracking_template: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RunLog> for RunLogItem {
    fn from(r: RunLog) -> Self {
        Self {
            id: r.id,
            status: r.status,
            message: r.message,
            old_tracking_template: r.old_tracking_template,
            new_tracking_template: r.new_tracking_template,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunLogListResponse {
    pub link_id: i64,
    pub items: Vec<RunLogItem>,
    pub pagination: PageMeta,
}
