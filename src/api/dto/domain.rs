//! DTOs for landing domain management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Domain, DomainStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDomainRequest {
    #[validate(length(min = 1, max = 253))]
    pub hostname: String,

    #[validate(length(max = 2048))]
    pub referer_override: Option<String>,
}

/// Request body for `PATCH /api/domains/{id}`.
///
/// `referer_override`: absent = unchanged, `null` = clear, string = set.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDomainRequest {
    pub status: Option<DomainStatus>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub referer_override: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct DomainItem {
    pub id: i64,
    pub hostname: String,
    pub referer_override: Option<String>,
    pub status: DomainStatus,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Domain> for DomainItem {
    fn from(d: Domain) -> Self {
        Self {
            id: d.id,
            hostname: d.hostname,
            referer_override: d.referer_override,
            status: d.status,
            usage_count: d.usage_count,
            last_used_at: d.last_used_at,
            created_at: d.created_at,
        }
    }
}

/// Domains in selection order (least used first).
#[derive(Debug, Serialize)]
pub struct DomainListResponse {
    pub items: Vec<DomainItem>,
}
