//! Ad link management for their owners.

use std::sync::Arc;

use crate::domain::entities::{AdLink, AdLinkFilter, LinkStatus, NewAdLink, RunLog};
use crate::domain::repositories::{AdLinkRepository, LinkStats, RunLogRepository};
use crate::error::AppError;
use crate::utils::url_check::{is_valid_hostname, parse_http_url};
use serde_json::json;

/// Service for creating, listing and toggling ad links.
///
/// All operations are scoped to one owner: a link that belongs to someone
/// else is reported as not found.
pub struct LinkService<L: AdLinkRepository, R: RunLogRepository> {
    link_repository: Arc<L>,
    run_log_repository: Arc<R>,
}

impl<L: AdLinkRepository, R: RunLogRepository> LinkService<L, R> {
    pub fn new(link_repository: Arc<L>, run_log_repository: Arc<R>) -> Self {
        Self {
            link_repository,
            run_log_repository,
        }
    }

    /// Creates a link in the `stopped` state.
    ///
    /// Text fields are trimmed; the affiliate URL must be absolute http(s) and
    /// the landing domain a bare hostname.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid input.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create(&self, mut new_link: NewAdLink) -> Result<AdLink, AppError> {
        new_link.affiliate_name = new_link.affiliate_name.trim().to_string();
        new_link.affiliate_url = new_link.affiliate_url.trim().to_string();
        new_link.ads_account_id = new_link.ads_account_id.trim().to_string();
        new_link.campaign_name = new_link.campaign_name.trim().to_string();
        new_link.landing_domain = new_link.landing_domain.trim().to_lowercase();
        new_link.mcc_account_id = non_blank(new_link.mcc_account_id);
        new_link.referers = non_blank(new_link.referers);

        for (field, value) in [
            ("affiliate_name", &new_link.affiliate_name),
            ("ads_account_id", &new_link.ads_account_id),
            ("campaign_name", &new_link.campaign_name),
        ] {
            if value.is_empty() {
                return Err(AppError::bad_request(
                    "Required field is empty",
                    json!({"field": field}),
                ));
            }
        }

        parse_http_url(&new_link.affiliate_url).map_err(|e| {
            AppError::bad_request(
                "Invalid affiliate URL",
                json!({"field": "affiliate_url", "reason": e.to_string()}),
            )
        })?;

        if !is_valid_hostname(&new_link.landing_domain) {
            return Err(AppError::bad_request(
                "Invalid landing domain",
                json!({"field": "landing_domain", "value": new_link.landing_domain}),
            ));
        }

        if new_link.run_frequency_minutes <= 0 {
            return Err(AppError::bad_request(
                "Run frequency must be positive",
                json!({"field": "run_frequency_minutes", "value": new_link.run_frequency_minutes}),
            ));
        }

        let link = self.link_repository.create(new_link).await?;
        tracing::info!(link_id = link.id, user_id = link.user_id, "Ad link created");

        Ok(link)
    }

    /// Returns one page of the owner's links and the total matching count.
    pub async fn list(
        &self,
        user_id: i64,
        filter: AdLinkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AdLink>, i64), AppError> {
        let total = self
            .link_repository
            .count_by_owner(user_id, filter.clone())
            .await?;
        let items = self
            .link_repository
            .list_by_owner(user_id, filter, limit, offset)
            .await?;

        Ok((items, total))
    }

    /// Sets a link's status, or flips it when `status` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is not owned
    /// by `user_id`.
    pub async fn change_status(
        &self,
        id: i64,
        user_id: i64,
        status: Option<LinkStatus>,
    ) -> Result<AdLink, AppError> {
        let target = match status {
            Some(s) => s,
            None => self.get_owned(id, user_id).await?.status.toggled(),
        };

        let link = self
            .link_repository
            .update_status(id, user_id, target)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(link_id = id, user_id, status = %link.status, "Ad link status changed");
        Ok(link)
    }

    /// Run logs of an owned link, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is not owned by `user_id`.
    pub async fn logs(
        &self,
        id: i64,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RunLog>, i64), AppError> {
        self.get_owned(id, user_id).await?;

        let total = self.run_log_repository.count_for_link(id).await?;
        let items = self
            .run_log_repository
            .list_for_link(id, limit, offset)
            .await?;

        Ok((items, total))
    }

    pub async fn stats(&self, user_id: i64) -> Result<LinkStats, AppError> {
        self.link_repository.stats_for_owner(user_id).await
    }

    async fn get_owned(&self, id: i64, user_id: i64) -> Result<AdLink, AppError> {
        self.link_repository
            .find_for_owner(id, user_id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Ad link not found", json!({"id": id}))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
