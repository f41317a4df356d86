//! Rotation batch: give every running ad link a fresh landing domain.
//!
//! For each running link the batch picks the least used active domain, builds
//! a tracking URL that routes through the redirect endpoint, pushes it to the
//! link's campaign and appends a run log. The domain's usage counter only
//! moves when the campaign update succeeded.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use crate::application::services::domain_selector::DomainSelector;
use crate::domain::campaign::{CampaignTarget, CampaignUpdater};
use crate::domain::entities::{AdLink, Domain, NewRunLog, RunLog, RunStatus};
use crate::domain::repositories::{AdLinkRepository, DomainRepository, RunLogRepository};
use crate::domain::rotation_worker::RotationJob;
use crate::error::AppError;
use crate::utils::tracking_url::build_tracking_url;

/// Attempts for a run log insert, the first one included.
const RUN_LOG_WRITE_ATTEMPTS: usize = 3;

/// Outcome for one link in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRotationResult {
    pub link_id: i64,
    pub campaign_name: String,
    pub success: bool,
    pub message: String,
}

/// Everything a batch did. Links skipped for lack of a domain are listed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub results: Vec<LinkRotationResult>,
    pub skipped: Vec<i64>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct RotationSettings {
    /// Prefix of every generated tracking URL (the public `/redirect` endpoint).
    pub redirect_base_url: String,
    /// Append a `skipped` run log when no domain is available for a link.
    pub log_skipped: bool,
}

/// Runs rotation batches. At most one batch runs at a time.
pub struct RotationService<L, D, R>
where
    L: AdLinkRepository,
    D: DomainRepository,
    R: RunLogRepository,
{
    links: Arc<L>,
    selector: DomainSelector<D>,
    run_logs: Arc<R>,
    campaigns: Arc<dyn CampaignUpdater>,
    settings: RotationSettings,
    batch_lock: Mutex<()>,
}

impl<L, D, R> RotationService<L, D, R>
where
    L: AdLinkRepository,
    D: DomainRepository,
    R: RunLogRepository,
{
    pub fn new(
        links: Arc<L>,
        domains: Arc<D>,
        run_logs: Arc<R>,
        campaigns: Arc<dyn CampaignUpdater>,
        settings: RotationSettings,
    ) -> Self {
        Self {
            links,
            selector: DomainSelector::new(domains),
            run_logs,
            campaigns,
            settings,
            batch_lock: Mutex::new(()),
        }
    }

    /// Label of the configured campaign client ("simulate" or "live").
    pub fn ads_mode(&self) -> &'static str {
        self.campaigns.mode()
    }

    /// Processes every running link once, sequentially.
    ///
    /// A failure on one link is logged, recorded as a failed run log and
    /// reported in the summary; the batch moves on to the next link. A link for
    /// which no active domain exists is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error and stops the batch when the running links or the
    /// domain pool cannot be read.
    pub async fn run_batch(&self) -> Result<BatchSummary, AppError> {
        let _guard = self.batch_lock.lock().await;

        let links = self.links.list_running().await.inspect_err(|e| {
            tracing::error!(error = %e, "Rotation batch aborted: cannot load running links");
            metrics::counter!("rotation_batches_total", "result" => "error").increment(1);
        })?;

        tracing::info!(links = links.len(), "Rotation batch started");
        let mut summary = BatchSummary::default();

        for link in links {
            let domain = match self.selector.select().await {
                Ok(Some(domain)) => domain,
                Ok(None) => {
                    self.skip_link(&link).await;
                    summary.skipped.push(link.id);
                    continue;
                }
                Err(e) => {
                    tracing::error!(
                        link_id = link.id,
                        error = %e,
                        "Rotation batch aborted: cannot read domain pool"
                    );
                    metrics::counter!("rotation_batches_total", "result" => "error").increment(1);
                    return Err(e);
                }
            };

            let result = self.rotate_link(&link, &domain).await;
            let outcome = if result.success { "success" } else { "failed" };
            metrics::counter!("rotation_links_total", "outcome" => outcome).increment(1);
            summary.results.push(result);
        }

        tracing::info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            skipped = summary.skipped.len(),
            "Rotation batch finished"
        );
        metrics::counter!("rotation_batches_total", "result" => "completed").increment(1);

        Ok(summary)
    }

    async fn skip_link(&self, link: &AdLink) {
        tracing::warn!(
            link_id = link.id,
            campaign = %link.campaign_name,
            "No active domain available, skipping link"
        );
        metrics::counter!("rotation_links_total", "outcome" => "skipped").increment(1);

        if self.settings.log_skipped {
            let log = NewRunLog::skipped(link.id, "No active domain available");
            if let Err(e) = self.append_log(log).await {
                tracing::error!(link_id = link.id, error = %e, "Failed to write skipped run log");
            }
        }
    }

    /// Rotates one link. Never fails: errors become a failed result and, unless
    /// a log for this attempt already exists, a failed run log.
    async fn rotate_link(&self, link: &AdLink, domain: &Domain) -> LinkRotationResult {
        let mut log_written = false;

        match self.try_rotate_link(link, domain, &mut log_written).await {
            Ok(result) => result,
            Err(e) => {
                let message = e.to_string();
                tracing::error!(
                    link_id = link.id,
                    domain = %domain.hostname,
                    campaign = %link.campaign_name,
                    error = %message,
                    "Link rotation failed"
                );

                if !log_written
                    && let Err(log_err) = self
                        .append_log(NewRunLog::failed(link.id, message.clone()))
                        .await
                {
                    tracing::error!(
                        link_id = link.id,
                        error = %log_err,
                        "Failed to write run log for failed rotation"
                    );
                }

                LinkRotationResult {
                    link_id: link.id,
                    campaign_name: link.campaign_name.clone(),
                    success: false,
                    message,
                }
            }
        }
    }

    async fn try_rotate_link(
        &self,
        link: &AdLink,
        domain: &Domain,
        log_written: &mut bool,
    ) -> Result<LinkRotationResult, AppError> {
        validate_link(link)?;

        let tracking_url = build_tracking_url(
            &self.settings.redirect_base_url,
            &link.affiliate_url,
            &domain.hostname,
        );

        let target = CampaignTarget {
            ads_account_id: link.ads_account_id.clone(),
            mcc_account_id: link.mcc_account_id.clone(),
            campaign_name: link.campaign_name.clone(),
        };

        tracing::debug!(
            link_id = link.id,
            domain = %domain.hostname,
            campaign = %link.campaign_name,
            tracking_url = %tracking_url,
            "Updating tracking template"
        );

        let update = self
            .campaigns
            .update_tracking_template(&target, &tracking_url)
            .await;

        self.append_log(NewRunLog {
            ad_link_id: link.id,
            status: if update.success {
                RunStatus::Success
            } else {
                RunStatus::Failed
            },
            message: update.message.clone(),
            old_tracking_template: update.old_template.clone(),
            new_tracking_template: update.new_template.clone(),
        })
        .await?;
        *log_written = true;

        if update.success {
            self.selector.commit(domain).await?;
            tracing::info!(
                link_id = link.id,
                domain = %domain.hostname,
                campaign = %link.campaign_name,
                "Link rotated"
            );
        } else {
            tracing::warn!(
                link_id = link.id,
                domain = %domain.hostname,
                campaign = %link.campaign_name,
                message = %update.message,
                "Campaign update reported failure"
            );
        }

        Ok(LinkRotationResult {
            link_id: link.id,
            campaign_name: link.campaign_name.clone(),
            success: update.success,
            message: update.message,
        })
    }

    /// Appends a run log, retrying database failures with exponential backoff.
    ///
    /// Rejections such as a vanished link are returned at once. A commit whose
    /// acknowledgement is lost is retried too, so that attempt may be logged twice.
    async fn append_log(&self, log: NewRunLog) -> Result<RunLog, AppError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(2))
            .take(RUN_LOG_WRITE_ATTEMPTS - 1);

        RetryIf::start(
            strategy,
            || self.run_logs.create(log.clone()),
            |e: &AppError| matches!(e, AppError::Internal { .. }),
        )
        .await
    }
}

#[async_trait]
impl<L, D, R> RotationJob for RotationService<L, D, R>
where
    L: AdLinkRepository,
    D: DomainRepository,
    R: RunLogRepository,
{
    async fn run_once(&self) -> Result<BatchSummary, AppError> {
        self.run_batch().await
    }
}

/// Rejects links that cannot be rotated because required data is blank.
fn validate_link(link: &AdLink) -> Result<(), AppError> {
    let missing: Vec<&str> = [
        ("affiliate_url", &link.affiliate_url),
        ("ads_account_id", &link.ads_account_id),
        ("campaign_name", &link.campaign_name),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(AppError::bad_request(
            format!("Ad link is missing required data: {}", missing.join(", ")),
            json!({"link_id": link.id, "fields": missing}),
        ));
    }

    Ok(())
}
