//! Contract for pushing a new tracking template to an ads campaign.

use async_trait::async_trait;
use serde::Serialize;

/// Identifies the campaign whose tracking template should change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignTarget {
    pub ads_account_id: String,
    pub mcc_account_id: Option<String>,
    pub campaign_name: String,
}

/// Outcome of one update attempt.
///
/// Transport, authentication and lookup failures all land here with
/// `success = false`; they are never surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignUpdateResult {
    pub success: bool,
    pub old_template: Option<String>,
    pub new_template: Option<String>,
    pub message: String,
}

impl CampaignUpdateResult {
    pub fn succeeded(
        old_template: Option<String>,
        new_template: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            old_template,
            new_template: Some(new_template.into()),
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            old_template: None,
            new_template: None,
            message: message.into(),
        }
    }
}

/// Client able to rewrite a campaign's tracking URL template.
///
/// # Implementations
///
/// - [`crate::infrastructure::ads::GoogleAdsClient`] - live Google Ads REST API
/// - [`crate::infrastructure::ads::SimulatedCampaignClient`] - no network, always succeeds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignUpdater: Send + Sync {
    /// Replaces the campaign's tracking template with `new_url`.
    async fn update_tracking_template(
        &self,
        target: &CampaignTarget,
        new_url: &str,
    ) -> CampaignUpdateResult;

    /// Short label reported by the health endpoint ("simulate" or "live").
    fn mode(&self) -> &'static str;
}
