//! Campaign client that never leaves the process.

use async_trait::async_trait;

use crate::domain::campaign::{CampaignTarget, CampaignUpdateResult, CampaignUpdater};

/// Pretends every update succeeds. Used when `ADS_MODE=simulate`.
#[derive(Debug, Default, Clone)]
pub struct SimulatedCampaignClient;

impl SimulatedCampaignClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CampaignUpdater for SimulatedCampaignClient {
    async fn update_tracking_template(
        &self,
        target: &CampaignTarget,
        new_url: &str,
    ) -> CampaignUpdateResult {
        tracing::info!(
            campaign = %target.campaign_name,
            account = %target.ads_account_id,
            new_url,
            "Simulated tracking template update"
        );

        CampaignUpdateResult::succeeded(
            None,
            new_url,
            format!(
                "Simulated update of tracking template for campaign {}",
                target.campaign_name
            ),
        )
    }

    fn mode(&self) -> &'static str {
        "simulate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_update_always_succeeds() {
        let client = SimulatedCampaignClient::new();
        let target = CampaignTarget {
            ads_account_id: "111-222-3333".to_string(),
            mcc_account_id: None,
            campaign_name: "Spring Sale".to_string(),
        };

        let result = client
            .update_tracking_template(&target, "https://r.example.com/redirect?target=x")
            .await;

        assert!(result.success);
        assert!(result.old_template.is_none());
        assert_eq!(
            result.new_template.as_deref(),
            Some("https://r.example.com/redirect?target=x")
        );
        assert!(result.message.contains("Spring Sale"));
        assert_eq!(client.mode(), "simulate");
    }
}
