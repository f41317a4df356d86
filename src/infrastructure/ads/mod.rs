//! Campaign update clients.
//!
//! - [`GoogleAdsClient`] - live Google Ads REST API (`ADS_MODE=live`)
//! - [`SimulatedCampaignClient`] - no network, always succeeds (`ADS_MODE=simulate`)

pub mod google_ads;
pub mod simulated;

pub use google_ads::{AdsError, GoogleAdsClient, GoogleAdsCredentials};
pub use simulated::SimulatedCampaignClient;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AdsMode, Config};
use crate::domain::campaign::CampaignUpdater;

/// Builds the campaign client selected by `ADS_MODE`.
///
/// # Errors
///
/// Fails in live mode when credentials are missing or the HTTP client cannot
/// be built.
pub fn campaign_client_from_config(config: &Config) -> Result<Arc<dyn CampaignUpdater>> {
    match config.ads_mode {
        AdsMode::Simulate => {
            tracing::info!("Ads client: simulation (no API calls)");
            Ok(Arc::new(SimulatedCampaignClient::new()))
        }
        AdsMode::Live => {
            let credentials = config
                .google_ads
                .clone()
                .context("ADS_MODE=live requires Google Ads credentials")?;

            let client = GoogleAdsClient::new(
                credentials,
                config.ads_api_version.clone(),
                Duration::from_secs(config.ads_api_timeout_seconds),
            )
            .context("Failed to build Google Ads client")?;

            tracing::info!(api_version = %config.ads_api_version, "Ads client: Google Ads (live)");
            Ok(Arc::new(client))
        }
    }
}
