//! Ad link entity: one affiliate offer bound to one ads campaign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default rotation cadence stored on new links.
pub const DEFAULT_RUN_FREQUENCY_MINUTES: i32 = 60;

/// Lifecycle state of an ad link. Only `Running` links are rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Running,
    Stopped,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Running => "running",
            LinkStatus::Stopped => "stopped",
        }
    }

    /// The opposite state, used by the status toggle.
    pub fn toggled(&self) -> Self {
        match self {
            LinkStatus::Running => LinkStatus::Stopped,
            LinkStatus::Stopped => LinkStatus::Running,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(LinkStatus::Running),
            "stopped" => Ok(LinkStatus::Stopped),
            other => Err(format!("unknown link status: {other}")),
        }
    }
}

/// An affiliate link bound to a Google Ads campaign.
///
/// The rotation job reads these records but never modifies them; status only
/// changes through the owner's toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct AdLink {
    pub id: i64,
    pub user_id: i64,
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

impl AdLink {
    pub fn is_running(&self) -> bool {
        self.status == LinkStatus::Running
    }

    /// Splits the comma-separated referer list, dropping blanks.
    pub fn referer_list(&self) -> Vec<&str> {
        self.referers
            .as_deref()
            .map(|r| {
                r.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Input data for creating an ad link.
#[derive(Debug, Clone)]
pub struct NewAdLink {
    pub user_id: i64,
    pub affiliate_name: String,
    pub affiliate_url: String,
    pub mcc_account_id: Option<String>,
    pub ads_account_id: String,
    pub campaign_name: String,
    pub landing_domain: String,
    pub run_frequency_minutes: i32,
    pub referers: Option<String>,
    pub status: LinkStatus,
}

/// Listing filters. Name filters match as case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdLinkFilter {
    pub status: Option<LinkStatus>,
    pub affiliate_name: Option<String>,
    pub campaign_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(referers: Option<&str>) -> AdLink {
        let now = Utc::now();
        AdLink {
            id: 1,
            user_id: 10,
            affiliate_name: "Acme".to_string(),
            affiliate_url: "https://aff.example.com/offer".to_string(),
            mcc_account_id: Some("123-456-7890".to_string()),
            ads_account_id: "111-222-3333".to_string(),
            campaign_name: "Spring Sale".to_string(),
            landing_domain: "lp.example.com".to_string(),
            run_frequency_minutes: DEFAULT_RUN_FREQUENCY_MINUTES,
            referers: referers.map(str::to_string),
            status: LinkStatus::Stopped,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_referer_list_splits_and_trims() {
        let link = sample(Some("a.com, b.com,,  c.com "));
        assert_eq!(link.referer_list(), vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_referer_list_empty() {
        assert!(sample(None).referer_list().is_empty());
        assert!(sample(Some(" , ")).referer_list().is_empty());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(LinkStatus::Running.toggled(), LinkStatus::Stopped);
        assert_eq!(LinkStatus::Stopped.toggled(), LinkStatus::Running);
        assert!(!sample(None).is_running());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("running".parse::<LinkStatus>(), Ok(LinkStatus::Running));
        assert_eq!("stopped".parse::<LinkStatus>(), Ok(LinkStatus::Stopped));
        assert!("RUNNING".parse::<LinkStatus>().is_err());
    }
}
