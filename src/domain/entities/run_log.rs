//! Append-only record of one rotation attempt for one ad link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
    Skipped,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(RunStatus::Success),
            "failed" => Ok(RunStatus::Failed),
            "skipped" => Ok(RunStatus::Skipped),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLog {
    pub id: i64,
    pub ad_link_id: i64,
    pub status: RunStatus,
    pub message: String,
    pub old_tracking_template: Option<String>,
    pub new_tracking_template: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for appending a run log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRunLog {
    pub ad_link_id: i64,
    pub status: RunStatus,
    pub message: String,
    pub old_tracking_template: Option<String>,
    pub new_tracking_template: Option<String>,
}

impl NewRunLog {
    /// A failed attempt with no templates attached.
    pub fn failed(ad_link_id: i64, message: impl Into<String>) -> Self {
        Self {
            ad_link_id,
            status: RunStatus::Failed,
            message: message.into(),
            old_tracking_template: None,
            new_tracking_template: None,
        }
    }

    pub fn skipped(ad_link_id: i64, message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Skipped,
            ..Self::failed(ad_link_id, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_constructor() {
        let log = NewRunLog::failed(3, "campaign not found");
        assert_eq!(log.ad_link_id, 3);
        assert_eq!(log.status, RunStatus::Failed);
        assert_eq!(log.message, "campaign not found");
        assert!(log.old_tracking_template.is_none());
        assert!(log.new_tracking_template.is_none());
    }

    #[test]
    fn test_skipped_constructor() {
        let log = NewRunLog::skipped(4, "no active domain");
        assert_eq!(log.status, RunStatus::Skipped);
        assert_eq!(log.ad_link_id, 4);
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in [RunStatus::Success, RunStatus::Failed, RunStatus::Skipped] {
            assert_eq!(status.as_str().parse::<RunStatus>(), Ok(status));
        }
    }
}
