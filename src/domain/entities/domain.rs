//! Landing domain entity used by the rotation pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a domain takes part in rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Active,
    Inactive,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Active => "active",
            DomainStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DomainStatus::Active),
            "inactive" => Ok(DomainStatus::Inactive),
            other => Err(format!("unknown domain status: {other}")),
        }
    }
}

/// A landing domain in the rotation pool.
///
/// `usage_count` only ever grows: it is bumped once for every successful
/// rotation that picked this domain. `last_used_at` is `None` until the first
/// such rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub id: i64,
    pub hostname: String,
    pub referer_override: Option<String>,
    pub status: DomainStatus,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Domain {
    /// Creates a new Domain instance.
    pub fn new(
        id: i64,
        hostname: String,
        referer_override: Option<String>,
        status: DomainStatus,
        usage_count: i64,
        last_used_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            hostname,
            referer_override,
            status,
            usage_count,
            last_used_at,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DomainStatus::Active
    }

    pub fn is_never_used(&self) -> bool {
        self.last_used_at.is_none()
    }
}

/// Input data for registering a domain.
#[derive(Debug, Clone)]
pub struct NewDomain {
    pub hostname: String,
    pub referer_override: Option<String>,
}

/// Partial update for an existing domain.
///
/// `referer_override: Some(None)` clears the override.
#[derive(Debug, Clone, Default)]
pub struct UpdateDomain {
    pub status: Option<DomainStatus>,
    pub referer_override: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_creation() {
        let now = Utc::now();
        let domain = Domain::new(
            1,
            "lp1.example.com".to_string(),
            None,
            DomainStatus::Active,
            0,
            None,
            now,
        );

        assert_eq!(domain.id, 1);
        assert_eq!(domain.hostname, "lp1.example.com");
        assert!(domain.is_active());
        assert!(domain.is_never_used());
        assert_eq!(domain.usage_count, 0);
    }

    #[test]
    fn test_inactive_domain() {
        let domain = Domain::new(
            2,
            "lp2.example.com".to_string(),
            Some("https://ref.example.com".to_string()),
            DomainStatus::Inactive,
            4,
            Some(Utc::now()),
            Utc::now(),
        );

        assert!(!domain.is_active());
        assert!(!domain.is_never_used());
        assert_eq!(
            domain.referer_override.as_deref(),
            Some("https://ref.example.com")
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("active".parse::<DomainStatus>(), Ok(DomainStatus::Active));
        assert_eq!(
            "inactive".parse::<DomainStatus>(),
            Ok(DomainStatus::Inactive)
        );
        assert!("paused".parse::<DomainStatus>().is_err());
        assert_eq!(DomainStatus::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_update_domain_default_is_noop() {
        let update = UpdateDomain::default();
        assert!(update.status.is_none());
        assert!(update.referer_override.is_none());
    }
}
