//! Least-used landing domain selection.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::entities::Domain;
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;

/// Orders two domains by preference: lower `usage_count` first, then older
/// `last_used_at` (never-used before any timestamp), then lower `id`.
fn preference(a: &Domain, b: &Domain) -> Ordering {
    a.usage_count
        .cmp(&b.usage_count)
        .then_with(|| match (a.last_used_at, b.last_used_at) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Picks the preferred active domain from `domains`, or `None` if none is active.
pub fn select_least_used(domains: &[Domain]) -> Option<&Domain> {
    domains
        .iter()
        .filter(|d| d.is_active())
        .min_by(|a, b| preference(a, b))
}

/// Chooses the landing domain for each rotation and records its use.
///
/// Selection and the usage bump are separate steps: the rotation only
/// [`commit`](DomainSelector::commit)s a domain after the campaign update succeeded.
pub struct DomainSelector<D: DomainRepository> {
    repository: Arc<D>,
}

impl<D: DomainRepository> DomainSelector<D> {
    pub fn new(repository: Arc<D>) -> Self {
        Self { repository }
    }

    /// Returns the least used active domain.
    ///
    /// `Ok(None)` means the pool has no active domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the pool cannot be read.
    pub async fn select(&self) -> Result<Option<Domain>, AppError> {
        let domains = self.repository.list(true).await?;
        Ok(select_least_used(&domains).cloned())
    }

    /// Bumps the domain's usage counter and last-used timestamp in one statement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the domain vanished, or
    /// [`AppError::Internal`] on database errors.
    pub async fn commit(&self, domain: &Domain) -> Result<Domain, AppError> {
        self.repository.increment_usage(domain.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DomainStatus;
    use crate::domain::repositories::MockDomainRepository;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn domain(id: i64, usage: i64, last_used_mins_ago: Option<i64>) -> Domain {
        Domain::new(
            id,
            format!("lp{id}.example.com"),
            None,
            DomainStatus::Active,
            usage,
            last_used_mins_ago.map(|m| Utc::now() - Duration::minutes(m)),
            Utc::now(),
        )
    }

    #[test]
    fn test_picks_minimum_usage() {
        let domains = vec![domain(1, 5, Some(1)), domain(2, 0, None), domain(3, 2, Some(3))];
        assert_eq!(select_least_used(&domains).map(|d| d.id), Some(2));
    }

    #[test]
    fn test_tie_prefers_never_used() {
        let domains = vec![domain(1, 3, Some(100)), domain(2, 3, None)];
        assert_eq!(select_least_used(&domains).map(|d| d.id), Some(2));
    }

    #[test]
    fn test_tie_prefers_oldest_last_used() {
        let domains = vec![domain(1, 3, Some(5)), domain(2, 3, Some(60)), domain(3, 3, Some(10))];
        assert_eq!(select_least_used(&domains).map(|d| d.id), Some(2));
    }

    #[test]
    fn test_full_tie_prefers_lowest_id() {
        let domains = vec![domain(7, 0, None), domain(4, 0, None), domain(9, 0, None)];
        assert_eq!(select_least_used(&domains).map(|d| d.id), Some(4));
    }

    #[test]
    fn test_inactive_domains_are_ignored() {
        let mut idle = domain(1, 0, None);
        idle.status = DomainStatus::Inactive;
        let domains = vec![idle, domain(2, 10, Some(1))];
        assert_eq!(select_least_used(&domains).map(|d| d.id), Some(2));
    }

    #[test]
    fn test_empty_pool_yields_none() {
        assert!(select_least_used(&[]).is_none());

        let mut idle = domain(1, 0, None);
        idle.status = DomainStatus::Inactive;
        assert!(select_least_used(&[idle]).is_none());
    }

    #[test]
    fn test_selected_usage_is_minimum() {
        let domains: Vec<Domain> = (1..=20)
            .map(|i| domain(i, (i * 7919) % 13, if i % 3 == 0 { None } else { Some(i) }))
            .collect();
        let min = domains.iter().map(|d| d.usage_count).min().unwrap();

        let chosen = select_least_used(&domains).unwrap();
        assert_eq!(chosen.usage_count, min);
    }

    #[tokio::test]
    async fn test_select_reads_active_domains() {
        let mut repo = MockDomainRepository::new();
        repo.expect_list()
            .withf(|only_active| *only_active)
            .times(1)
            .returning(|_| Ok(vec![domain(1, 5, Some(1)), domain(2, 0, None)]));

        let selector = DomainSelector::new(Arc::new(repo));
        let chosen = selector.select().await.unwrap();

        assert_eq!(chosen.map(|d| d.id), Some(2));
    }

    #[tokio::test]
    async fn test_select_empty_pool() {
        let mut repo = MockDomainRepository::new();
        repo.expect_list().times(1).returning(|_| Ok(vec![]));

        let selector = DomainSelector::new(Arc::new(repo));
        assert!(selector.select().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_propagates_read_failure() {
        let mut repo = MockDomainRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let selector = DomainSelector::new(Arc::new(repo));
        assert!(matches!(
            selector.select().await,
            Err(AppError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_commit_increments_selected_domain() {
        let mut repo = MockDomainRepository::new();
        repo.expect_increment_usage()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|id| Ok(domain(id, 1, Some(0))));

        let selector = DomainSelector::new(Arc::new(repo));
        let updated = selector.commit(&domain(3, 0, None)).await.unwrap();

        assert_eq!(updated.usage_count, 1);
        assert!(updated.last_used_at.is_some());
    }
}
