mod common;

use adlink_rotator::application::services::{RotationService, RotationSettings};
use adlink_rotator::domain::campaign::{CampaignTarget, CampaignUpdateResult, CampaignUpdater};
use adlink_rotator::infrastructure::ads::SimulatedCampaignClient;
use adlink_rotator::infrastructure::persistence::{
    PgAdLinkRepository, PgDomainRepository, PgRunLogRepository,
};
use adlink_rotator::utils::tracking_url::build_tracking_url;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

type PgRotationService = RotationService<PgAdLinkRepository, PgDomainRepository, PgRunLogRepository>;

/// Fails every update for campaigns whose name starts with "broken".
struct SelectiveClient;

#[async_trait]
impl CampaignUpdater for SelectiveClient {
    async fn update_tracking_template(
        &self,
        target: &CampaignTarget,
        new_url: &str,
    ) -> CampaignUpdateResult {
        if target.campaign_name.starts_with("broken") {
            CampaignUpdateResult::failed(format!("Campaign '{}' not found", target.campaign_name))
        } else {
            CampaignUpdateResult::succeeded(
                Some("https://old.example.com/t".to_string()),
                new_url,
                "Updated",
            )
        }
    }

    fn mode(&self) -> &'static str {
        "live"
    }
}

fn service_with(
    pool: &PgPool,
    campaigns: Arc<dyn CampaignUpdater>,
    log_skipped: bool,
) -> PgRotationService {
    let pool = Arc::new(pool.clone());
    RotationService::new(
        Arc::new(PgAdLinkRepository::new(pool.clone())),
        Arc::new(PgDomainRepository::new(pool.clone())),
        Arc::new(PgRunLogRepository::new(pool)),
        campaigns,
        RotationSettings {
            redirect_base_url: common::REDIRECT_BASE.to_string(),
            log_skipped,
        },
    )
}

fn simulated(pool: &PgPool) -> PgRotationService {
    service_with(pool, Arc::new(SimulatedCampaignClient::new()), false)
}

async fn usages(pool: &PgPool) -> Vec<(String, i64)> {
    sqlx::query_as("SELECT hostname, usage_count FROM domains ORDER BY hostname")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[sqlx::test]
async fn test_each_domain_used_once_when_pool_matches_links(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let mut links = Vec::new();
    for i in 0..5 {
        links.push(common::create_test_link(&pool, owner, &format!("C{i}"), "running").await);
        common::create_test_domain(&pool, &format!("lp{i}.example.com")).await;
    }

    let summary = simulated(&pool).run_batch().await.unwrap();

    assert_eq!(summary.results.len(), 5);
    assert_eq!(summary.succeeded(), 5);
    assert!(summary.skipped.is_empty());

    for link in links {
        assert_eq!(common::count_run_logs(&pool, link).await, 1);
    }
    assert!(usages(&pool).await.iter().all(|(_, n)| *n == 1));

    let success_logs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM run_logs WHERE status = 'success'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(success_logs, 5);
}

#[sqlx::test]
async fn test_least_used_domain_wins(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let link = common::create_test_link(&pool, owner, "Spring", "running").await;
    common::create_used_domain(&pool, "busy.example.com", 5).await;
    common::create_test_domain(&pool, "fresh.example.com").await;

    simulated(&pool).run_batch().await.unwrap();

    assert_eq!(
        usages(&pool).await,
        vec![
            ("busy.example.com".to_string(), 5),
            ("fresh.example.com".to_string(), 1),
        ]
    );

    let new_template: Option<String> = sqlx::query_scalar(
        "SELECT new_tracking_template FROM run_logs WHERE ad_link_id = $1",
    )
    .bind(link)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(
        new_template.as_deref(),
        Some(
            build_tracking_url(
                common::REDIRECT_BASE,
                "https://aff.example.com/offer?c=Spring",
                "fresh.example.com",
            )
            .as_str()
        )
    );
}

#[sqlx::test]
async fn test_more_links_than_domains_spreads_usage(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    for i in 0..4 {
        common::create_test_link(&pool, owner, &format!("C{i}"), "running").await;
    }
    common::create_test_domain(&pool, "a.example.com").await;
    common::create_test_domain(&pool, "b.example.com").await;

    simulated(&pool).run_batch().await.unwrap();

    assert_eq!(
        usages(&pool).await,
        vec![
            ("a.example.com".to_string(), 2),
            ("b.example.com".to_string(), 2),
        ]
    );
}

#[sqlx::test]
async fn test_inactive_domains_and_stopped_links_ignored(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let running = common::create_test_link(&pool, owner, "On", "running").await;
    let stopped = common::create_test_link(&pool, owner, "Off", "stopped").await;
    let inactive = common::create_test_domain(&pool, "a.example.com").await;
    let active = common::create_used_domain(&pool, "b.example.com", 10).await;
    sqlx::query("UPDATE domains SET status = 'inactive' WHERE id = $1")
        .bind(inactive)
        .execute(&pool)
        .await
        .unwrap();

    let summary = simulated(&pool).run_batch().await.unwrap();

    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].link_id, running);
    assert_eq!(common::count_run_logs(&pool, stopped).await, 0);
    assert_eq!(common::domain_usage(&pool, inactive).await, 0);
    assert_eq!(common::domain_usage(&pool, active).await, 11);
}

#[sqlx::test]
async fn test_failed_update_logs_without_usage(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let good = common::create_test_link(&pool, owner, "good", "running").await;
    let bad = common::create_test_link(&pool, owner, "broken campaign", "running").await;
    common::create_test_domain(&pool, "a.example.com").await;
    common::create_test_domain(&pool, "b.example.com").await;

    let service = service_with(&pool, Arc::new(SelectiveClient), false);
    assert_eq!(service.ads_mode(), "live");

    let summary = service.run_batch().await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);

    let (status, message, old): (String, String, Option<String>) = sqlx::query_as(
        "SELECT status, message, old_tracking_template FROM run_logs WHERE ad_link_id = $1",
    )
    .bind(bad)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "failed");
    assert_eq!(message, "Campaign 'broken campaign' not found");
    assert!(old.is_none());

    let (status, old): (String, Option<String>) = sqlx::query_as(
        "SELECT status, old_tracking_template FROM run_logs WHERE ad_link_id = $1",
    )
    .bind(good)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "success");
    assert_eq!(old.as_deref(), Some("https://old.example.com/t"));

    let total_usage: i64 = sqlx::query_scalar("SELECT SUM(usage_count)::BIGINT FROM domains")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total_usage, 1);
}

#[sqlx::test]
async fn test_empty_pool_skips_without_log(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let link = common::create_test_link(&pool, owner, "C", "running").await;

    let summary = simulated(&pool).run_batch().await.unwrap();

    assert_eq!(summary.skipped, vec![link]);
    assert!(summary.results.is_empty());
    assert_eq!(common::count_run_logs(&pool, link).await, 0);
}

#[sqlx::test]
async fn test_empty_pool_skip_logged_when_enabled(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let link = common::create_test_link(&pool, owner, "C", "running").await;

    let service = service_with(&pool, Arc::new(SimulatedCampaignClient::new()), true);
    service.run_batch().await.unwrap();

    let status: String = sqlx::query_scalar("SELECT status FROM run_logs WHERE ad_link_id = $1")
        .bind(link)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "skipped");
}

#[sqlx::test]
async fn test_concurrent_batches_do_not_overlap(pool: PgPool) {
    let owner = common::create_regular_user(&pool, "owner").await;
    let link = common::create_test_link(&pool, owner, "C", "running").await;
    common::create_test_domain(&pool, "a.example.com").await;
    common::create_test_domain(&pool, "b.example.com").await;

    let service = Arc::new(simulated(&pool));
    let (first, second) = tokio::join!(service.run_batch(), service.run_batch());
    first.unwrap();
    second.unwrap();

    assert_eq!(common::count_run_logs(&pool, link).await, 2);
    assert_eq!(
        usages(&pool).await,
        vec![
            ("a.example.com".to_string(), 1),
            ("b.example.com".to_string(), 1),
        ]
    );
}

#[sqlx::test]
async fn test_batch_with_no_running_links(pool: PgPool) {
    common::create_test_domain(&pool, "a.example.com").await;

    let summary = simulated(&pool).run_batch().await.unwrap();

    assert!(summary.results.is_empty());
    assert!(summary.skipped.is_empty());
    assert_eq!(usages(&pool).await, vec![("a.example.com".to_string(), 0)]);
}
