#![allow(dead_code)]

use adlink_rotator::domain::entities::{ADMIN_ROLE, NewUser, USER_ROLE};
use adlink_rotator::domain::repositories::UserRepository;
use adlink_rotator::infrastructure::ads::SimulatedCampaignClient;
use adlink_rotator::infrastructure::persistence::PgUserRepository;
use adlink_rotator::state::{AppState, SchedulerInfo, StateSettings};
use adlink_rotator::utils::password::hash_password;
use sqlx::PgPool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests";
pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const REDIRECT_BASE: &str = "https://r.example.com/redirect";

pub fn test_settings() -> StateSettings {
    StateSettings {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_hours: 24,
        redirect_base_url: REDIRECT_BASE.to_string(),
        rotation_log_skipped: false,
        scheduler: SchedulerInfo {
            enabled: false,
            interval_minutes: 60,
        },
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(pool),
        test_settings(),
        Arc::new(SimulatedCampaignClient::new()),
    )
}

/// Inserts an active account with [`TEST_PASSWORD`] and the given roles.
pub async fn create_test_user(pool: &PgPool, username: &str, roles: &[&str]) -> i64 {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));
    let user = repo
        .create(NewUser {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        })
        .await
        .unwrap();

    for role in roles {
        repo.assign_role(user.id, role).await.unwrap();
    }

    user.id
}

pub async fn create_regular_user(pool: &PgPool, username: &str) -> i64 {
    create_test_user(pool, username, &[USER_ROLE]).await
}

pub async fn create_admin_user(pool: &PgPool, username: &str) -> i64 {
    create_test_user(pool, username, &[USER_ROLE, ADMIN_ROLE]).await
}

pub async fn disable_user(pool: &PgPool, user_id: i64) {
    sqlx::query("UPDATE users SET status = 'disabled' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Logs in through the service and returns the bearer token.
pub async fn token_for(state: &AppState, username: &str) -> String {
    state
        .auth_service
        .login(username, TEST_PASSWORD)
        .await
        .unwrap()
        .token
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn create_test_link(pool: &PgPool, user_id: i64, campaign: &str, status: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO ad_links
            (user_id, affiliate_name, affiliate_url, ads_account_id, campaign_name,
             landing_domain, status)
        VALUES ($1, 'Acme', $2, '123-456-7890', $3, 'lp.example.com', $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(format!("https://aff.example.com/offer?c={campaign}"))
    .bind(campaign)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_domain(pool: &PgPool, hostname: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO domains (hostname) VALUES ($1) RETURNING id")
        .bind(hostname)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_used_domain(pool: &PgPool, hostname: &str, usage_count: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO domains (hostname, usage_count, last_used_at) VALUES ($1, $2, NOW()) RETURNING id",
    )
    .bind(hostname)
    .bind(usage_count)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_run_log(pool: &PgPool, link_id: i64, status: &str, message: &str) {
    sqlx::query("INSERT INTO run_logs (ad_link_id, status, message) VALUES ($1, $2, $3)")
        .bind(link_id)
        .bind(status)
        .bind(message)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn domain_usage(pool: &PgPool, domain_id: i64) -> i64 {
    sqlx::query_scalar("SELECT usage_count FROM domains WHERE id = $1")
        .bind(domain_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_run_logs(pool: &PgPool, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM run_logs WHERE ad_link_id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
