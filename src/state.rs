//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, DomainService, LinkService, RotationService, RotationSettings,
};
use crate::config::Config;
use crate::domain::campaign::CampaignUpdater;
use crate::infrastructure::persistence::{
    PgAdLinkRepository, PgDomainRepository, PgRunLogRepository, PgUserRepository,
};

pub type AppAuthService = AuthService<PgUserRepository>;
pub type AppLinkService = LinkService<PgAdLinkRepository, PgRunLogRepository>;
pub type AppDomainService = DomainService<PgDomainRepository>;
pub type AppRotationService =
    RotationService<PgAdLinkRepository, PgDomainRepository, PgRunLogRepository>;

/// Values the state needs from configuration.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub redirect_base_url: String,
    pub rotation_log_skipped: bool,
    pub scheduler: SchedulerInfo,
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_ttl_hours: config.jwt_ttl_hours,
            redirect_base_url: config.redirect_base_url.clone(),
            rotation_log_skipped: config.rotation_log_skipped,
            scheduler: SchedulerInfo {
                enabled: config.rotation_enabled,
                interval_minutes: config.rotation_interval_minutes,
            },
        }
    }
}

/// Scheduler configuration reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerInfo {
    pub enabled: bool,
    pub interval_minutes: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub auth_service: Arc<AppAuthService>,
    pub link_service: Arc<AppLinkService>,
    pub domain_service: Arc<AppDomainService>,
    pub rotation_service: Arc<AppRotationService>,
    pub scheduler: SchedulerInfo,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(
        pool: Arc<PgPool>,
        settings: StateSettings,
        campaigns: Arc<dyn CampaignUpdater>,
    ) -> Self {
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let link_repository = Arc::new(PgAdLinkRepository::new(pool.clone()));
        let domain_repository = Arc::new(PgDomainRepository::new(pool.clone()));
        let run_log_repository = Arc::new(PgRunLogRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repository,
            &settings.jwt_secret,
            settings.jwt_ttl_hours,
        ));
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            run_log_repository.clone(),
        ));
        let domain_service = Arc::new(DomainService::new(domain_repository.clone()));
        let rotation_service = Arc::new(RotationService::new(
            link_repository,
            domain_repository,
            run_log_repository,
            campaigns,
            RotationSettings {
                redirect_base_url: settings.redirect_base_url,
                log_skipped: settings.rotation_log_skipped,
            },
        ));

        Self {
            db: pool,
            auth_service,
            link_service,
            domain_service,
            rotation_service,
            scheduler: settings.scheduler,
        }
    }
}
