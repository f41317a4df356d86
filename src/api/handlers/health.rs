//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Database reachable
/// - **503 Service Unavailable**: Database check failed
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` plus the number of active domains
/// 2. **Ads client**: which campaign client is configured (informational)
/// 3. **Scheduler**: enabled flag and interval (informational)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 3 active domains" },
///     "ads_client": { "status": "ok", "message": "Mode: simulate" },
///     "scheduler": { "status": "ok", "message": "Every 60 min" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let ads_client = CheckStatus::ok(format!("Mode: {}", state.rotation_service.ads_mode()));
    let scheduler = check_scheduler(&state);

    let healthy = database.is_ok();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            ads_client,
            scheduler,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    if let Err(e) = sqlx::query("SELECT 1").execute(state.db.as_ref()).await {
        return CheckStatus::error(format!("Database error: {e}"));
    }

    match state.domain_service.list_domains(true).await {
        Ok(domains) => CheckStatus::ok(format!("Connected, {} active domains", domains.len())),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

fn check_scheduler(state: &AppState) -> CheckStatus {
    if state.scheduler.enabled {
        CheckStatus::ok(format!("Every {} min", state.scheduler.interval_minutes))
    } else {
        CheckStatus {
            status: "disabled".to_string(),
            message: Some("ROTATION_ENABLED=false".to_string()),
        }
    }
}
