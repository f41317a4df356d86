//! Handler for the dashboard counters.

use axum::{Extension, Json, extract::State};

use crate::api::dto::dashboard::DashboardStatsResponse;
use crate::application::services::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// Link counters for the caller.
///
/// # Endpoint
///
/// `GET /api/dashboard/stats`
///
/// # Response
///
/// ```json
/// { "total_links": 12, "running_links": 8, "stopped_links": 4, "total_runs": 311 }
/// ```
pub async fn dashboard_stats_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    let stats = state.link_service.stats(claims.user_id()).await?;
    Ok(Json(stats.into()))
}
