//! Handler for triggering a rotation batch on demand.

use axum::{Json, extract::State};

use crate::api::dto::rotation::RotationRunResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Runs one rotation batch now and returns its summary. Admin only.
///
/// # Endpoint
///
/// `POST /api/rotation/run`
///
/// Waits for a scheduled batch in progress to finish first.
///
/// # Response
///
/// ```json
/// {
///   "mode": "simulate",
///   "processed": 2,
///   "succeeded": 1,
///   "failed": 1,
///   "skipped": [],
///   "results": [
///     { "link_id": 1, "campaign_name": "Spring", "success": true, "message": "..." },
///     { "link_id": 2, "campaign_name": "Summer", "success": false, "message": "Campaign 'Summer' not found" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 500 if running links or the domain pool cannot be read.
pub async fn run_rotation_handler(
    State(state): State<AppState>,
) -> Result<Json<RotationRunResponse>, AppError> {
    let summary = state.rotation_service.run_batch().await?;

    Ok(Json(RotationRunResponse::new(
        state.rotation_service.ads_mode(),
        summary,
    )))
}
