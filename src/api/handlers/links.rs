//! Handlers for the caller's ad links.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkItem, LinkListQuery, LinkListResponse, RunLogListResponse,
    UpdateLinkStatusRequest,
};
use crate::api::dto::pagination::{Page, PaginationParams};
use crate::application::services::Claims;
use crate::error::AppError;
use crate::state::AppState;

fn page_from(params: &PaginationParams) -> Result<Page, AppError> {
    params
        .validate()
        .map_err(|e| AppError::bad_request(e, json!({})))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?status=running&affiliate_name=acme&campaign_name=spring&page=1&page_size=20`
///
/// Name filters match case-insensitive substrings.
pub async fn link_list_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LinkListQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    let page = page_from(&query.pagination)?;

    let (items, total) = state
        .link_service
        .list(claims.user_id(), query.filter(), page.limit(), page.offset())
        .await?;

    Ok(Json(LinkListResponse {
        items: items.into_iter().map(LinkItem::from).collect(),
        pagination: page.meta(total),
    }))
}

/// Creates a link owned by the caller, `stopped` unless the body sets `status`.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "affiliate_name": "Acme",
///   "affiliate_url": "https://aff.example.com/offer?id=9",
///   "mcc_account_id": "123-456-7890",
///   "ads_account_id": "111-222-3333",
///   "campaign_name": "Spring Sale",
///   "landing_domain": "lp.example.com",
///   "run_frequency_minutes": 60,
///   "referers": "news.example.com,blog.example.com",
///   "status": "running"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 on invalid input.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkItem>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create(payload.into_new_link(claims.user_id()))
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Starts or stops a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// Body `{"status": "running"}` or `{"status": "stopped"}` sets the state;
/// no body (or no `status`) flips it.
///
/// # Errors
///
/// Returns 400 on an unknown status value.
/// Returns 404 if the link does not exist or belongs to another user.
pub async fn update_link_status_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Option<Json<UpdateLinkStatusRequest>>, JsonRejection>,
) -> Result<Json<LinkItem>, AppError> {
    let status = payload?.and_then(|Json(p)| p.status);

    let link = state
        .link_service
        .change_status(id, claims.user_id(), status)
        .await?;

    Ok(Json(link.into()))
}

/// Rotation history of one of the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links/{id}/logs?page=1&page_size=20`
///
/// # Errors
///
/// Returns 404 if the link does not exist or belongs to another user.
pub async fn link_logs_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<RunLogListResponse>, AppError> {
    let page = page_from(&params)?;

    let (items, total) = state
        .link_service
        .logs(id, claims.user_id(), page.limit(), page.offset())
        .await?;

    Ok(Json(RunLogListResponse {
        link_id: id,
        items: items.into_iter().map(Into::into).collect(),
        pagination: page.meta(total),
    }))
}
