//! Handlers for landing domain pool endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::domain::{
    CreateDomainRequest, DomainItem, DomainListResponse, UpdateDomainRequest,
};
use crate::domain::entities::UpdateDomain;
use crate::error::AppError;
use crate::state::AppState;

/// Lists active domains in the order rotation will pick them.
///
/// # Endpoint
///
/// `GET /api/domains`
pub async fn domain_list_handler(
    State(state): State<AppState>,
) -> Result<Json<DomainListResponse>, AppError> {
    let domains = state.domain_service.list_domains(true).await?;

    Ok(Json(DomainListResponse {
        items: domains.into_iter().map(DomainItem::from).collect(),
    }))
}

/// Adds a domain to the pool. Admin only.
///
/// # Endpoint
///
/// `POST /api/domains`
///
/// ```json
/// { "hostname": "lp3.example.com", "referer_override": "https://news.example.com" }
/// ```
///
/// # Errors
///
/// Returns 400 if the hostname is invalid.
/// Returns 409 if the domain already exists.
pub async fn create_domain_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateDomainRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DomainItem>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let domain = state
        .domain_service
        .create_domain(payload.hostname, payload.referer_override)
        .await?;

    Ok((StatusCode::CREATED, Json(domain.into())))
}

/// Activates/deactivates a domain or changes its referer override. Admin only.
///
/// # Endpoint
///
/// `PATCH /api/domains/{id}`
///
/// `referer_override: null` clears the override.
///
/// # Errors
///
/// Returns 400 if the body changes nothing.
/// Returns 404 if the domain is not found.
pub async fn update_domain_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateDomainRequest>, JsonRejection>,
) -> Result<Json<DomainItem>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let update = UpdateDomain {
        status: payload.status,
        referer_override: payload.referer_override,
    };

    let domain = state.domain_service.update_domain(id, update).await?;

    Ok(Json(domain.into()))
}
