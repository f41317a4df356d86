//! Landing domain pool management.

use crate::domain::entities::{Domain, NewDomain, UpdateDomain};
use crate::domain::repositories::DomainRepository;
use crate::error::AppError;
use crate::utils::url_check::{is_valid_hostname, parse_http_url};
use serde_json::json;
use std::sync::Arc;

/// Service for managing the pool of landing domains used by rotation.
///
/// Domains are never deleted: usage history must survive, so retiring a
/// domain means deactivating it.
pub struct DomainService<R: DomainRepository> {
    repository: Arc<R>,
}

impl<R: DomainRepository> DomainService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Adds a domain to the pool (active, never used).
    ///
    /// The hostname is lowercased. A referer override, when given, must be an
    /// absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the hostname or referer is malformed.
    /// Returns [`AppError::Conflict`] if the hostname is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_domain(
        &self,
        hostname: String,
        referer_override: Option<String>,
    ) -> Result<Domain, AppError> {
        let hostname = hostname.trim().to_lowercase();
        validate_hostname(&hostname)?;
        let referer_override = normalize_referer(referer_override)?;

        if self.repository.find_by_hostname(&hostname).await?.is_some() {
            return Err(AppError::conflict(
                "Domain already exists",
                json!({"hostname": hostname}),
            ));
        }

        let domain = self
            .repository
            .create(NewDomain {
                hostname,
                referer_override,
            })
            .await?;

        tracing::info!(domain_id = domain.id, domain = %domain.hostname, "Domain added to pool");
        Ok(domain)
    }

    /// Lists domains in selection order.
    pub async fn list_domains(&self, only_active: bool) -> Result<Vec<Domain>, AppError> {
        self.repository.list(only_active).await
    }

    /// Activates/deactivates a domain or changes its referer override.
    ///
    /// `referer_override: Some(None)` clears the override.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty update or malformed referer.
    /// Returns [`AppError::NotFound`] if the domain does not exist.
    pub async fn update_domain(
        &self,
        domain_id: i64,
        mut update: UpdateDomain,
    ) -> Result<Domain, AppError> {
        if update.status.is_none() && update.referer_override.is_none() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({"fields": ["status", "referer_override"]}),
            ));
        }

        if let Some(referer) = update.referer_override.take() {
            update.referer_override = Some(normalize_referer(referer)?);
        }

        let domain = self.repository.update(domain_id, update).await?;
        tracing::info!(
            domain_id = domain.id,
            domain = %domain.hostname,
            status = %domain.status,
            "Domain updated"
        );

        Ok(domain)
    }
}

fn validate_hostname(hostname: &str) -> Result<(), AppError> {
    if !is_valid_hostname(hostname) {
        return Err(AppError::bad_request(
            "Invalid domain name",
            json!({
                "hostname": hostname,
                "hint": "Use a bare hostname such as lp1.example.com"
            }),
        ));
    }

    Ok(())
}

fn normalize_referer(referer: Option<String>) -> Result<Option<String>, AppError> {
    let Some(referer) = referer
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
    else {
        return Ok(None);
    };

    parse_http_url(&referer).map_err(|e| {
        AppError::bad_request(
            "Invalid referer override",
            json!({"reason": e.to_string()}),
        )
    })?;

    Ok(Some(referer))
}
