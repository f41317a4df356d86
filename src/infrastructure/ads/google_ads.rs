//! Google Ads REST client for rewriting campaign tracking templates.
//!
//! Flow per update: refresh an OAuth2 access token (cached until shortly
//! before expiry), look the campaign up by exact name with a GAQL search, then
//! issue a `campaigns:mutate` that only touches `tracking_url_template`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::campaign::{CampaignTarget, CampaignUpdateResult, CampaignUpdater};

const GOOGLE_ADS_API_BASE: &str = "https://googleads.googleapis.com";
const GOOGLE_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Access tokens are treated as expired this long before Google says so.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long a refreshed access token is cached.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdsError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Google Ads API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Campaign '{0}' not found")]
    CampaignNotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AdsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdsError::Transport(format!("request timed out: {e}"))
        } else if e.is_decode() {
            AdsError::MalformedResponse(e.to_string())
        } else {
            AdsError::Transport(e.to_string())
        }
    }
}

/// OAuth client and developer credentials.
#[derive(Clone)]
pub struct GoogleAdsCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub developer_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for GoogleAdsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdsCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("developer_token", &"<REDACTED>")
            .field("refresh_token", &"<REDACTED>")
            .finish()
    }
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRow {
    resource_name: String,
    #[serde(default)]
    tracking_url_template: Option<String>,
}

/// Live client for the Google Ads REST API.
pub struct GoogleAdsClient {
    http: reqwest::Client,
    credentials: GoogleAdsCredentials,
    api_version: String,
    api_base: String,
    token_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for GoogleAdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdsClient")
            .field("credentials", &self.credentials)
            .field("api_version", &self.api_version)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GoogleAdsClient {
    /// Builds a client against the public Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`AdsError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        credentials: GoogleAdsCredentials,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AdsError> {
        Self::with_endpoints(
            credentials,
            api_version,
            timeout,
            GOOGLE_ADS_API_BASE,
            GOOGLE_OAUTH_TOKEN_URL,
        )
    }

    /// Same as [`GoogleAdsClient::new`] with explicit API and token endpoints.
    pub fn with_endpoints(
        credentials: GoogleAdsCredentials,
        api_version: impl Into<String>,
        timeout: Duration,
        api_base: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self, AdsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdsError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            api_version: api_version.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            token: Mutex::new(None),
        })
    }

    /// Returns a valid access token, refreshing it when missing or about to expire.
    async fn access_token(&self) -> Result<String, AdsError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.expires_at
        {
            return Ok(token.value.clone());
        }

        tracing::debug!("Refreshing Google Ads access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdsError::Auth(format!(
                "token refresh rejected with status {status}: {}",
                extract_error_message(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AdsError::Auth(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in)
            .min(MAX_TOKEN_LIFETIME)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    async fn post_api(
        &self,
        customer_id: &str,
        login_customer_id: Option<&str>,
        method: &str,
        body: Value,
    ) -> Result<Value, AdsError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/customers/{}/{}",
            self.api_base, self.api_version, customer_id, method
        );

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("developer-token", &self.credentials.developer_token)
            .json(&body);

        if let Some(login) = login_customer_id {
            request = request.header("login-customer-id", login);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(status, &text));
        }

        Ok(response.json().await?)
    }

    async fn find_campaign(
        &self,
        customer_id: &str,
        login_customer_id: Option<&str>,
        campaign_name: &str,
    ) -> Result<CampaignRow, AdsError> {
        let body = json!({ "query": campaign_query(campaign_name) });
        let response = self
            .post_api(customer_id, login_customer_id, "googleAds:search", body)
            .await?;

        let Some(first) = response
            .get("results")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
        else {
            return Err(AdsError::CampaignNotFound(campaign_name.to_string()));
        };

        let campaign = first
            .get("campaign")
            .cloned()
            .ok_or_else(|| AdsError::MalformedResponse("result has no campaign".to_string()))?;

        serde_json::from_value(campaign).map_err(|e| AdsError::MalformedResponse(e.to_string()))
    }

    async fn try_update(
        &self,
        target: &CampaignTarget,
        new_url: &str,
    ) -> Result<Option<String>, AdsError> {
        let customer_id = normalize_customer_id(&target.ads_account_id);
        let login_customer_id = target
            .mcc_account_id
            .as_deref()
            .map(normalize_customer_id)
            .filter(|id| !id.is_empty());

        let campaign = self
            .find_campaign(&customer_id, login_customer_id.as_deref(), &target.campaign_name)
            .await?;

        let body = mutate_body(&campaign.resource_name, new_url);
        self.post_api(
            &customer_id,
            login_customer_id.as_deref(),
            "campaigns:mutate",
            body,
        )
        .await?;

        Ok(campaign.tracking_url_template)
    }
}

#[async_trait]
impl CampaignUpdater for GoogleAdsClient {
    async fn update_tracking_template(
        &self,
        target: &CampaignTarget,
        new_url: &str,
    ) -> CampaignUpdateResult {
        match self.try_update(target, new_url).await {
            Ok(old_template) => {
                tracing::info!(
                    campaign = %target.campaign_name,
                    account = %target.ads_account_id,
                    "Tracking template updated"
                );
                CampaignUpdateResult::succeeded(
                    old_template,
                    new_url,
                    format!(
                        "Successfully updated tracking template for campaign {}",
                        target.campaign_name
                    ),
                )
            }
            Err(e) => {
                tracing::warn!(
                    campaign = %target.campaign_name,
                    account = %target.ads_account_id,
                    error = %e,
                    "Tracking template update failed"
                );
                CampaignUpdateResult::failed(format!(
                    "Failed to update campaign {}: {e}",
                    target.campaign_name
                ))
            }
        }
    }

    fn mode(&self) -> &'static str {
        "live"
    }
}

/// Strips dashes and whitespace from a customer id ("123-456-7890" -> "1234567890").
pub fn normalize_customer_id(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Escapes a value for a single-quoted GAQL string literal.
fn escape_gaql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn campaign_query(campaign_name: &str) -> String {
    format!(
        "SELECT campaign.resource_name, campaign.id, campaign.name, campaign.tracking_url_template \
         FROM campaign WHERE campaign.name = '{}' AND campaign.status != 'REMOVED'",
        escape_gaql(campaign_name)
    )
}

fn mutate_body(resource_name: &str, new_url: &str) -> Value {
    json!({
        "operations": [{
            "updateMask": "tracking_url_template",
            "update": {
                "resourceName": resource_name,
                "trackingUrlTemplate": new_url,
            }
        }]
    })
}

/// Pulls `error.message` out of a Google error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error_description"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

fn map_status(status: StatusCode, body: &str) -> AdsError {
    let message = extract_error_message(body);

    match status.as_u16() {
        401 | 403 => AdsError::Auth(format!(
            "invalid credentials or insufficient permissions ({status}): {message}"
        )),
        429 => AdsError::Api {
            status: 429,
            message: format!("rate limit exceeded: {message}"),
        },
        500..=599 => AdsError::Api {
            status: status.as_u16(),
            message: format!("server error (transient): {message}"),
        },
        code => AdsError::Api { status: code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::HeaderMap,
        routing::post,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn credentials() -> GoogleAdsCredentials {
        GoogleAdsCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            developer_token: "dev-token".to_string(),
            refresh_token: "refresh-token".to_string(),
        }
    }

    fn target(name: &str) -> CampaignTarget {
        CampaignTarget {
            ads_account_id: "111-222-3333".to_string(),
            mcc_account_id: Some("999-888-7777".to_string()),
            campaign_name: name.to_string(),
        }
    }

    #[derive(Default)]
    struct FakeAds {
        token_calls: AtomicUsize,
        mutate_calls: AtomicUsize,
        reject_token: bool,
        token_expires_in: Option<u64>,
        seen_headers: std::sync::Mutex<Vec<(String, String)>>,
        last_mutate: std::sync::Mutex<Option<Value>>,
    }

    async fn token_handler(
        State(fake): State<Arc<FakeAds>>,
        body: String,
    ) -> (StatusCode, Json<Value>) {
        fake.token_calls.fetch_add(1, Ordering::SeqCst);
        let is_refresh_grant = url::form_urlencoded::parse(body.as_bytes())
            .any(|(k, v)| k == "grant_type" && v == "refresh_token");
        if fake.reject_token || !is_refresh_grant {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "invalid_grant", "error_description": "Token has been revoked"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-1",
                "expires_in": fake.token_expires_in.unwrap_or(3599),
                "token_type": "Bearer"
            })),
        )
    }

    async fn api_handler(
        State(fake): State<Arc<FakeAds>>,
        Path((_version, customer, method)): Path<(String, String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        {
            let mut seen = fake.seen_headers.lock().unwrap();
            for name in ["authorization", "developer-token", "login-customer-id"] {
                if let Some(v) = headers.get(name) {
                    seen.push((name.to_string(), v.to_str().unwrap().to_string()));
                }
            }
        }

        if customer != "1112223333" {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": {"code": 403, "message": "User doesn't have permission"}})),
            );
        }

        match method.as_str() {
            "googleAds:search" => {
                let query = body["query"].as_str().unwrap_or_default();
                if query.contains("campaign.name = 'Spring Sale'") {
                    let live = json!({"campaign": {
                        "resourceName": "customers/1112223333/campaigns/42",
                        "id": "42",
                        "name": "Spring Sale",
                        "trackingUrlTemplate": "https://old.example.com/t"
                    }});
                    let removed = json!({"campaign": {
                        "resourceName": "customers/1112223333/campaigns/41",
                        "id": "41",
                        "name": "Spring Sale",
                        "trackingUrlTemplate": "https://removed.example.com/t"
                    }});
                    let results = if query.contains("campaign.status != 'REMOVED'") {
                        vec![live]
                    } else {
                        vec![removed, live]
                    };
                    (StatusCode::OK, Json(json!({ "results": results })))
                } else {
                    (StatusCode::OK, Json(json!({})))
                }
            }
            "campaigns:mutate" => {
                fake.mutate_calls.fetch_add(1, Ordering::SeqCst);
                *fake.last_mutate.lock().unwrap() = Some(body);
                (
                    StatusCode::OK,
                    Json(json!({"results": [{"resourceName": "customers/1112223333/campaigns/42"}]})),
                )
            }
            _ => (StatusCode::NOT_FOUND, Json(json!({}))),
        }
    }

    async fn spawn_fake(fake: Arc<FakeAds>) -> String {
        let app = Router::new()
            .route("/token", post(token_handler))
            .route("/{version}/customers/{customer}/{method}", post(api_handler))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn client_for(fake: Arc<FakeAds>) -> GoogleAdsClient {
        let base = spawn_fake(fake).await;
        GoogleAdsClient::with_endpoints(
            credentials(),
            "v17",
            Duration::from_secs(5),
            base.clone(),
            format!("{base}/token"),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_customer_id() {
        assert_eq!(normalize_customer_id("123-456-7890"), "1234567890");
        assert_eq!(normalize_customer_id(" 1234567890 "), "1234567890");
    }

    #[test]
    fn test_campaign_query_escapes_quotes() {
        let query = campaign_query("Bob's \\ Sale");
        assert!(query.contains("WHERE campaign.name = 'Bob\\'s \\\\ Sale'"));
        assert!(query.ends_with("AND campaign.status != 'REMOVED'"));
        assert!(query.contains("campaign.tracking_url_template"));
    }

    #[test]
    fn test_mutate_body_shape() {
        let body = mutate_body("customers/1/campaigns/2", "https://r.example.com/x");
        assert_eq!(body["operations"][0]["updateMask"], "tracking_url_template");
        assert_eq!(
            body["operations"][0]["update"]["resourceName"],
            "customers/1/campaigns/2"
        );
        assert_eq!(
            body["operations"][0]["update"]["trackingUrlTemplate"],
            "https://r.example.com/x"
        );
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            AdsError::Auth(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, ""),
            AdsError::Api { status: 429, .. }
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, ""),
            AdsError::Api { status: 502, .. }
        ));
        let err = map_status(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 400, "message": "Invalid tracking template"}}"#,
        );
        assert_eq!(
            err,
            AdsError::Api {
                status: 400,
                message: "Invalid tracking template".to_string()
            }
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let client = GoogleAdsClient::new(credentials(), "v17", Duration::from_secs(5)).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("<REDACTED>"));
        assert!(!debug.contains("client-secret"));
        assert!(!debug.contains("refresh-token"));
        assert!(!debug.contains("dev-token"));
    }

    #[tokio::test]
    async fn test_update_success_reports_old_template() {
        let fake = Arc::new(FakeAds::default());
        let client = client_for(fake.clone()).await;

        let result = client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/new")
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.old_template.as_deref(), Some("https://old.example.com/t"));
        assert_eq!(result.new_template.as_deref(), Some("https://r.example.com/new"));
        assert_eq!(fake.mutate_calls.load(Ordering::SeqCst), 1);

        let mutate = fake.last_mutate.lock().unwrap().clone().unwrap();
        assert_eq!(
            mutate["operations"][0]["update"]["trackingUrlTemplate"],
            "https://r.example.com/new"
        );
        assert_eq!(
            mutate["operations"][0]["update"]["resourceName"],
            "customers/1112223333/campaigns/42"
        );

        let headers = fake.seen_headers.lock().unwrap().clone();
        assert!(headers.contains(&("authorization".to_string(), "Bearer access-1".to_string())));
        assert!(headers.contains(&("developer-token".to_string(), "dev-token".to_string())));
        assert!(headers.contains(&("login-customer-id".to_string(), "9998887777".to_string())));
    }

    #[tokio::test]
    async fn test_access_token_is_cached() {
        let fake = Arc::new(FakeAds::default());
        let client = client_for(fake.clone()).await;

        client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/1")
            .await;
        client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/2")
            .await;

        assert_eq!(fake.token_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fake.mutate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_huge_token_lifetime_is_clamped() {
        let fake = Arc::new(FakeAds {
            token_expires_in: Some(u64::MAX),
            ..Default::default()
        });
        let client = client_for(fake.clone()).await;

        let result = client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/1")
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(fake.token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_campaign_not_found_is_failed_result() {
        let fake = Arc::new(FakeAds::default());
        let client = client_for(fake.clone()).await;

        let result = client
            .update_tracking_template(&target("Unknown"), "https://r.example.com/x")
            .await;

        assert!(!result.success);
        assert!(result.message.contains("Campaign 'Unknown' not found"));
        assert_eq!(fake.mutate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_refresh_failure_is_failed_result() {
        let fake = Arc::new(FakeAds {
            reject_token: true,
            ..Default::default()
        });
        let client = client_for(fake.clone()).await;

        let result = client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/x")
            .await;

        assert!(!result.success);
        assert!(result.message.contains("Token has been revoked"));
    }

    #[tokio::test]
    async fn test_permission_denied_is_failed_result() {
        let fake = Arc::new(FakeAds::default());
        let client = client_for(fake.clone()).await;

        let mut other = target("Spring Sale");
        other.ads_account_id = "555-555-5555".to_string();
        let result = client
            .update_tracking_template(&other, "https://r.example.com/x")
            .await;

        assert!(!result.success);
        assert!(result.message.contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_failed_result() {
        let client = GoogleAdsClient::with_endpoints(
            credentials(),
            "v17",
            Duration::from_secs(2),
            "http://127.0.0.1:9",
            "http://127.0.0.1:9/token",
        )
        .unwrap();

        let result = client
            .update_tracking_template(&target("Spring Sale"), "https://r.example.com/x")
            .await;

        assert!(!result.success);
        assert_eq!(client.mode(), "live");
    }
}
