//! Password login and JWT session tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{ADMIN_ROLE, Menu, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub username: String,
    /// Role names at login time.
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] unless the token carries the admin role.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Admin role required",
                json!({"username": self.username}),
            ))
        }
    }
}

/// A user together with the roles and menus granted to them.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub roles: Vec<Role>,
    pub menus: Vec<Menu>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: UserProfile,
}

/// Authenticates accounts and issues/validates HS256 session tokens.
pub struct AuthService<U: UserRepository> {
    repository: Arc<U>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl<U: UserRepository> AuthService<U> {
    /// # Arguments
    ///
    /// - `repository` - credential store
    /// - `secret` - HMAC key for signing tokens
    /// - `ttl_hours` - token lifetime
    pub fn new(repository: Arc<U>, secret: &str, ttl_hours: i64) -> Self {
        Self {
            repository,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::hours(ttl_hours),
        }
    }

    /// Checks credentials and issues a token.
    ///
    /// Unknown usernames and wrong passwords produce the same error. Disabled
    /// accounts are rejected after the password check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on bad credentials or a disabled account.
    /// Returns [`AppError::Internal`] on database or hashing errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                tracing::info!(username = %username, "Login rejected: unknown user");
                AppError::unauthorized(INVALID_CREDENTIALS, json!({}))
            })?;

        let matches = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "Stored password hash is unusable");
            AppError::internal("Password verification failed", json!({}))
        })?;

        if !matches {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        }

        if !user.is_active() {
            tracing::info!(user_id = user.id, "Login rejected: account disabled");
            return Err(AppError::unauthorized(
                "Account is disabled",
                json!({"status": user.status}),
            ));
        }

        let profile = self.load_profile(user).await?;
        let (token, expires_at) = self.issue_token(&profile.user, &profile.roles)?;

        if let Err(e) = self.repository.touch_last_login(profile.user.id).await {
            tracing::warn!(user_id = profile.user.id, error = %e, "Failed to record last login");
        }

        tracing::info!(user_id = profile.user.id, "User logged in");

        Ok(LoginOutcome {
            token,
            expires_at,
            profile,
        })
    }

    /// Loads the current profile for the token's subject.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the account no longer exists or is disabled.
    pub async fn profile(&self, claims: &Claims) -> Result<UserProfile, AppError> {
        let user = self
            .repository
            .find_by_id(claims.user_id())
            .await?
            .filter(User::is_active)
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Account is no longer available",
                    json!({"user_id": claims.user_id()}),
                )
            })?;

        self.load_profile(user).await
    }

    /// Decodes and validates a bearer token (signature and expiry).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for malformed, forged or expired tokens.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::unauthorized("Invalid or expired token", json!({}))
            })
    }

    fn issue_token(&self, user: &User, roles: &[Role]) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            roles: roles.iter().map(|r| r.name.clone()).collect(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token", json!({}))
        })?;

        Ok((token, expires_at))
    }

    async fn load_profile(&self, user: User) -> Result<UserProfile, AppError> {
        let roles = self.repository.roles_for_user(user.id).await?;
        let menus = self.repository.menus_for_user(user.id).await?;

        Ok(UserProfile { user, roles, menus })
    }
}
