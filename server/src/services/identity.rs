//! Identity & Data Service client — OAuth code exchange, session lookup,
//! refresh, and sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosted service owns authentication, storage, and fan-out. This module
//! speaks its auth surface over HTTPS; the rest of the server never touches
//! tokens except to move them between this module and cookies.

use feed::Identity;

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

/// Identity service configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the hosted service, without a trailing slash.
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    pub anon_key: String,
}

impl ServiceConfig {
    /// Load from `IDENTITY_SERVICE_URL` and `IDENTITY_SERVICE_ANON_KEY`.
    /// Returns `None` if either is missing (sign-in will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("IDENTITY_SERVICE_URL").ok()?;
        let anon_key = std::env::var("IDENTITY_SERVICE_ANON_KEY").ok()?;
        Some(Self { url: url.trim_end_matches('/').to_owned(), anon_key })
    }

    /// Build the OAuth authorization URL the browser is sent to.
    #[must_use]
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={provider}&redirect_to={redirect_to}",
            self.url
        )
    }

    fn token_endpoint(&self) -> String {
        format!("{}/auth/v1/token", self.url)
    }

    fn user_endpoint(&self) -> String {
        format!("{}/auth/v1/user", self.url)
    }

    fn logout_endpoint(&self) -> String {
        format!("{}/auth/v1/logout", self.url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The service answered the token request with a rejection.
    #[error("token exchange rejected: {0}")]
    ExchangeRejected(String),
    /// The service could not be reached or dropped the connection.
    #[error("identity service transport error: {0}")]
    Transport(String),
    /// The service answered with something outside its documented contract.
    #[error("unexpected identity service response: {0}")]
    UnexpectedResponse(String),
}

/// Access + refresh tokens and the user they belong to, as granted by the
/// service's token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Identity,
}

pub(crate) fn code_grant_body(code: &str) -> serde_json::Value {
    serde_json::json!({
        "grant_type": "authorization_code",
        "code": code,
    })
}

pub(crate) fn refresh_grant_body(refresh_token: &str) -> serde_json::Value {
    serde_json::json!({
        "grant_type": "refresh_token",
        "refresh_token": refresh_token,
    })
}

async fn request_grant(
    config: &ServiceConfig,
    http: &reqwest::Client,
    body: serde_json::Value,
) -> Result<TokenGrant, IdentityError> {
    let resp = http
        .post(config.token_endpoint())
        .header("apikey", &config.anon_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| IdentityError::Transport(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(IdentityError::ExchangeRejected(format!("{status}: {body}")));
    }

    resp.json::<TokenGrant>()
        .await
        .map_err(|e| IdentityError::UnexpectedResponse(e.to_string()))
}

/// Exchange an OAuth authorization code for a token grant.
///
/// # Errors
///
/// `ExchangeRejected` when the service refuses the code; `Transport` /
/// `UnexpectedResponse` when the call itself fails.
pub async fn exchange_code(
    config: &ServiceConfig,
    http: &reqwest::Client,
    code: &str,
) -> Result<TokenGrant, IdentityError> {
    request_grant(config, http, code_grant_body(code)).await
}

/// Trade a refresh token for a fresh token grant.
///
/// # Errors
///
/// Same taxonomy as [`exchange_code`].
pub async fn refresh_session(
    config: &ServiceConfig,
    http: &reqwest::Client,
    refresh_token: &str,
) -> Result<TokenGrant, IdentityError> {
    request_grant(config, http, refresh_grant_body(refresh_token)).await
}

/// Look up the user behind an access token. Returns `Ok(None)` when the
/// token is expired or revoked (a normal condition, not an error).
///
/// # Errors
///
/// Returns an error if the service cannot be reached or answers outside its
/// contract.
pub async fn fetch_session_user(
    config: &ServiceConfig,
    http: &reqwest::Client,
    access_token: &str,
) -> Result<Option<Identity>, IdentityError> {
    let resp = http
        .get(config.user_endpoint())
        .header("apikey", &config.anon_key)
        .header("Authorization", format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(|e| IdentityError::Transport(e.to_string()))?;

    if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Ok(None);
    }
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(IdentityError::UnexpectedResponse(format!("{status}: {body}")));
    }

    resp.json::<Identity>()
        .await
        .map(Some)
        .map_err(|e| IdentityError::UnexpectedResponse(e.to_string()))
}

/// Terminate the session behind an access token on the service side.
///
/// # Errors
///
/// Returns an error if the service cannot be reached or rejects the call.
pub async fn sign_out(
    config: &ServiceConfig,
    http: &reqwest::Client,
    access_token: &str,
) -> Result<(), IdentityError> {
    let resp = http
        .post(config.logout_endpoint())
        .header("apikey", &config.anon_key)
        .header("Authorization", format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(|e| IdentityError::Transport(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(IdentityError::UnexpectedResponse(resp.status().to_string()));
    }
    Ok(())
}
