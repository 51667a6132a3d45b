//! Auth routes — OAuth callback, sign-out, client configuration.
//!
//! The OAuth handshake itself happens between the browser, the provider, and
//! the identity service; this module only lands the redirect, trades the code
//! for tokens, and parks those tokens in HttpOnly cookies.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::services::identity::{self, IdentityError, TokenGrant};
use crate::state::AppState;

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

pub(crate) const ACCESS_COOKIE_NAME: &str = "access_token";
pub(crate) const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Refresh tokens outlive the browser session; access cookies do not.
const REFRESH_COOKIE_MAX_AGE: Duration = Duration::days(30);

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_ORIGIN")
        .map(|origin| origin.starts_with("https://"))
        .unwrap_or(false)
}

// =============================================================================
// COOKIE CONSTRUCTION
// =============================================================================

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Access + refresh cookies for a fresh token grant.
pub(crate) fn session_cookies(grant: &TokenGrant, secure: bool) -> (Cookie<'static>, Cookie<'static>) {
    let access = token_cookie(ACCESS_COOKIE_NAME, grant.access_token.clone(), secure);
    let refresh = Cookie::build((REFRESH_COOKIE_NAME, grant.refresh_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(REFRESH_COOKIE_MAX_AGE)
        .build();
    (access, refresh)
}

/// An immediately-expiring cookie that clears `name` in the browser.
pub(crate) fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Home redirect target carrying an OAuth error code for the client to map.
pub(crate) fn home_with_error(code: &str) -> String {
    format!("/?error={code}")
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

/// `GET /auth/callback` — land the provider redirect.
///
/// `error` present → bounce home with the code attached. `code` present →
/// exchange it for tokens; a service rejection becomes `exchange_failed`, any
/// other failure `unexpected`. Neither parameter → bounce home unchanged.
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if let Some(code) = params.error.as_deref() {
        tracing::warn!(code, "oauth provider returned an error");
        return Redirect::temporary(&home_with_error(code)).into_response();
    }

    let Some(code) = params.code.as_deref() else {
        return Redirect::temporary("/").into_response();
    };

    let Some(config) = &state.service else {
        tracing::error!("oauth callback received but identity service is not configured");
        return Redirect::temporary(&home_with_error("unexpected")).into_response();
    };

    match identity::exchange_code(config, &state.http, code).await {
        Ok(grant) => {
            let secure = cookie_secure();
            let (access, refresh) = session_cookies(&grant, secure);
            let jar = jar.add(access).add(refresh);
            tracing::info!(user = %grant.user.email, "oauth code exchanged");
            (jar, Redirect::temporary("/")).into_response()
        }
        Err(IdentityError::ExchangeRejected(reason)) => {
            tracing::error!(%reason, "oauth code exchange rejected");
            Redirect::temporary(&home_with_error("exchange_failed")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "oauth code exchange failed");
            Redirect::temporary(&home_with_error("unexpected")).into_response()
        }
    }
}

/// `POST /api/auth/logout` — terminate the service session, clear cookies.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let token = jar
        .get(ACCESS_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();

    if let Some(config) = &state.service {
        if !token.is_empty() {
            // Best effort: local sign-out proceeds even if the service call fails.
            let _ = identity::sign_out(config, &state.http, &token).await;
        }
    }

    let secure = cookie_secure();
    let jar = CookieJar::new()
        .add(expired_cookie(ACCESS_COOKIE_NAME, secure))
        .add(expired_cookie(REFRESH_COOKIE_NAME, secure));
    (jar, StatusCode::NO_CONTENT)
}

/// Public service configuration handed to the WASM client.
#[derive(Serialize)]
pub struct ClientConfig {
    pub url: String,
    pub anon_key: String,
}

/// `GET /api/config` — identity service location + public key, or 503 when
/// the deployment is missing its configuration.
pub async fn client_config(State(state): State<AppState>) -> Response {
    match &state.service {
        Some(config) => Json(ClientConfig {
            url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        })
        .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "identity service not configured").into_response(),
    }
}
