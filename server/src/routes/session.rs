//! Session query route.
//!
//! DESIGN
//! ======
//! The browser never sees the refresh token; it asks this endpoint for the
//! current session and gets back the access token + user, or `null`. An
//! expired access token is refreshed here transparently, once, before the
//! endpoint gives up and reports an anonymous session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use feed::{Identity, Session, SessionEnvelope};

use crate::routes::auth::{
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, cookie_secure, expired_cookie, session_cookies,
};
use crate::services::identity;
use crate::state::AppState;

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Envelope for a live session.
pub(crate) fn envelope_for(access_token: &str, user: Identity) -> SessionEnvelope {
    SessionEnvelope {
        session: Some(Session { access_token: access_token.to_owned(), user }),
    }
}

/// Envelope for an anonymous visitor.
pub(crate) fn anonymous_envelope() -> SessionEnvelope {
    SessionEnvelope { session: None }
}

/// `GET /api/session` — the current session as JSON, or `null`.
pub async fn current_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(config) = &state.service else {
        return (StatusCode::SERVICE_UNAVAILABLE, "identity service not configured").into_response();
    };

    let access = jar
        .get(ACCESS_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();
    if access.is_empty() {
        return Json(anonymous_envelope()).into_response();
    }

    match identity::fetch_session_user(config, &state.http, &access).await {
        Ok(Some(user)) => Json(envelope_for(&access, user)).into_response(),
        Ok(None) => refresh_or_anonymous(config, &state, &jar).await,
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// The access token is dead; try the refresh token once, otherwise answer
/// anonymous and clear both cookies.
async fn refresh_or_anonymous(
    config: &identity::ServiceConfig,
    state: &AppState,
    jar: &CookieJar,
) -> Response {
    let secure = cookie_secure();
    let cleared = CookieJar::new()
        .add(expired_cookie(ACCESS_COOKIE_NAME, secure))
        .add(expired_cookie(REFRESH_COOKIE_NAME, secure));

    let refresh = jar
        .get(REFRESH_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();
    if refresh.is_empty() {
        return (cleared, Json(anonymous_envelope())).into_response();
    }

    match identity::refresh_session(config, &state.http, &refresh).await {
        Ok(grant) => {
            let (access, refresh) = session_cookies(&grant, secure);
            let jar = CookieJar::new().add(access).add(refresh);
            let envelope = envelope_for(&grant.access_token, grant.user.clone());
            (jar, Json(envelope)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "session refresh failed, clearing cookies");
            (cleared, Json(anonymous_envelope())).into_response()
        }
    }
}
