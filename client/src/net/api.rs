//! REST API helpers for communicating with the glue server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics so session/config fetch
//! failures degrade into UI states without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use feed::Session;
#[cfg(any(test, feature = "hydrate"))]
use feed::SessionEnvelope;
use serde::Deserialize;

/// Public Identity & Data Service configuration as served by `/api/config`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the hosted service.
    pub url: String,
    /// Public (anonymous) API key.
    pub anon_key: String,
}

#[cfg(any(test, feature = "hydrate"))]
fn config_request_failed_message(status: u16) -> String {
    format!("config request failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn session_request_failed_message(status: u16) -> String {
    format!("session request failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn logout_request_failed_message(status: u16) -> String {
    format!("logout request failed: {status}")
}

/// Fetch the service configuration from `/api/config`.
///
/// # Errors
///
/// Returns an error string if the deployment has no service configured or
/// the request fails — the caller turns this into the terminal
/// configuration-failure state.
pub async fn fetch_client_config() -> Result<ClientConfig, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/config")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(config_request_failed_message(resp.status()));
        }
        resp.json::<ClientConfig>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Fetch the current session from `/api/session`. `Ok(None)` means nobody is
/// signed in.
///
/// # Errors
///
/// Returns an error string if the request fails or the envelope cannot be
/// decoded.
pub async fn fetch_session() -> Result<Option<Session>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/session")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(session_request_failed_message(resp.status()));
        }
        let envelope: SessionEnvelope = resp.json().await.map_err(|e| e.to_string())?;
        Ok(envelope.session)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Terminate the session via `POST /api/auth/logout`.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn logout() -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(logout_request_failed_message(resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}
