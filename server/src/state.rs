//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server owns no storage of its own — every durable fact lives in the
//! external identity service — so the state is just the service configuration
//! plus a shared outbound HTTP client.

use crate::services::identity::ServiceConfig;

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — `reqwest::Client` is internally Arc'd.
#[derive(Clone)]
pub struct AppState {
    /// Identity service configuration. `None` if env vars are not set, in
    /// which case the dependent endpoints answer 503.
    pub service: Option<ServiceConfig>,
    /// Shared outbound HTTP client for identity service calls.
    pub http: reqwest::Client,
}

impl AppState {
    #[must_use]
    pub fn new(service: Option<ServiceConfig>) -> Self {
        Self { service, http: reqwest::Client::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
