//! Session-synchronizer state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One value of [`SessionState`] is the single source of truth for "who is
//! signed in". The initial lookup, the OAuth callback landing, and the
//! standing session-change subscription all funnel through it; the last
//! notification always wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use feed::Identity;

/// Message for the terminal configuration-failure state.
pub const CONFIG_FAILURE_MESSAGE: &str =
    "Failed to initialize authentication. Please check the identity service configuration.";

/// Lifecycle of the session synchronizer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Before the synchronizer has started.
    #[default]
    Uninitialized,
    /// Service construction and initial session lookup in flight.
    Loading,
    /// A user is signed in.
    Authenticated(Identity),
    /// Nobody is signed in.
    Anonymous,
    /// The service client could not be constructed. Terminal until the
    /// deployment configuration is fixed.
    ConfigError(String),
}

/// Authentication state: the current phase plus a transient, recoverable
/// notice (OAuth errors, failed sign-out).
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub notice: Option<String>,
}

impl SessionState {
    /// Mark the initial lookup as started.
    pub fn begin_loading(&mut self) {
        self.phase = SessionPhase::Loading;
    }

    /// Apply a session-change notification. The last notification wins,
    /// regardless of the prior phase.
    pub fn apply_change(&mut self, user: Option<Identity>) {
        self.phase = match user {
            Some(user) => SessionPhase::Authenticated(user),
            None => SessionPhase::Anonymous,
        };
    }

    /// Enter the terminal configuration-failure state.
    pub fn fail_configuration(&mut self, message: impl Into<String>) {
        self.phase = SessionPhase::ConfigError(message.into());
    }

    /// Drop the identity without waiting for a change notification
    /// (sign-out path).
    pub fn clear_identity(&mut self) {
        self.phase = SessionPhase::Anonymous;
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&Identity> {
        match &self.phase {
            SessionPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True until the initial lookup has settled one way or the other.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Uninitialized | SessionPhase::Loading)
    }
}

/// Map an OAuth callback error code to a user-facing message. Unknown codes
/// fall back to a generic template so provider-supplied codes still render.
#[must_use]
pub fn oauth_error_message(code: &str) -> String {
    match code {
        "access_denied" => "You denied access to your Google account.".to_owned(),
        "exchange_failed" => "Failed to exchange authentication code. Please try again.".to_owned(),
        "unexpected" => "An unexpected error occurred during login. Please try again.".to_owned(),
        other => format!("Authentication error: {other}"),
    }
}
