//! The capability interface the UI needs from the Identity & Data Service.
//!
//! DESIGN
//! ======
//! Components never touch a concrete network client; they call these
//! operations on an explicitly constructed implementation. The browser build
//! wires in [`crate::net::http::HttpService`]; tests wire in
//! [`test_double::FakeService`] and never open a socket.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use feed::{Bookmark, ChangeEvent, Identity, NewBookmark, Session};

/// Callback receiving change-feed events for a subscribed owner.
pub type ChangeHandler = Rc<dyn Fn(ChangeEvent)>;

/// Callback receiving session-change notifications.
pub type SessionHandler = Rc<dyn Fn(Option<Identity>)>;

/// Handle for an active subscription.
///
/// `unsubscribe` stops future callback delivery; it does not abort network
/// work already in flight. Dropping the handle without calling it leaves the
/// subscription live for the page lifetime.
#[derive(Clone, Debug)]
pub struct Subscription {
    alive: Arc<AtomicBool>,
}

impl Subscription {
    #[must_use]
    pub fn new(alive: Arc<AtomicBool>) -> Self {
        Self { alive }
    }

    /// Cut off future callback delivery.
    pub fn unsubscribe(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    /// Whether callbacks may still be delivered.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }
}

/// Exactly the service operations the UI uses — session lookup and change
/// notifications, redirect-based sign-in/out, owner-scoped table CRUD, and
/// the owner-filtered change feed.
#[async_trait(?Send)]
pub trait BookmarkService {
    /// The current session, if any.
    async fn current_session(&self) -> Result<Option<Session>, String>;

    /// Register for session-change notifications. Notifications are
    /// delivered in emission order; the caller applies them last-write-wins.
    fn on_session_change(&self, handler: SessionHandler) -> Subscription;

    /// URL of the provider authorization page for a redirect-based sign-in.
    fn sign_in_url(&self, redirect_to: &str) -> String;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<(), String>;

    /// All bookmarks owned by `owner`, newest first.
    async fn list_bookmarks(&self, owner: &str) -> Result<Vec<Bookmark>, String>;

    /// Insert a bookmark owned by `draft.owner`.
    async fn insert_bookmark(&self, draft: &NewBookmark) -> Result<(), String>;

    /// Delete a bookmark by id.
    async fn delete_bookmark(&self, id: &str) -> Result<(), String>;

    /// Subscribe to the change feed filtered to `owner`. Events arrive in
    /// service emission order until the subscription is cancelled.
    fn subscribe_changes(&self, owner: &str, handler: ChangeHandler) -> Subscription;
}

// =============================================================================
// TEST DOUBLE
// =============================================================================
