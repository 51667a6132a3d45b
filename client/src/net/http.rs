//! Browser implementation of [`BookmarkService`] and its composition root.
//!
//! SYSTEM CONTEXT
//! ==============
//! `HttpService` talks to the glue server for session state and directly to
//! the Identity & Data Service for table CRUD and the realtime change feed.
//! The home page constructs one instance from the fetched configuration and
//! registers it with [`install`]; event handlers reach it through
//! [`active`]. All network paths are gated behind `hydrate`; SSR builds get
//! stubs that report unavailability.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures are translated to strings for the UI; the
//! feed socket reconnects with capped exponential backoff while its
//! subscription is live.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use feed::{Bookmark, Identity, NewBookmark, Session};

use super::api::{self, ClientConfig};
use super::service::{BookmarkService, ChangeHandler, SessionHandler, Subscription};

// =============================================================================
// ENDPOINTS
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
fn rest_url(base: &str) -> String {
    format!("{base}/rest/v1/{}", feed::BOOKMARKS_TABLE)
}

#[cfg(any(test, feature = "hydrate"))]
fn list_url(base: &str, owner: &str) -> String {
    format!("{}?{}&order=created_at.desc", rest_url(base), feed::owner_filter(owner))
}

#[cfg(any(test, feature = "hydrate"))]
fn delete_url(base: &str, id: &str) -> String {
    format!("{}?id=eq.{id}", rest_url(base))
}

fn authorize_url(base: &str, redirect_to: &str) -> String {
    format!("{base}/auth/v1/authorize?provider=google&redirect_to={redirect_to}")
}

/// Realtime websocket address, with the scheme shifted to ws/wss.
#[cfg(any(test, feature = "hydrate"))]
fn socket_url(base: &str, anon_key: &str, access_token: &str) -> String {
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_owned()
    };
    format!("{ws_base}/realtime/v1/websocket?apikey={anon_key}&token={access_token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn fetch_failed_message(status: u16) -> String {
    format!("bookmark fetch failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn delete_failed_message(status: u16) -> String {
    format!("bookmark delete failed: {status}")
}

/// Service rejection bodies are JSON `{"message": ...}`; surface the message
/// verbatim, falling back to the raw body or a status line.
#[cfg(any(test, feature = "hydrate"))]
fn service_error_message(body: &str, status: u16) -> String {
    if body.is_empty() {
        return format!("bookmark insert failed: {status}");
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}

// =============================================================================
// SERVICE
// =============================================================================

/// Browser-side Identity & Data Service client. One instance per page,
/// constructed after the configuration fetch succeeds.
pub struct HttpService {
    config: ClientConfig,
    /// Session last seen by [`BookmarkService::current_session`]; supplies
    /// the bearer token for table and feed access.
    session: RefCell<Option<Session>>,
    session_subs: RefCell<Vec<(Arc<AtomicBool>, SessionHandler)>>,
}

impl HttpService {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config, session: RefCell::new(None), session_subs: RefCell::new(Vec::new()) }
    }

    #[cfg(feature = "hydrate")]
    fn bearer_token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.access_token.clone())
    }

    /// Deliver a session-change notification to live subscribers, pruning
    /// cancelled ones.
    fn emit_session(&self, user: Option<Identity>) {
        let handlers: Vec<SessionHandler> = {
            let mut subs = self.session_subs.borrow_mut();
            subs.retain(|(alive, _)| alive.load(Ordering::Relaxed));
            subs.iter().map(|(_, handler)| Rc::clone(handler)).collect()
        };
        for handler in handlers {
            handler(user.clone());
        }
    }
}

#[async_trait(?Send)]
impl BookmarkService for HttpService {
    async fn current_session(&self) -> Result<Option<Session>, String> {
        let session = api::fetch_session().await?;
        *self.session.borrow_mut() = session.clone();
        Ok(session)
    }

    fn on_session_change(&self, handler: SessionHandler) -> Subscription {
        let alive = Arc::new(AtomicBool::new(true));
        self.session_subs.borrow_mut().push((Arc::clone(&alive), handler));
        Subscription::new(alive)
    }

    fn sign_in_url(&self, redirect_to: &str) -> String {
        authorize_url(&self.config.url, redirect_to)
    }

    async fn sign_out(&self) -> Result<(), String> {
        api::logout().await?;
        *self.session.borrow_mut() = None;
        self.emit_session(None);
        Ok(())
    }

    async fn list_bookmarks(&self, owner: &str) -> Result<Vec<Bookmark>, String> {
        #[cfg(feature = "hydrate")]
        {
            let token = self.bearer_token().ok_or_else(|| "not signed in".to_owned())?;
            let resp = gloo_net::http::Request::get(&list_url(&self.config.url, owner))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &format!("Bearer {token}"))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(fetch_failed_message(resp.status()));
            }
            resp.json::<Vec<Bookmark>>().await.map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = owner;
            Err("not available on server".to_owned())
        }
    }

    async fn insert_bookmark(&self, draft: &NewBookmark) -> Result<(), String> {
        #[cfg(feature = "hydrate")]
        {
            let token = self.bearer_token().ok_or_else(|| "not signed in".to_owned())?;
            let resp = gloo_net::http::Request::post(&rest_url(&self.config.url))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &format!("Bearer {token}"))
                .json(draft)
                .map_err(|e| e.to_string())?
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(service_error_message(&body, status));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = draft;
            Err("not available on server".to_owned())
        }
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), String> {
        #[cfg(feature = "hydrate")]
        {
            let token = self.bearer_token().ok_or_else(|| "not signed in".to_owned())?;
            let resp = gloo_net::http::Request::delete(&delete_url(&self.config.url, id))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &format!("Bearer {token}"))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(delete_failed_message(resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
            Err("not available on server".to_owned())
        }
    }

    fn subscribe_changes(&self, owner: &str, handler: ChangeHandler) -> Subscription {
        let alive = Arc::new(AtomicBool::new(true));
        #[cfg(feature = "hydrate")]
        {
            let config = self.config.clone();
            let access_token = self.bearer_token().unwrap_or_default();
            let owner = owner.to_owned();
            let alive_task = Arc::clone(&alive);
            leptos::task::spawn_local(async move {
                feed_loop(&config, &access_token, &owner, handler, &alive_task).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (owner, handler);
        Subscription::new(alive)
    }
}

// =============================================================================
// FEED SOCKET
// =============================================================================

/// Connection loop: reconnect with capped exponential backoff for as long as
/// the subscription is live.
#[cfg(feature = "hydrate")]
async fn feed_loop(
    config: &ClientConfig,
    access_token: &str,
    owner: &str,
    handler: ChangeHandler,
    alive: &Arc<AtomicBool>,
) {
    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    while alive.load(Ordering::Relaxed) {
        match run_feed_socket(config, access_token, owner, &handler, alive).await {
            Ok(()) => leptos::logging::log!("feed socket closed"),
            Err(e) => leptos::logging::warn!("feed socket error: {e}"),
        }
        if !alive.load(Ordering::Relaxed) {
            break;
        }
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}

/// Open the socket, send the owner-filtered subscribe message, and deliver
/// decoded events until disconnect or cancellation.
#[cfg(feature = "hydrate")]
async fn run_feed_socket(
    config: &ClientConfig,
    access_token: &str,
    owner: &str,
    handler: &ChangeHandler,
    alive: &Arc<AtomicBool>,
) -> Result<(), String> {
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::{Message, futures::WebSocket};

    let mut ws = WebSocket::open(&socket_url(&config.url, &config.anon_key, access_token))
        .map_err(|e| e.to_string())?;

    let subscribe = feed::subscribe_message(
        &uuid::Uuid::new_v4().to_string(),
        feed::BOOKMARKS_TABLE,
        &feed::owner_filter(owner),
        feed::EventFilter::All,
    );
    ws.send(Message::Text(subscribe)).await.map_err(|e| e.to_string())?;

    while let Some(msg) = ws.next().await {
        if !alive.load(Ordering::Relaxed) {
            break;
        }
        match msg {
            Ok(Message::Text(text)) => match feed::decode_event(&text) {
                Ok(event) => handler(event),
                Err(e) => leptos::logging::warn!("undecodable feed event: {e}"),
            },
            Ok(Message::Bytes(_)) => {}
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok(())
}

// =============================================================================
// COMPOSITION ROOT
// =============================================================================

#[cfg(feature = "hydrate")]
thread_local! {
    static ACTIVE: RefCell<Option<Rc<HttpService>>> = const { RefCell::new(None) };
}

/// Register the page's explicitly constructed service instance.
#[cfg(feature = "hydrate")]
pub fn install(service: Rc<HttpService>) {
    ACTIVE.with(|slot| *slot.borrow_mut() = Some(service));
}

/// The installed service, or `None` before initialization completes.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn active() -> Option<Rc<HttpService>> {
    ACTIVE.with(|slot| slot.borrow().clone())
}
