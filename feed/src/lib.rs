//! Shared data model and change-feed codec for the bookmarking app.
//!
//! This crate owns the wire representation used by both `server` and
//! `client`: the identity/session types returned by the session endpoint,
//! the bookmark row shape, and the JSON change-feed protocol spoken over the
//! Identity & Data Service's realtime websocket.

use serde::{Deserialize, Serialize};


/// Table name for bookmark rows on the data service.
pub const BOOKMARKS_TABLE: &str = "bookmarks";

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text could not be decoded as JSON, or a row payload did not
    /// match the bookmark schema.
    #[error("failed to decode feed event: {0}")]
    Json(#[from] serde_json::Error),
    /// The `event` tag on the wire is not one of `INSERT`, `UPDATE`, `DELETE`.
    #[error("unknown feed event type: {0}")]
    UnknownEvent(String),
    /// A known event arrived without the payload it requires (`new` for
    /// inserts/updates, `old.id` for deletes).
    #[error("feed event missing `{0}` payload")]
    MissingPayload(&'static str),
}

// =============================================================================
// IDENTITY & SESSION
// =============================================================================

/// An authenticated end user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque service-assigned user identifier.
    pub id: String,
    /// Email address the identity provider vouched for.
    pub email: String,
}

/// A live session as issued by the identity service.
///
/// The refresh token never appears here; it stays in an HttpOnly cookie owned
/// by the glue server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token authorizing table CRUD and feed subscription.
    pub access_token: String,
    /// The user this session belongs to.
    pub user: Identity,
}

/// Body of `GET /api/session`: the current session or `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnvelope {
    pub session: Option<Session>,
}

// =============================================================================
// BOOKMARK
// =============================================================================

/// A user-owned bookmark row, as stored by the data service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Opaque service-assigned row identifier.
    pub id: String,
    /// Owning user id; rows are only ever visible to their owner.
    pub owner: String,
    /// The bookmarked URL.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Creation timestamp, RFC 3339, assigned by the service.
    pub created_at: String,
}

/// Insert payload for a new bookmark. The service assigns `id` and
/// `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub owner: String,
    pub url: String,
    pub title: String,
}

// =============================================================================
// CHANGE FEED
// =============================================================================

/// Which row events a feed subscription asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventFilter {
    /// All mutation events.
    #[serde(rename = "*")]
    All,
    Insert,
    Update,
    Delete,
}

impl EventFilter {
    /// Wire spelling of the filter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "*",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// A decoded row-mutation event from the change feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A row was inserted; carries the full new row.
    Insert(Bookmark),
    /// A row was updated; carries the full new row.
    Update(Bookmark),
    /// A row was deleted; the service only replays the row id.
    Delete { id: String },
}

/// Raw event shape on the websocket wire.
#[derive(Debug, Deserialize)]
struct WireEvent {
    event: String,
    #[serde(default)]
    new: Option<serde_json::Value>,
    #[serde(default)]
    old: Option<serde_json::Value>,
}

/// Decode one feed message into a [`ChangeEvent`].
///
/// # Errors
///
/// Returns a [`CodecError`] if the text is not valid JSON, carries an unknown
/// event tag, or lacks the payload its event type requires.
pub fn decode_event(text: &str) -> Result<ChangeEvent, CodecError> {
    let wire: WireEvent = serde_json::from_str(text)?;
    match wire.event.as_str() {
        "INSERT" => {
            let row = wire.new.ok_or(CodecError::MissingPayload("new"))?;
            Ok(ChangeEvent::Insert(serde_json::from_value(row)?))
        }
        "UPDATE" => {
            let row = wire.new.ok_or(CodecError::MissingPayload("new"))?;
            Ok(ChangeEvent::Update(serde_json::from_value(row)?))
        }
        "DELETE" => {
            let id = wire
                .old
                .as_ref()
                .and_then(|old| old.get("id"))
                .and_then(serde_json::Value::as_str)
                .ok_or(CodecError::MissingPayload("old.id"))?;
            Ok(ChangeEvent::Delete { id: id.to_owned() })
        }
        other => Err(CodecError::UnknownEvent(other.to_owned())),
    }
}

/// Owner-equality filter predicate for scoping a subscription or a table read.
#[must_use]
pub fn owner_filter(owner_id: &str) -> String {
    format!("owner=eq.{owner_id}")
}

/// Build the JSON subscribe message for a change-feed channel.
///
/// `id` correlates the subscription in service acknowledgements; the service
/// delivers matching events in emission order until the socket closes.
#[must_use]
pub fn subscribe_message(id: &str, table: &str, filter: &str, events: EventFilter) -> String {
    serde_json::json!({
        "action": "subscribe",
        "id": id,
        "table": table,
        "filter": filter,
        "events": events.as_str(),
    })
    .to_string()
}
