//! Bookmark-list state for the authenticated owner.
//!
//! DESIGN
//! ======
//! The list is one in-memory projection fed from three sides: the initial
//! fetch, live change-feed events, and local optimistic deletes. All three
//! paths go through the idempotent mutators here, so any interleaving of an
//! optimistic delete with a feed deletion of the same row converges. The
//! list stays ordered by `created_at` descending because the fetch is
//! ordered and insertions prepend in feed order; nothing re-sorts.

#[cfg(test)]
#[path = "bookmarks_test.rs"]
mod bookmarks_test;

use feed::{Bookmark, ChangeEvent};

/// List state scoped to one owner. Switching owner resets it wholesale —
/// rows never survive an identity change.
#[derive(Clone, Debug, Default)]
pub struct BookmarksState {
    /// Owner the current rows belong to.
    pub owner: Option<String>,
    /// Rows ordered by `created_at` descending.
    pub items: Vec<Bookmark>,
    /// True until the initial fetch for `owner` settles.
    pub loading: bool,
    /// List-level failure message (initial fetch or reconciliation fetch).
    pub error: Option<String>,
    /// Id with a delete request in flight, for button state.
    pub deleting: Option<String>,
}

impl BookmarksState {
    /// Drop everything and start over for a (possibly different) owner.
    pub fn reset_for_owner(&mut self, owner: Option<String>) {
        self.loading = owner.is_some();
        self.owner = owner;
        self.items.clear();
        self.error = None;
        self.deleting = None;
    }

    /// Apply the result of a full fetch (initial load or delete
    /// reconciliation). Failures surface as a list-level error message.
    pub fn finish_load(&mut self, result: Result<Vec<Bookmark>, String>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(message) => {
                self.items.clear();
                self.error = Some(message);
            }
        }
    }

    /// Prepend a newly inserted row. A row whose id is already present is
    /// left alone, so a feed insertion racing the initial fetch cannot
    /// duplicate it.
    pub fn insert_head(&mut self, row: Bookmark) {
        if self.items.iter().any(|b| b.id == row.id) {
            return;
        }
        self.items.insert(0, row);
    }

    /// Remove by id. Removing an absent id is a no-op, so a local optimistic
    /// delete and a feed deletion for the same row interleave safely.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|b| b.id != id);
        if self.deleting.as_deref() == Some(id) {
            self.deleting = None;
        }
    }

    /// Replace a row in place; absent rows are ignored. Bookmarks are
    /// immutable in this UI, but the feed contract includes updates.
    pub fn replace(&mut self, row: Bookmark) {
        if let Some(slot) = self.items.iter_mut().find(|b| b.id == row.id) {
            *slot = row;
        }
    }

    /// Apply one change-feed event in receipt order.
    pub fn apply_event(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Insert(row) => self.insert_head(row),
            ChangeEvent::Update(row) => self.replace(row),
            ChangeEvent::Delete { id } => self.remove(&id),
        }
    }

    /// Mark a delete as in flight for button state.
    pub fn begin_delete(&mut self, id: &str) {
        self.deleting = Some(id.to_owned());
    }

    /// Whether the row with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|b| b.id == id)
    }
}
