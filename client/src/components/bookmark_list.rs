//! Bookmark list view: initial fetch, live feed merge, optimistic deletes.
//!
//! LIFECYCLE
//! =========
//! The component is instantiated per authenticated owner. On mount it resets
//! the shared list state, fetches the owner's rows, and subscribes to the
//! owner-filtered change feed; `on_cleanup` cancels the subscription so no
//! event is ever applied against a stale owner filter.

#[cfg(test)]
#[path = "bookmark_list_test.rs"]
mod bookmark_list_test;

use leptos::prelude::*;

use crate::net::service::BookmarkService;
use crate::state::bookmarks::BookmarksState;
use feed::Bookmark;

/// Optimistic-delete reconciliation: issue the delete; on failure re-fetch
/// the owner's full list as a last-resort correction. Returns the fetch
/// result only when a reconciliation fetch happened.
pub async fn delete_with_reconcile<S: BookmarkService>(
    service: &S,
    owner: &str,
    id: &str,
) -> Option<Result<Vec<Bookmark>, String>> {
    match service.delete_bookmark(id).await {
        Ok(()) => None,
        Err(_) => Some(service.list_bookmarks(owner).await),
    }
}

/// Date portion of an RFC 3339 timestamp for row display.
#[must_use]
pub fn display_date(created_at: &str) -> &str {
    match created_at.split_once('T') {
        Some((date, _)) => date,
        None => created_at,
    }
}

/// The signed-in owner's bookmarks, newest first, kept live by the change
/// feed.
#[component]
pub fn BookmarkList(owner: String) -> impl IntoView {
    let bookmarks = expect_context::<RwSignal<BookmarksState>>();

    #[cfg(feature = "hydrate")]
    {
        bookmarks.update(|b| b.reset_for_owner(Some(owner.clone())));
        if let Some(service) = crate::net::http::active() {
            let fetch_service = std::rc::Rc::clone(&service);
            let fetch_owner = owner.clone();
            leptos::task::spawn_local(async move {
                let result = fetch_service.list_bookmarks(&fetch_owner).await;
                bookmarks.update(|b| b.finish_load(result));
            });

            let sub = service.subscribe_changes(
                &owner,
                std::rc::Rc::new(move |event| bookmarks.update(|b| b.apply_event(event))),
            );
            on_cleanup(move || sub.unsubscribe());
        }
    }

    let on_delete = move |id: String| {
        // Optimistic: the row disappears before the request settles.
        bookmarks.update(|b| {
            b.begin_delete(&id);
            b.remove(&id);
        });
        #[cfg(feature = "hydrate")]
        {
            let Some(service) = crate::net::http::active() else {
                return;
            };
            let owner = owner.clone();
            leptos::task::spawn_local(async move {
                if let Some(reconciled) = delete_with_reconcile(service.as_ref(), &owner, &id).await {
                    bookmarks.update(|b| b.finish_load(reconciled));
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&owner, id);
    };

    view! {
        <section class="bookmark-list">
            <Show when=move || bookmarks.get().error.is_some()>
                <p class="bookmark-list__error">{move || bookmarks.get().error.unwrap_or_default()}</p>
            </Show>
            {move || {
                let state = bookmarks.get();
                if state.loading {
                    view! { <p class="bookmark-list__status">"Loading bookmarks..."</p> }.into_any()
                } else if state.items.is_empty() {
                    view! { <p class="bookmark-list__status">"No bookmarks yet. Add one above!"</p> }
                        .into_any()
                } else {
                    let count = state.items.len();
                    let rows = state
                        .items
                        .iter()
                        .map(|bookmark| {
                            let id = bookmark.id.clone();
                            let busy = state.deleting.as_deref() == Some(bookmark.id.as_str());
                            let on_delete = on_delete.clone();
                            view! {
                                <a
                                    class="bookmark-card"
                                    href=bookmark.url.clone()
                                    target="_blank"
                                    rel="noopener noreferrer"
                                >
                                    <div class="bookmark-card__body">
                                        <h4 class="bookmark-card__title">{bookmark.title.clone()}</h4>
                                        <p class="bookmark-card__url">{bookmark.url.clone()}</p>
                                        <p class="bookmark-card__date">
                                            {display_date(&bookmark.created_at).to_owned()}
                                        </p>
                                    </div>
                                    <button
                                        class="bookmark-card__delete"
                                        disabled=busy
                                        on:click=move |ev| {
                                            ev.prevent_default();
                                            on_delete(id.clone());
                                        }
                                    >
                                        {if busy { "..." } else { "Delete" }}
                                    </button>
                                </a>
                            }
                        })
                        .collect_view();
                    view! {
                        <div class="bookmark-list__items">
                            <h3 class="bookmark-list__heading">{format!("Your Bookmarks ({count})")}</h3>
                            {rows}
                        </div>
                    }
                    .into_any()
                }
            }}
        </section>
    }
}
