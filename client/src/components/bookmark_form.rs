//! Create-bookmark form.
//!
//! Validation is local and runs before any network call; a rejected insert
//! keeps the field contents so the user can retry.

#[cfg(test)]
#[path = "bookmark_form_test.rs"]
mod bookmark_form_test;

use leptos::prelude::*;

use crate::net::service::BookmarkService;
use feed::NewBookmark;

pub(crate) const EMPTY_FIELDS_MESSAGE: &str = "Please fill in both URL and title";
pub(crate) const INVALID_URL_MESSAGE: &str = "Please enter a valid URL";

/// Validate a draft locally. Failures carry the message shown inline.
///
/// # Errors
///
/// Returns the user-facing validation message when a field is empty or the
/// URL does not parse as absolute.
pub fn validate_draft(title: &str, url: &str) -> Result<(), String> {
    if title.trim().is_empty() || url.trim().is_empty() {
        return Err(EMPTY_FIELDS_MESSAGE.to_owned());
    }
    if url::Url::parse(url.trim()).is_err() {
        return Err(INVALID_URL_MESSAGE.to_owned());
    }
    Ok(())
}

/// Validate then insert, trimming both fields. Validation failures never
/// reach the network; service failures come back verbatim for display.
///
/// # Errors
///
/// Returns the validation message or the service's own error message.
pub async fn submit_bookmark<S: BookmarkService>(
    service: &S,
    owner: &str,
    title: &str,
    url: &str,
) -> Result<(), String> {
    validate_draft(title, url)?;
    let draft = NewBookmark {
        owner: owner.to_owned(),
        url: url.trim().to_owned(),
        title: title.trim().to_owned(),
    };
    service.insert_bookmark(&draft).await
}

/// Form for adding one bookmark, scoped to the signed-in owner.
#[component]
pub fn BookmarkForm(owner: String) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let url = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let error = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        error.set(String::new());

        let title_value = title.get();
        let url_value = url.get();
        if let Err(message) = validate_draft(&title_value, &url_value) {
            error.set(message);
            return;
        }

        busy.set(true);
        #[cfg(feature = "hydrate")]
        {
            let owner = owner.clone();
            leptos::task::spawn_local(async move {
                let Some(service) = crate::net::http::active() else {
                    busy.set(false);
                    return;
                };
                match submit_bookmark(service.as_ref(), &owner, &title_value, &url_value).await {
                    Ok(()) => {
                        title.set(String::new());
                        url.set(String::new());
                    }
                    Err(message) => error.set(message),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&owner, &title_value, &url_value);
            busy.set(false);
        }
    };

    view! {
        <form class="bookmark-form" on:submit=on_submit>
            <h3 class="bookmark-form__heading">"Add New Bookmark"</h3>
            <Show when=move || !error.get().is_empty()>
                <p class="bookmark-form__error">{move || error.get()}</p>
            </Show>
            <input
                class="bookmark-form__input"
                type="text"
                placeholder="Bookmark title"
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
                disabled=move || busy.get()
            />
            <input
                class="bookmark-form__input"
                type="url"
                placeholder="https://example.com"
                prop:value=move || url.get()
                on:input=move |ev| url.set(event_target_value(&ev))
                disabled=move || busy.get()
            />
            <button class="bookmark-form__submit" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Adding..." } else { "Add Bookmark" }}
            </button>
        </form>
    }
}
