//! Home page: session synchronizer plus the authenticated bookmarks view.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only route. On mount it constructs the service client from
//! the fetched configuration, resolves the initial session, registers the
//! standing session-change subscription, and surfaces any OAuth error code
//! the callback redirect left in the URL. The authenticated branch mounts
//! the form and the live list for the current owner.

use leptos::prelude::*;

use crate::components::bookmark_form::BookmarkForm;
use crate::components::bookmark_list::BookmarkList;
use crate::state::session::{SessionPhase, SessionState};

/// Home page — login view for visitors, bookmark manager for users.
#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();

    // Session synchronizer. Runs once; every later identity change arrives
    // through the session-change subscription registered here.
    let initialized = RwSignal::new(false);
    Effect::new(move || {
        if initialized.get() {
            return;
        }
        initialized.set(true);
        session.update(SessionState::begin_loading);

        #[cfg(feature = "hydrate")]
        {
            if let Some(code) = crate::util::query::take_location_error() {
                session.update(|s| s.set_notice(crate::state::session::oauth_error_message(&code)));
            }

            leptos::task::spawn_local(async move {
                use crate::net::service::BookmarkService;

                let config = match crate::net::api::fetch_client_config().await {
                    Ok(config) => config,
                    Err(e) => {
                        leptos::logging::warn!("service configuration unavailable: {e}");
                        session.update(|s| {
                            s.fail_configuration(crate::state::session::CONFIG_FAILURE_MESSAGE);
                        });
                        return;
                    }
                };

                let service = std::rc::Rc::new(crate::net::http::HttpService::new(config));
                crate::net::http::install(std::rc::Rc::clone(&service));

                // Standing subscription for the page lifetime; the handle's
                // drop does not cancel it.
                let _standing = service.on_session_change(std::rc::Rc::new(move |user| {
                    session.update(|s| s.apply_change(user));
                }));

                match service.current_session().await {
                    Ok(current) => session.update(|s| s.apply_change(current.map(|c| c.user))),
                    Err(e) => {
                        leptos::logging::warn!("session lookup failed: {e}");
                        session.update(|s| s.apply_change(None));
                    }
                }
            });
        }
    });

    let on_sign_in = move |_| {
        session.update(SessionState::clear_notice);
        // Fire-and-forget: the provider round-trip lands back on
        // `/auth/callback`, and the next page load re-resolves the session.
        #[cfg(feature = "hydrate")]
        {
            use crate::net::service::BookmarkService;
            if let Some(service) = crate::net::http::active() {
                let target = service.sign_in_url(&crate::util::query::oauth_callback_url());
                crate::util::query::redirect_to(&target);
            }
        }
    };

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        {
            use crate::net::service::BookmarkService;
            let Some(service) = crate::net::http::active() else {
                return;
            };
            leptos::task::spawn_local(async move {
                match service.sign_out().await {
                    // Identity clears immediately; no notification awaited.
                    Ok(()) => session.update(SessionState::clear_identity),
                    Err(e) => {
                        leptos::logging::warn!("sign-out failed: {e}");
                        session.update(|s| s.set_notice("Failed to sign out."));
                    }
                }
            });
        }
    };

    view! {
        <main class="home-page">
            <div class="home-page__inner">
                <header class="home-page__header">
                    <h1 class="home-page__title">"Smart Bookmarks"</h1>
                    <Show when=move || session.get().user().is_some()>
                        <button class="home-page__sign-out" on:click=on_sign_out>
                            "Sign Out"
                        </button>
                    </Show>
                </header>

                <Show when=move || session.get().notice.is_some()>
                    <p class="home-page__notice">{move || session.get().notice.unwrap_or_default()}</p>
                </Show>

                {move || match session.get().phase {
                    SessionPhase::ConfigError(message) => view! {
                        <div class="home-card home-card--error">
                            <p class="home-card__error">{message}</p>
                            <p class="home-card__hint">
                                "Make sure the identity service URL and public key are set in the server environment."
                            </p>
                        </div>
                    }
                    .into_any(),
                    SessionPhase::Uninitialized | SessionPhase::Loading => view! {
                        <div class="home-page__loading">"Loading..."</div>
                    }
                    .into_any(),
                    SessionPhase::Anonymous => view! {
                        <div class="home-card">
                            <h2 class="home-card__heading">"Welcome to Smart Bookmarks"</h2>
                            <p class="home-card__subtitle">"Sign in with Google to manage your bookmarks"</p>
                            <button class="home-card__sign-in" on:click=on_sign_in>
                                "Sign In with Google"
                            </button>
                        </div>
                    }
                    .into_any(),
                    SessionPhase::Authenticated(user) => view! {
                        <div class="home-page__app">
                            <div class="home-card">
                                <p class="home-card__welcome">
                                    "Welcome, "
                                    <span class="home-card__email">{user.email.clone()}</span>
                                </p>
                                <BookmarkForm owner=user.id.clone()/>
                            </div>
                            <BookmarkList owner=user.id.clone()/>
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </main>
    }
}
