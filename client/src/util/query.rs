//! OAuth callback error parameter handling.
//!
//! The callback endpoint lands back on `/` with `?error=<code>` when the
//! handshake failed. The home page reads the code once and strips it from
//! the visible URL without a reload, so refreshes don't resurface a stale
//! error.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

/// Extract the `error` query parameter from a location search string.
/// Accepts the raw `location.search` form (with or without the leading `?`).
#[must_use]
pub fn error_param(search: &str) -> Option<String> {
    let raw = search.strip_prefix('?').unwrap_or(search);
    raw.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "error" && !value.is_empty()).then(|| value.to_owned())
    })
}

/// Read the current location's `error` parameter and strip the query string
/// from the visible URL via `history.replaceState` (no reload).
#[cfg(feature = "hydrate")]
#[must_use]
pub fn take_location_error() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let code = error_param(&location.search().ok()?)?;

    if let (Ok(history), Ok(pathname)) = (window.history(), location.pathname()) {
        let _ = history.replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&pathname),
        );
    }
    Some(code)
}

/// The fixed OAuth callback address for this origin.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn oauth_callback_url() -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".to_owned());
    format!("{origin}/auth/callback")
}

/// Navigate the tab to `url` (full page load).
#[cfg(feature = "hydrate")]
pub fn redirect_to(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}
