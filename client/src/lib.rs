//! # client
//!
//! Leptos + WASM frontend for the Smart Bookmarks application.
//!
//! This crate contains the page and form components, the session and
//! bookmark-list state, and the networking layer that talks to the glue
//! server (`/api/*`) and directly to the Identity & Data Service for table
//! CRUD and the realtime change feed.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
