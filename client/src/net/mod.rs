//! Networking modules for the glue server API and the Identity & Data
//! Service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls to our own server, `service` defines the narrow
//! capability interface the UI depends on, and `http` implements it over the
//! service's REST + websocket endpoints in the browser.

pub mod api;
pub mod http;
pub mod service;
