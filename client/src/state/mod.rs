//! Reactive state models shared across pages and components.
//!
//! DESIGN
//! ======
//! State structs are plain data with pure mutation methods so the session
//! and list contracts can be tested natively; components wrap them in
//! `RwSignal` contexts and apply mutations from event handlers and
//! subscription callbacks.

pub mod bookmarks;
pub mod session;
