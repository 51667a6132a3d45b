//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the identity-service wire protocol so route handlers
//! can stay focused on HTTP translation and cookie plumbing.

pub mod identity;
