//! Page components routed by the root `App`.

pub mod home;
