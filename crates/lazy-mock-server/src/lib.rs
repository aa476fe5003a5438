//! Lazy Mock Server library.
//!
//! A configurable HTTP mock server: routes are loaded from a YAML file,
//! matched against incoming requests in order, and can be changed at runtime
//! through the `/_mock/` management API.

pub mod admin_api;
pub mod config;
pub mod metrics;
pub mod mock;
pub mod server;
