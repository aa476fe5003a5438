//! Management API handlers.

pub mod config;
pub mod routes;
pub mod system;
