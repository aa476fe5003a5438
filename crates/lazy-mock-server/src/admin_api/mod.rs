//! Management REST API under `/_mock/`.
//!
//! Provides runtime control of the mock routes:
//! - Listing, adding, updating and deleting routes
//! - Exporting, saving and reloading the YAML configuration
//! - Health, metrics and the web UI page

mod handlers;
mod router;
pub mod types;

pub use router::{is_management_path, route_management, MANAGEMENT_PREFIX};
