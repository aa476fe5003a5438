//! Request matching and response rendering for mock routes.
//!
//! This module provides:
//! - `RouteStore`: the lock-owning, insertion-ordered route collection
//! - `matcher`: first-match selection by method, path pattern and query parameters
//! - `response`: placeholder substitution and content-type aware serialization
//! - `RouteManager`: validated management operations over the store
//!
//! ## Module Structure
//!
//! - `types`: route model, response payload and errors
//! - `request`: transport-independent request view
//! - `matcher`: path patterns and route matching
//! - `store`: RouteStore
//! - `response`: rendering
//! - `manager`: RouteManager
//! - `handler`: hyper glue for mock endpoints

mod handler;
mod manager;
pub mod matcher;
mod request;
pub mod response;
mod store;
mod types;


pub use types::{
    ResponseBody, Route, RouteError, ValidationError, ALLOWED_METHODS, DEFAULT_CONTENT_TYPE,
    DEFAULT_STATUS_CODE,
};

pub use handler::{handle_mock_request, into_http_response, resolve};
pub use manager::RouteManager;
pub use matcher::{find_matching_route, path_matches, CompiledRoute, PathPattern};
pub use request::{parse_query_string, MockRequest};
pub use response::{render, RenderedResponse};
pub use store::{RouteSnapshot, RouteStore};
