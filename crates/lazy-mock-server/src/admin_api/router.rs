//! Route dispatch logic for the management API.

use crate::admin_api::handlers::{config, routes, system};
use crate::admin_api::types::not_found;
use crate::mock::parse_query_string;
use crate::server::ServerState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response, Uri};
use tracing::debug;

/// Prefix shared by every management endpoint.
pub const MANAGEMENT_PREFIX: &str = "/_mock/";

/// Returns true if the request path belongs to the management API.
pub fn is_management_path(path: &str) -> bool {
    path.starts_with(MANAGEMENT_PREFIX)
}

/// Dispatch a management request. The body has already been collected.
pub fn route_management(
    method: &Method,
    uri: &Uri,
    body: &Bytes,
    state: &ServerState,
) -> Response<Full<Bytes>> {
    let path = uri.path();
    let manager = state.manager.as_ref();

    debug!("Management API: {} {}", method, path);

    match (method, path) {
        (&Method::GET, "/_mock/routes") => return routes::handle_list(manager),
        (&Method::POST, "/_mock/routes") => return routes::handle_add(body, manager),
        (&Method::GET, "/_mock/config") => return config::handle_get(manager),
        (&Method::POST, "/_mock/config") => return config::handle_save(manager),
        (&Method::POST, "/_mock/reload") => return config::handle_reload(manager),
        (&Method::GET, "/_mock/ui") => return system::handle_ui(&state.ui_template),
        (&Method::GET, "/_mock/health") => return system::handle_health(manager),
        (&Method::GET, "/_mock/metrics") => return system::handle_metrics(),
        _ => {}
    }

    let Some(route_path) = target_route_path(path) else {
        return not_found();
    };
    let query = uri.query().map(parse_query_string).unwrap_or_default();
    let identity_method = query.get("method").map(String::as_str);

    match *method {
        Method::GET => routes::handle_get(&route_path, identity_method, manager),
        Method::PUT => routes::handle_update(&route_path, identity_method, body, manager),
        Method::DELETE => routes::handle_delete(&route_path, identity_method, manager),
        _ => not_found(),
    }
}

/// Extract the route path addressed by `/_mock/routes/<path>`.
///
/// The remainder is percent-decoded and re-prefixed with `/`.
fn target_route_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/_mock/routes/")?;
    let decoded = urlencoding::decode(rest)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| rest.to_string());
    Some(format!("/{}", decoded))
}
