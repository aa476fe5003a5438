//! Route management handlers.

use crate::admin_api::types::{
    error_response, json_response, message_response, route_not_found, ListRoutesResponse,
    RouteResponse, ROUTE_ADDED, ROUTE_DELETED, ROUTE_UPDATED,
};
use crate::metrics::record_management_operation;
use crate::mock::{Route, RouteError, RouteManager};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use tracing::warn;

/// GET /_mock/routes - List all routes
pub fn handle_list(manager: &RouteManager) -> Response<Full<Bytes>> {
    let (routes, count) = manager.list_routes();
    record_management_operation("list_routes", "success");
    json_response(StatusCode::OK, &ListRoutesResponse { routes, count })
}

/// POST /_mock/routes - Add a route
pub fn handle_add(body: &[u8], manager: &RouteManager) -> Response<Full<Bytes>> {
    let candidate = match parse_route(body, "add_route") {
        Ok(route) => route,
        Err(resp) => return resp,
    };

    match manager.add_route(candidate) {
        Ok(route) => {
            record_management_operation("add_route", "success");
            json_response(
                StatusCode::CREATED,
                &RouteResponse {
                    message: ROUTE_ADDED,
                    route,
                },
            )
        }
        Err(e) => route_error_response("add_route", e),
    }
}

/// GET /_mock/routes/<path>?method=M - Exact lookup
pub fn handle_get(
    path: &str,
    method: Option<&str>,
    manager: &RouteManager,
) -> Response<Full<Bytes>> {
    let Some(method) = method else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "method query parameter is required",
        );
    };

    match manager.get_route(path, method) {
        Ok(route) => {
            record_management_operation("get_route", "success");
            json_response(StatusCode::OK, &route)
        }
        Err(e) => route_error_response("get_route", e),
    }
}

/// PUT /_mock/routes/<path>[?method=M] - Update route(s) at a path
pub fn handle_update(
    path: &str,
    method: Option<&str>,
    body: &[u8],
    manager: &RouteManager,
) -> Response<Full<Bytes>> {
    let candidate = match parse_route(body, "update_route") {
        Ok(route) => route,
        Err(resp) => return resp,
    };

    match manager.update_route(path, method, candidate) {
        Ok(route) => {
            record_management_operation("update_route", "success");
            json_response(
                StatusCode::OK,
                &RouteResponse {
                    message: ROUTE_UPDATED,
                    route,
                },
            )
        }
        Err(e) => route_error_response("update_route", e),
    }
}

/// DELETE /_mock/routes/<path>[?method=M] - Delete route(s) at a path
pub fn handle_delete(
    path: &str,
    method: Option<&str>,
    manager: &RouteManager,
) -> Response<Full<Bytes>> {
    match manager.delete_route(path, method) {
        Ok(_) => {
            record_management_operation("delete_route", "success");
            message_response(StatusCode::OK, ROUTE_DELETED)
        }
        Err(e) => route_error_response("delete_route", e),
    }
}

fn parse_route(body: &[u8], operation: &str) -> Result<Route, Response<Full<Bytes>>> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Invalid route JSON for {}: {}", operation, e);
        record_management_operation(operation, "invalid");
        error_response(StatusCode::BAD_REQUEST, "Invalid JSON")
    })
}

fn route_error_response(operation: &str, err: RouteError) -> Response<Full<Bytes>> {
    warn!("Management operation {} failed: {}", operation, err);
    if err.is_not_found() {
        record_management_operation(operation, "not_found");
        return route_not_found();
    }
    record_management_operation(operation, "invalid");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}
