//! Request handling for mock endpoints.
//!
//! Matches the request against a snapshot of the routes, renders the selected
//! route (or the not-found reply) and converts the result into a hyper response.

use super::request::MockRequest;
use super::response::{render, RenderedResponse};
use super::store::RouteStore;
use crate::admin_api::types::build_response;
use crate::metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode, Uri};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Match and render a mock request. The path is percent-decoded before matching.
pub fn handle_mock_request(
    method: &Method,
    uri: &Uri,
    store: &RouteStore,
) -> Response<Full<Bytes>> {
    let path = urlencoding::decode(uri.path()).unwrap_or(Cow::Borrowed(uri.path()));
    let request = MockRequest::new(method.as_str(), &path, uri.query());
    let rendered = resolve(&request, store);
    metrics::record_request(&request.method, rendered.status);
    into_http_response(rendered)
}

/// Pick the first matching route and render it, or render the not-found reply.
pub fn resolve(request: &MockRequest, store: &RouteStore) -> RenderedResponse {
    match store.find_matching_route(request) {
        Some((route, index)) => {
            debug!(
                route_index = index,
                "Matched route {} {} for {} {}",
                route.method,
                route.path,
                request.method,
                request.path
            );
            metrics::record_match(true);
            render(&route, request)
        }
        None => {
            debug!("No route for {} {}", request.method, request.path);
            metrics::record_match(false);
            RenderedResponse::not_found(request)
        }
    }
}

/// Convert a rendered response into a hyper response.
///
/// Route headers go first; the content type is set last so it always wins.
/// Headers that are not valid HTTP are skipped with a warning.
pub fn into_http_response(rendered: RenderedResponse) -> Response<Full<Bytes>> {
    let status = match StatusCode::from_u16(rendered.status) {
        Ok(status) => status,
        Err(_) => {
            warn!("Invalid status code {}, sending 500", rendered.status);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut response = build_response(status, rendered.body);
    let headers = response.headers_mut();

    for (name, value) in &rendered.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid response header '{}: {}'", name, value),
        }
    }

    match HeaderValue::from_str(&rendered.content_type) {
        Ok(value) => {
            headers.insert(CONTENT_TYPE, value);
        }
        Err(_) => warn!("Skipping invalid content type '{}'", rendered.content_type),
    }

    response
}
