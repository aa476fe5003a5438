//! Response types and helpers for the management API.

use crate::mock::Route;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::error;

/// Response for listing routes
#[derive(Debug, Serialize)]
pub struct ListRoutesResponse {
    pub routes: Vec<Route>,
    pub count: usize,
}

/// Success message with the affected route
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub message: &'static str,
    pub route: Route,
}

/// Plain success message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub const ROUTE_ADDED: &str = "Route added successfully";
pub const ROUTE_UPDATED: &str = "Route updated successfully";
pub const ROUTE_DELETED: &str = "Route deleted successfully";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const CONFIG_SAVED: &str = "Configuration saved successfully";
pub const CONFIG_RELOADED: &str = "Configuration reloaded successfully";

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => {
            build_response_with_headers(status, [("Content-Type", "application/json")], json)
        }
        Err(e) => {
            error!("Failed to encode management response: {}", e);
            build_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Build an HTTP response with the given status and body.
///
/// Falls back to a bare response if the builder rejects its input.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let body = body.into();
    Response::builder()
        .status(status)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|_| Response::new(Full::new(body)))
}

/// Build an HTTP response with headers.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder.body(Full::new(body.into())).unwrap_or_else(|_| {
        let mut response = Response::new(Full::new(Bytes::from("Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}

/// Create a message response
pub fn message_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    json_response(status, &MessageResponse { message })
}

/// Create a not found response for unknown management endpoints
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// 404 for route lookups that found nothing
pub fn route_not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let resp = error_response(StatusCode::BAD_REQUEST, "Test error");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "Test error"})
        );
    }

    #[tokio::test]
    async fn test_route_response_format() {
        let resp = json_response(
            StatusCode::CREATED,
            &RouteResponse {
                message: ROUTE_ADDED,
                route: Route::new("GET", "/a"),
            },
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Route added successfully");
        assert_eq!(body["route"]["path"], "/a");
    }

    #[test]
    fn test_json_response() {
        let body = serde_json::json!({"test": "value"});
        let resp = json_response(StatusCode::OK, &body);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_not_found_response() {
        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(route_not_found().status(), StatusCode::NOT_FOUND);
    }
}
