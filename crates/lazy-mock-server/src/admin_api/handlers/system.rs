//! System handlers: health, metrics, web UI.

use crate::admin_api::types::{build_response, build_response_with_headers, json_response};
use crate::metrics::collect_metrics;
use crate::mock::RouteManager;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::path::Path;
use tracing::error;

/// GET /_mock/health - Health check
pub fn handle_health(manager: &RouteManager) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &serde_json::json!({"status": "ok", "routes": manager.store().count()}),
    )
}

/// GET /_mock/metrics - Prometheus metrics
pub fn handle_metrics() -> Response<Full<Bytes>> {
    build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        collect_metrics(),
    )
}

/// GET /_mock/ui - Serve the web UI page from disk
pub fn handle_ui(template: &Path) -> Response<Full<Bytes>> {
    match std::fs::read(template) {
        Ok(html) => {
            build_response_with_headers(StatusCode::OK, [("Content-Type", "text/html")], html)
        }
        Err(e) => {
            error!(
                "Reading web UI template {} failed: {}",
                template.display(),
                e
            );
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Web UI template not found",
            )
        }
    }
}
