//! Configuration handlers: export, save, reload.

use crate::admin_api::types::{
    error_response, json_response, message_response, CONFIG_RELOADED, CONFIG_SAVED,
};
use crate::metrics::record_management_operation;
use crate::mock::RouteManager;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use tracing::error;

/// GET /_mock/config - Full configuration document
pub fn handle_get(manager: &RouteManager) -> Response<Full<Bytes>> {
    record_management_operation("get_config", "success");
    json_response(StatusCode::OK, &manager.get_full_config())
}

/// POST /_mock/config - Save the routes to the config file
pub fn handle_save(manager: &RouteManager) -> Response<Full<Bytes>> {
    match manager.save_config() {
        Ok(()) => {
            record_management_operation("save_config", "success");
            message_response(StatusCode::OK, CONFIG_SAVED)
        }
        Err(e) => {
            error!("Saving configuration failed: {:#}", e);
            record_management_operation("save_config", "error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save configuration",
            )
        }
    }
}

/// POST /_mock/reload - Replace all routes with the config file contents
pub fn handle_reload(manager: &RouteManager) -> Response<Full<Bytes>> {
    match manager.reload_config() {
        Ok(count) => {
            record_management_operation("reload_config", "success");
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "message": CONFIG_RELOADED, "count": count }),
            )
        }
        Err(e) => {
            error!("Reloading configuration failed: {:#}", e);
            record_management_operation("reload_config", "error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to reload configuration",
            )
        }
    }
}
