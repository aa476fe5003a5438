//! Type definitions for mock routes.
//!
//! This module contains the route model, the tagged response payload and the
//! error types shared by the store, matcher, renderer and management facade.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Content type used when a route does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Status code used when a route leaves `status_code` unset (0).
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// HTTP methods a route may declare.
pub const ALLOWED_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

// ============================================================================
// Route
// ============================================================================

/// A single mock rule: method + path (+ query parameters) mapped to a canned response.
///
/// External field names follow the YAML/JSON configuration format
/// (`status_code`, `content_type`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub method: String,
    /// Signed and wide so out-of-range values reach validation instead of failing decode
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub response: ResponseBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
}

impl Route {
    /// Create a route with the given method and path and an empty response.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            status_code: 0,
            content_type: String::new(),
            response: ResponseBody::default(),
            headers: None,
            parameters: None,
        }
    }

    pub fn with_status(mut self, status_code: i64) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_response(mut self, response: impl Into<ResponseBody>) -> Self {
        self.response = response.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Check the structural rules a route must satisfy before it enters a store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        if self.method.is_empty() {
            return Err(ValidationError::EmptyMethod);
        }
        if !ALLOWED_METHODS.contains(&self.method.as_str()) {
            return Err(ValidationError::InvalidMethod(self.method.clone()));
        }
        if self.status_code != 0 && !(100..=599).contains(&self.status_code) {
            return Err(ValidationError::InvalidStatusCode(self.status_code));
        }
        Ok(())
    }

    /// Literal (non-pattern) identity comparison used by management lookups.
    pub fn has_identity(&self, path: &str, method: &str) -> bool {
        self.path == path && self.method == method
    }

    /// Status code to send, with 0 meaning "unset".
    ///
    /// Values outside `u16` only occur on unvalidated routes and map to 0,
    /// which the transport rejects.
    pub fn effective_status(&self) -> u16 {
        if self.status_code == 0 {
            DEFAULT_STATUS_CODE
        } else {
            u16::try_from(self.status_code).unwrap_or(0)
        }
    }

    /// Content type to send, defaulting to JSON.
    pub fn effective_content_type(&self) -> &str {
        if self.content_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            &self.content_type
        }
    }
}

// ============================================================================
// Response payload
// ============================================================================

/// Response payload of a route, decoded once into a tagged variant.
///
/// Serialized transparently as the underlying JSON-compatible value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ResponseBody {
    /// A string; the only variant that receives placeholder substitution
    Text(String),
    Object(serde_json::Map<String, Value>),
    Array(Vec<Value>),
    /// Numbers, booleans and null
    Scalar(Value),
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Scalar(Value::Null)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ResponseBody::Text(s),
            Value::Object(map) => ResponseBody::Object(map),
            Value::Array(items) => ResponseBody::Array(items),
            scalar => ResponseBody::Scalar(scalar),
        }
    }
}

impl From<ResponseBody> for Value {
    fn from(body: ResponseBody) -> Self {
        match body {
            ResponseBody::Text(s) => Value::String(s),
            ResponseBody::Object(map) => Value::Object(map),
            ResponseBody::Array(items) => Value::Array(items),
            ResponseBody::Scalar(v) => v,
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(s: &str) -> Self {
        ResponseBody::Text(s.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        ResponseBody::Text(s)
    }
}

impl ResponseBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain-text rendering used for non-JSON content types.
    ///
    /// Strings are written as-is, null as nothing, everything else as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            ResponseBody::Text(s) => s.clone(),
            ResponseBody::Scalar(Value::Null) => String::new(),
            ResponseBody::Scalar(v) => v.to_string(),
            ResponseBody::Object(map) => Value::Object(map.clone()).to_string(),
            ResponseBody::Array(items) => Value::Array(items.clone()).to_string(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A candidate route broke one of the structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route path cannot be empty")]
    EmptyPath,
    #[error("route method cannot be empty")]
    EmptyMethod,
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid status code: {0}")]
    InvalidStatusCode(i64),
}

/// Errors returned by route store and management operations.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("route #{index} is invalid: {source}")]
    InvalidRoute {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("route not found: {method} {path}")]
    NotFound { method: String, path: String },
    #[error("no routes found with path: {0}")]
    PathNotFound(String),
}

impl RouteError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RouteError::NotFound { .. } | RouteError::PathNotFound(_)
        )
    }
}
