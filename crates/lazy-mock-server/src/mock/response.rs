//! Response rendering for matched routes.
//!
//! Turns a route plus the request that selected it into status, content type,
//! headers and body bytes. Rendering never touches the route store.

use super::request::MockRequest;
use super::types::{ResponseBody, Route, DEFAULT_CONTENT_TYPE};
use bytes::Bytes;
use serde_json::Value;
use tracing::error;

/// Fully rendered response, ready for the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResponse {
    pub status: u16,
    pub content_type: String,
    /// Custom route headers, in declaration order
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RenderedResponse {
    /// The fixed reply for requests no route matched.
    pub fn not_found(request: &MockRequest) -> Self {
        let body = serde_json::json!({
            "error": "Route not found",
            "method": request.method,
            "path": request.path,
        });
        Self {
            status: 404,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body: encode_json(&body, "encoding not-found response"),
        }
    }

    /// Parse the body as JSON (test and debugging helper).
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Render a matched route for a request.
pub fn render(route: &Route, request: &MockRequest) -> RenderedResponse {
    let headers = route
        .headers
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let content_type = route.effective_content_type().to_string();
    let payload = process_response(&route.response, request);
    let body = serialize_body(&payload, &content_type);

    RenderedResponse {
        status: route.effective_status(),
        content_type,
        headers,
        body,
    }
}

/// Apply placeholder substitution to string payloads; structured payloads pass through.
pub fn process_response(response: &ResponseBody, request: &MockRequest) -> ResponseBody {
    match response {
        ResponseBody::Text(template) => {
            ResponseBody::Text(substitute_placeholders(template, request))
        }
        other => other.clone(),
    }
}

/// Replace `{method}`, `{path}`, `{query}` and then `{<param>}` for every query parameter.
///
/// Reserved tokens go first so a parameter named `method` cannot shadow them.
pub fn substitute_placeholders(template: &str, request: &MockRequest) -> String {
    let mut out = template
        .replace("{method}", &request.method)
        .replace("{path}", &request.path)
        .replace("{query}", &request.raw_query);

    for (name, value) in &request.query {
        let token = format!("{{{name}}}");
        if out.contains(&token) {
            out = out.replace(&token, value);
        }
    }
    out
}

/// Serialize a resolved payload for the given content type.
///
/// JSON content: a string that parses as JSON is emitted as the parsed
/// document, any other string as a quoted JSON string, structured values as
/// JSON. Other content types get the plain-text rendering.
pub fn serialize_body(payload: &ResponseBody, content_type: &str) -> Bytes {
    if !is_json_content_type(content_type) {
        return Bytes::from(payload.to_text());
    }

    match payload {
        ResponseBody::Text(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => encode_json(&parsed, "encoding JSON object"),
            Err(_) => encode_json(s, "encoding string response"),
        },
        other => encode_json(&Value::from(other.clone()), "encoding response body"),
    }
}

/// `application/json`, ignoring parameters such as `charset`.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(DEFAULT_CONTENT_TYPE))
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T, context: &str) -> Bytes {
    match serde_json::to_vec(value) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            error!(error = %e, "Serialization failed while {}", context);
            Bytes::new()
        }
    }
}
