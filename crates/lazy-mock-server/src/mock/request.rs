//! Transport-independent view of an inbound request.

use std::collections::BTreeMap;

/// The parts of a request that matching and rendering look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockRequest {
    pub method: String,
    /// URL path without the query string
    pub path: String,
    /// Raw query string as received (no leading `?`)
    pub raw_query: String,
    /// Decoded query parameters, first value wins for repeated keys
    pub query: BTreeMap<String, String>,
}

impl MockRequest {
    pub fn new(method: &str, path: &str, raw_query: Option<&str>) -> Self {
        let raw_query = raw_query.unwrap_or("").to_string();
        let query = parse_query_string(&raw_query);
        Self {
            method: method.to_string(),
            path: path.to_string(),
            raw_query,
            query,
        }
    }

    /// Build a request from a path that may carry its own query string (`/a?b=c`).
    pub fn from_uri(method: &str, uri: &str) -> Self {
        match uri.split_once('?') {
            Some((path, query)) => Self::new(method, path, Some(query)),
            None => Self::new(method, uri, None),
        }
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Parse a query string into key/value pairs, URL-decoding both sides.
///
/// `+` decodes to a space, a key without `=` gets an empty value, and only the
/// first occurrence of a repeated key is kept.
pub fn parse_query_string(query: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for pair in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        params.entry(key).or_insert_with(|| decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
