//! Route matching.
//!
//! Routes are evaluated in store order and the first one whose method, path
//! and query-parameter constraints all hold wins. Path patterns are compiled
//! once when a route enters the store.

use super::request::MockRequest;
use super::types::Route;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Compiled form of a route path.
///
/// Rules, in order:
/// 1. equal after stripping one trailing `/` from both sides
/// 2. if the path has a `*`, the whole trimmed request path must match with
///    every `*` standing for any run of characters (including `/`)
/// 3. if the raw path ends with `/`, the request path must start with it
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    trimmed: String,
    wildcard: Option<Arc<Regex>>,
}

impl PathPattern {
    pub fn compile(path: &str) -> Self {
        let trimmed = trim_trailing_slash(path).to_string();
        let wildcard = if trimmed.contains('*') {
            compile_wildcard(&trimmed)
        } else {
            None
        };
        Self {
            raw: path.to_string(),
            trimmed,
            wildcard,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, request_path: &str) -> bool {
        let request_trimmed = trim_trailing_slash(request_path);

        if self.trimmed == request_trimmed {
            return true;
        }

        if self.trimmed.contains('*') {
            return self
                .wildcard
                .as_ref()
                .is_some_and(|re| re.is_match(request_trimmed));
        }

        if self.raw.ends_with('/') {
            return request_path.starts_with(&self.raw);
        }

        false
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

fn compile_wildcard(path: &str) -> Option<Arc<Regex>> {
    let body = path
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    match Regex::new(&format!("^{body}$")) {
        Ok(re) => Some(Arc::new(re)),
        Err(e) => {
            warn!("Failed to compile wildcard path '{}': {}", path, e);
            None
        }
    }
}

/// Check whether a route path accepts a request path.
pub fn path_matches(route_path: &str, request_path: &str) -> bool {
    PathPattern::compile(route_path).matches(request_path)
}

/// Every required parameter must be present with exactly the required value.
pub fn parameters_match(
    required: &BTreeMap<String, String>,
    query: &BTreeMap<String, String>,
) -> bool {
    required
        .iter()
        .all(|(key, expected)| query.get(key).is_some_and(|actual| actual == expected))
}

/// A route together with its precompiled path pattern.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub route: Route,
    pub path: PathPattern,
}

impl CompiledRoute {
    pub fn compile(route: Route) -> Self {
        let path = PathPattern::compile(&route.path);
        Self { route, path }
    }

    /// Method, then path, then parameters (only when the route declares them).
    pub fn matches(&self, request: &MockRequest) -> bool {
        if !self.route.method.eq_ignore_ascii_case(&request.method) {
            return false;
        }
        if !self.path.matches(&request.path) {
            return false;
        }
        match &self.route.parameters {
            Some(required) => parameters_match(required, &request.query),
            None => true,
        }
    }
}

/// Find the first matching route and return a copy of it with its index.
pub fn find_matching_route(
    routes: &[CompiledRoute],
    request: &MockRequest,
) -> Option<(Route, usize)> {
    routes
        .iter()
        .enumerate()
        .find(|(_, compiled)| compiled.matches(request))
        .map(|(index, compiled)| (compiled.route.clone(), index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(path_matches("/api/users", "/api/users"));
        assert!(!path_matches("/api/users", "/api/posts"));
        assert!(!path_matches("/api/users", "/api/users/1"));
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        assert!(path_matches("/api/users", "/api/users/"));
        assert!(path_matches("/api/users/", "/api/users"));
    }

    #[test]
    fn test_empty_paths_match() {
        assert!(path_matches("", ""));
        assert!(path_matches("/", ""));
    }

    #[test]
    fn test_wildcard_suffix() {
        assert!(path_matches("/api/users/*", "/api/users/123"));
        assert!(path_matches("/api/users/*", "/api/users/profile"));
        assert!(!path_matches("/api/*", "/different/path"));
    }

    #[test]
    fn test_wildcard_crosses_segments() {
        assert!(path_matches("/api/*", "/api/a/b/c"));
    }

    #[test]
    fn test_wildcard_prefix_and_middle() {
        assert!(path_matches("*/status", "/service/status"));
        assert!(path_matches("/api/*/orders", "/api/42/orders"));
        assert!(!path_matches("/api/*/orders", "/api/42/invoices"));
    }

    #[test]
    fn test_wildcard_escapes_literal_characters() {
        assert!(path_matches("/files/*.json", "/files/data.json"));
        assert!(!path_matches("/files/*.json", "/files/dataxjson"));
    }

    #[test]
    fn test_prefix_match() {
        let pattern = PathPattern::compile("/static/");
        assert!(pattern.matches("/static/css/site.css"));
        assert!(pattern.matches("/static"));
        assert!(!pattern.matches("/other/static/"));
    }

    #[test]
    fn test_parameters_match() {
        let mut required = BTreeMap::new();
        required.insert("type".to_string(), "user".to_string());

        let mut query = BTreeMap::new();
        query.insert("type".to_string(), "user".to_string());
        query.insert("extra".to_string(), "1".to_string());
        assert!(parameters_match(&required, &query));

        query.insert("type".to_string(), "admin".to_string());
        assert!(!parameters_match(&required, &query));

        assert!(!parameters_match(&required, &BTreeMap::new()));
    }

    #[test]
    fn test_compiled_route_method_case_insensitive() {
        let compiled = CompiledRoute::compile(Route::new("get", "/health"));
        assert!(compiled.matches(&MockRequest::new("GET", "/health", None)));
        assert!(!compiled.matches(&MockRequest::new("POST", "/health", None)));
    }

    #[test]
    fn test_find_matching_route_first_wins() {
        let routes = vec![
            CompiledRoute::compile(Route::new("GET", "/api/*").with_response("wildcard")),
            CompiledRoute::compile(Route::new("GET", "/api/users").with_response("exact")),
        ];
        let request = MockRequest::new("GET", "/api/users", None);
        let (route, index) = find_matching_route(&routes, &request).unwrap();
        assert_eq!(index, 0);
        assert_eq!(route.response.as_text(), Some("wildcard"));
    }

    #[test]
    fn test_find_matching_route_none() {
        let routes = vec![CompiledRoute::compile(Route::new("GET", "/a"))];
        assert!(find_matching_route(&routes, &MockRequest::new("GET", "/b", None)).is_none());
        assert!(find_matching_route(&[], &MockRequest::new("GET", "/a", None)).is_none());
    }
}
