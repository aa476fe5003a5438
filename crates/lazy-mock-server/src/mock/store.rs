//! RouteStore - the single owner of the live route collection.
//!
//! Writers take the exclusive lock and swap in a modified copy of the
//! collection; readers take the shared lock only long enough to clone the
//! `Arc` of the current collection. Matching and rendering then run on that
//! snapshot without holding any lock.

use super::matcher::{find_matching_route, CompiledRoute};
use super::request::MockRequest;
use super::types::{Route, RouteError};
use parking_lot::RwLock;
use std::sync::Arc;

/// Point-in-time view of the route collection.
pub type RouteSnapshot = Arc<Vec<CompiledRoute>>;

/// Thread-safe, insertion-ordered route collection.
#[derive(Debug, Default)]
pub struct RouteStore {
    routes: RwLock<RouteSnapshot>,
}

impl RouteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with validated routes
    pub fn with_routes(routes: Vec<Route>) -> Result<Self, RouteError> {
        let store = Self::new();
        store.set_all(routes)?;
        Ok(store)
    }

    /// Replace the whole collection.
    ///
    /// Every route is validated first; on failure the current collection is
    /// left untouched.
    pub fn set_all(&self, routes: Vec<Route>) -> Result<(), RouteError> {
        let compiled = compile_all(routes)?;
        *self.routes.write() = Arc::new(compiled);
        Ok(())
    }

    /// Alias of [`RouteStore::set_all`] used at start-up and on reload.
    pub fn load(&self, routes: Vec<Route>) -> Result<(), RouteError> {
        self.set_all(routes)
    }

    /// Cheap snapshot of the current collection.
    pub fn snapshot(&self) -> RouteSnapshot {
        self.routes.read().clone()
    }

    /// Copy of all routes in store order.
    pub fn list(&self) -> Vec<Route> {
        self.snapshot().iter().map(|c| c.route.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Validate and append a route. Returns the stored copy.
    pub fn add(&self, route: Route) -> Result<Route, RouteError> {
        route.validate()?;
        let compiled = CompiledRoute::compile(route.clone());
        let mut guard = self.routes.write();
        Arc::make_mut(&mut *guard).push(compiled);
        Ok(route)
    }

    /// Literal lookup by path and method (no pattern matching).
    pub fn find_exact(&self, path: &str, method: &str) -> Result<Route, RouteError> {
        self.snapshot()
            .iter()
            .find(|c| c.route.has_identity(path, method))
            .map(|c| c.route.clone())
            .ok_or_else(|| not_found(path, method))
    }

    /// Remove every route whose literal path equals `path`, whatever its method.
    /// Returns how many routes were removed.
    pub fn delete_by_path(&self, path: &str) -> Result<usize, RouteError> {
        let mut guard = self.routes.write();
        let before = guard.len();
        if !guard.iter().any(|c| c.route.path == path) {
            return Err(RouteError::PathNotFound(path.to_string()));
        }
        Arc::make_mut(&mut *guard).retain(|c| c.route.path != path);
        Ok(before - guard.len())
    }

    /// Remove the first route with the given path and method.
    pub fn delete_exact(&self, path: &str, method: &str) -> Result<Route, RouteError> {
        let mut guard = self.routes.write();
        let index = guard
            .iter()
            .position(|c| c.route.has_identity(path, method))
            .ok_or_else(|| not_found(path, method))?;
        Ok(Arc::make_mut(&mut *guard).remove(index).route)
    }

    /// Replace the first route with the given path and method, keeping its position.
    pub fn update_by_identity(
        &self,
        path: &str,
        method: &str,
        new_route: Route,
    ) -> Result<Route, RouteError> {
        new_route.validate()?;
        let mut guard = self.routes.write();
        let index = guard
            .iter()
            .position(|c| c.route.has_identity(path, method))
            .ok_or_else(|| not_found(path, method))?;
        Arc::make_mut(&mut *guard)[index] = CompiledRoute::compile(new_route.clone());
        Ok(new_route)
    }

    /// Bulk-delete every route at `path`, then append `new_route`, under one lock.
    pub fn replace_by_path(&self, path: &str, new_route: Route) -> Result<Route, RouteError> {
        new_route.validate()?;
        let mut guard = self.routes.write();
        if !guard.iter().any(|c| c.route.path == path) {
            return Err(RouteError::PathNotFound(path.to_string()));
        }
        let routes = Arc::make_mut(&mut *guard);
        routes.retain(|c| c.route.path != path);
        routes.push(CompiledRoute::compile(new_route.clone()));
        Ok(new_route)
    }

    /// Deep copy of the collection, decoupled from later mutation.
    pub fn clone_routes(&self) -> Vec<Route> {
        self.list()
    }

    /// First route matching the request, evaluated on a snapshot.
    pub fn find_matching_route(&self, request: &MockRequest) -> Option<(Route, usize)> {
        let snapshot = self.snapshot();
        find_matching_route(&snapshot, request)
    }
}

fn compile_all(routes: Vec<Route>) -> Result<Vec<CompiledRoute>, RouteError> {
    routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| {
            route
                .validate()
                .map_err(|source| RouteError::InvalidRoute { index, source })?;
            Ok(CompiledRoute::compile(route))
        })
        .collect()
}

fn not_found(path: &str, method: &str) -> RouteError {
    RouteError::NotFound {
        method: method.to_string(),
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::types::ValidationError;

    fn sample_store() -> RouteStore {
        RouteStore::with_routes(vec![
            Route::new("GET", "/x").with_response("get x"),
            Route::new("POST", "/x").with_response("post x"),
            Route::new("GET", "/y").with_response("get y"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = RouteStore::new();
        assert!(store.list().is_empty());
        assert_eq!(store.count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = RouteStore::new();
        store.add(Route::new("GET", "/b")).unwrap();
        store.add(Route::new("GET", "/a")).unwrap();
        store.add(Route::new("GET", "/b")).unwrap();
        let paths: Vec<_> = store.list().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/b", "/a", "/b"]);
    }

    #[test]
    fn test_set_all_rejects_invalid_and_keeps_current() {
        let store = sample_store();
        let err = store
            .set_all(vec![Route::new("GET", "/ok"), Route::new("", "/bad")])
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::InvalidRoute {
                index: 1,
                source: ValidationError::EmptyMethod
            }
        ));
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_find_exact() {
        let store = sample_store();
        let route = store.find_exact("/x", "POST").unwrap();
        assert_eq!(route.response.as_text(), Some("post x"));
        assert!(store.find_exact("/x", "PUT").unwrap_err().is_not_found());
        assert!(store.find_exact("/x/", "GET").is_err());
    }

    #[test]
    fn test_identity_lookups_compare_method_literally() {
        let store = sample_store();
        assert!(store.find_exact("/x", "get").unwrap_err().is_not_found());
        assert!(store.delete_exact("/x", "post").unwrap_err().is_not_found());
        assert!(store
            .update_by_identity("/x", "get", Route::new("GET", "/x"))
            .unwrap_err()
            .is_not_found());
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_delete_by_path_removes_all_methods() {
        let store = sample_store();
        assert_eq!(store.delete_by_path("/x").unwrap(), 2);
        assert_eq!(store.count(), 1);
        assert!(matches!(
            store.delete_by_path("/x"),
            Err(RouteError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_delete_exact_removes_one() {
        let store = sample_store();
        let removed = store.delete_exact("/x", "GET").unwrap();
        assert_eq!(removed.method, "GET");
        assert_eq!(store.count(), 2);
        assert!(store.find_exact("/x", "POST").is_ok());
    }

    #[test]
    fn test_update_by_identity_keeps_position() {
        let store = sample_store();
        store
            .update_by_identity("/x", "POST", Route::new("PUT", "/x2"))
            .unwrap();
        let routes = store.list();
        assert_eq!(routes[1].method, "PUT");
        assert_eq!(routes[1].path, "/x2");
        assert!(store
            .update_by_identity("/missing", "GET", Route::new("GET", "/m"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_by_identity_validates_first() {
        let store = sample_store();
        let err = store
            .update_by_identity("/x", "GET", Route::new("GET", "/x").with_status(700))
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::Validation(ValidationError::InvalidStatusCode(700))
        ));
        assert_eq!(store.find_exact("/x", "GET").unwrap().status_code, 0);
    }

    #[test]
    fn test_replace_by_path() {
        let store = sample_store();
        store
            .replace_by_path("/x", Route::new("DELETE", "/x"))
            .unwrap();
        let routes = store.list();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/y");
        assert_eq!(routes[1].method, "DELETE");
        assert!(store
            .replace_by_path("/nope", Route::new("GET", "/nope"))
            .is_err());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_snapshot_is_isolated_from_writes() {
        let store = sample_store();
        let snapshot = store.snapshot();
        store.delete_by_path("/x").unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_clone_routes_is_deep_copy() {
        let store = sample_store();
        let mut copy = store.clone_routes();
        copy[0].path = "/changed".to_string();
        assert_eq!(store.list()[0].path, "/x");
    }
}
