//! RouteManager - management operations over the route store.
//!
//! This is the only place the management API mutates routes. It validates
//! candidates, delegates to [`RouteStore`], keeps the route gauge current and
//! handles saving to / reloading from the YAML file.

use super::request::MockRequest;
use super::store::RouteStore;
use super::types::{Route, RouteError};
use crate::config::MockConfig;
use crate::metrics;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Management facade over a shared [`RouteStore`]
pub struct RouteManager {
    store: Arc<RouteStore>,
    config_path: PathBuf,
}

impl RouteManager {
    /// Wrap an existing store; `config_path` is where save/reload read and write
    pub fn new(store: Arc<RouteStore>, config_path: impl Into<PathBuf>) -> Self {
        let manager = Self {
            store,
            config_path: config_path.into(),
        };
        metrics::set_routes_configured(manager.store.count());
        manager
    }

    /// Load the route file at `config_path` into a fresh store
    pub fn from_file(config_path: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let config_path = config_path.into();
        let config = MockConfig::from_file(&config_path)?;
        let store = RouteStore::with_routes(config.routes)?;
        info!(
            "Loaded {} routes from {}",
            store.count(),
            config_path.display()
        );
        Ok(Self::new(Arc::new(store), config_path))
    }

    pub fn store(&self) -> &Arc<RouteStore> {
        &self.store
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// First route matching a mock request
    pub fn find_matching_route(&self, request: &MockRequest) -> Option<(Route, usize)> {
        self.store.find_matching_route(request)
    }

    /// All routes and their count
    pub fn list_routes(&self) -> (Vec<Route>, usize) {
        let routes = self.store.list();
        let count = routes.len();
        (routes, count)
    }

    /// Validate and append a route
    pub fn add_route(&self, candidate: Route) -> Result<Route, RouteError> {
        let route = self.store.add(candidate)?;
        info!("Added new route: {} {}", route.method, route.path);
        self.refresh_gauge();
        Ok(route)
    }

    /// Exact lookup by path and method
    pub fn get_route(&self, path: &str, method: &str) -> Result<Route, RouteError> {
        self.store.find_exact(path, method)
    }

    /// Update the route(s) at `path`.
    ///
    /// Without a method every route at that literal path is removed and the
    /// candidate appended. With a method only that (path, method) route is
    /// replaced, in place.
    pub fn update_route(
        &self,
        path: &str,
        method: Option<&str>,
        candidate: Route,
    ) -> Result<Route, RouteError> {
        let route = match method {
            Some(method) => self.store.update_by_identity(path, method, candidate)?,
            None => self.store.replace_by_path(path, candidate)?,
        };
        info!("Updated route: {} {}", route.method, route.path);
        self.refresh_gauge();
        Ok(route)
    }

    /// Delete the route(s) at `path`. Returns how many were removed.
    pub fn delete_route(&self, path: &str, method: Option<&str>) -> Result<usize, RouteError> {
        let removed = match method {
            Some(method) => self.store.delete_exact(path, method).map(|_| 1)?,
            None => self.store.delete_by_path(path)?,
        };
        info!("Deleted route: {} ({} removed)", path, removed);
        self.refresh_gauge();
        Ok(removed)
    }

    /// Copy of the full configuration document
    pub fn get_full_config(&self) -> MockConfig {
        MockConfig::new(self.store.clone_routes())
    }

    /// Write the current routes to the config file.
    ///
    /// The routes are copied first, so no lock is held during file I/O.
    pub fn save_config(&self) -> Result<(), anyhow::Error> {
        let config = self.get_full_config();
        config.save_to(&self.config_path)?;
        info!(
            "Configuration saved to file: {}",
            self.config_path.display()
        );
        Ok(())
    }

    /// Re-read the config file and replace all routes. Returns the new route count.
    pub fn reload_config(&self) -> Result<usize, anyhow::Error> {
        let config = MockConfig::from_file(&self.config_path)?;
        if let Err(e) = self.store.set_all(config.routes) {
            warn!("Rejected reloaded configuration: {}", e);
            return Err(e.into());
        }
        let count = self.refresh_gauge();
        info!("Configuration reloaded successfully ({} routes)", count);
        Ok(count)
    }

    fn refresh_gauge(&self) -> usize {
        let count = self.store.count();
        metrics::set_routes_configured(count);
        count
    }
}
