//! Configuration types for the mock server.
//!
//! - `MockConfig`: the route document read from and written back to YAML
//! - `ServerConfig`: listener settings assembled from the command line

mod listen;

use crate::mock::Route;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use listen::{LogLevel, ServerConfig, TlsConfig};

/// Route configuration document: a single top-level `routes` sequence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MockConfig {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl MockConfig {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, anyhow::Error> {
        // An empty document is an empty route set
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("failed to parse YAML config")
    }

    pub fn to_yaml(&self) -> Result<String, anyhow::Error> {
        serde_yaml::to_string(self).context("failed to marshal config to YAML")
    }

    /// Overwrite the file at `path` with this document.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), anyhow::Error> {
        let path = path.as_ref();
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}
