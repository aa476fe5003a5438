//! Listener, TLS and logging settings.

use clap::ValueEnum;
use std::path::PathBuf;

/// TLS configuration for the HTTPS listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Log verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Runtime settings for one server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// 0 asks the OS for an ephemeral port
    pub port: u16,
    /// Absolute path of the YAML route file
    pub config_path: PathBuf,
    pub log_level: LogLevel,
    /// TLS configuration (serves HTTPS when present)
    pub tls: Option<TlsConfig>,
    /// HTML page served at `/_mock/ui`
    pub ui_template: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_ui_template() -> PathBuf {
    PathBuf::from("internal/templates/web_ui.html")
}

impl ServerConfig {
    /// Build a config, resolving a relative route file path against the working directory.
    pub fn new(port: u16, config_path: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let config_path = config_path.into();
        let config_path = if config_path.is_absolute() {
            config_path
        } else {
            std::env::current_dir()?.join(config_path)
        };
        Ok(Self {
            host: default_host(),
            port,
            config_path,
            log_level: LogLevel::default(),
            tls: None,
            ui_template: default_ui_template(),
        })
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_ui_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.ui_template = path.into();
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls.is_some() {
            "https"
        } else {
            "http"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_config_path_is_resolved() {
        let config = ServerConfig::new(8080, "app/mock_response.yaml").unwrap();
        assert!(config.config_path.is_absolute());
        assert!(config.config_path.ends_with("app/mock_response.yaml"));
        assert_eq!(config.scheme(), "http");
    }

    #[test]
    fn test_absolute_config_path_kept() {
        let config = ServerConfig::new(0, "/etc/mock/routes.yaml").unwrap();
        assert_eq!(config.config_path, PathBuf::from("/etc/mock/routes.yaml"));
    }

    #[test]
    fn test_tls_switches_scheme() {
        let config = ServerConfig::new(8443, "/r.yaml")
            .unwrap()
            .with_tls(TlsConfig {
                cert_path: "server.crt".into(),
                key_path: "server.key".into(),
            });
        assert_eq!(config.scheme(), "https");
    }

    #[test]
    fn test_log_level_carried_into_config() {
        let config = ServerConfig::new(8080, "/r.yaml").unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        let config = config.with_log_level(LogLevel::Debug);
        assert_eq!(config.log_level.as_str(), "debug");
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::default().as_str(), "info");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }
}
