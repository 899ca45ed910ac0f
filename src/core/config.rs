//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Documentation page served over HTTP.
    pub docs: DocsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Locations of the documentation page sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Markdown document rendered at `GET /`.
    pub source_path: PathBuf,

    /// Icon served at `GET /favicon.ico`.
    pub favicon_path: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("README.md"),
            favicon_path: PathBuf::from("static/favicon.ico"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "FortunaMCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(path) = std::env::var("MCP_DOCS_PATH") {
            config.docs.source_path = PathBuf::from(path);
            info!("Documentation source set to {:?}", config.docs.source_path);
        }

        if let Ok(path) = std::env::var("MCP_FAVICON_PATH") {
            config.docs.favicon_path = PathBuf::from(path);
            info!("Favicon set to {:?}", config.docs.favicon_path);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "fortuna-test");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "fortuna-test");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }

    #[test]
    fn test_docs_paths_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DOCS_PATH", "/srv/docs/index.md");
            std::env::set_var("MCP_FAVICON_PATH", "/srv/docs/icon.ico");
        }
        let config = Config::from_env();
        assert_eq!(config.docs.source_path, PathBuf::from("/srv/docs/index.md"));
        assert_eq!(config.docs.favicon_path, PathBuf::from("/srv/docs/icon.ico"));
        unsafe {
            std::env::remove_var("MCP_DOCS_PATH");
            std::env::remove_var("MCP_FAVICON_PATH");
        }
    }

    #[test]
    fn test_docs_default_paths() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_DOCS_PATH");
            std::env::remove_var("MCP_FAVICON_PATH");
        }
        let config = Config::from_env();
        assert_eq!(config.docs.source_path, PathBuf::from("README.md"));
        assert_eq!(config.docs.favicon_path, PathBuf::from("static/favicon.ico"));
    }

    #[test]
    fn test_default_version_is_crate_version() {
        let config = Config::default();
        assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
    }
}
