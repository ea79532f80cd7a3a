//! Application settings loaded from `config.toml`.
//!
//! The file is optional: every field has a default, and a few environment
//! variables override whatever the file says. This keeps the CSV source path
//! and bind address out of the code.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// CSV ingestion settings
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. `0.0.0.0:8000`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Ingestion source settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    /// Path of the CSV file loaded by `POST /load-products`
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/sales.csv")
}

/// Parses settings from a TOML string.
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads the application configuration.
///
/// Reads the file named by `SALES_CONFIG` (default `./config.toml`); a missing
/// default file yields the built-in defaults. `BIND_ADDR` and `PRODUCTS_CSV_PATH`
/// then override the corresponding fields.
///
/// # Errors
/// Returns an error if an explicitly named file is missing, or any file fails to parse.
pub fn load_app_configuration() -> Result<AppConfig> {
    let config = match std::env::var("SALES_CONFIG") {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new("config.toml").exists() => load_config("config.toml")?,
        Err(_) => {
            info!("No config.toml found, using defaults");
            AppConfig::default()
        }
    };

    Ok(apply_overrides(
        config,
        std::env::var("BIND_ADDR").ok(),
        std::env::var("PRODUCTS_CSV_PATH").ok(),
    ))
}

fn apply_overrides(
    mut config: AppConfig,
    bind_addr: Option<String>,
    csv_path: Option<String>,
) -> AppConfig {
    if let Some(addr) = bind_addr {
        config.server.bind_addr = addr;
    }
    if let Some(path) = csv_path {
        config.ingestion.csv_path = PathBuf::from(path);
    }
    config
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_addr = "127.0.0.1:9000"

            [ingestion]
            csv_path = "/srv/feeds/amazon_sales_data_2025.csv"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(
            config.ingestion.csv_path,
            PathBuf::from("/srv/feeds/amazon_sales_data_2025.csv")
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.ingestion.csv_path, PathBuf::from("data/sales.csv"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[server]\nbind_addr = 8000");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_env_overrides_win() {
        let config = apply_overrides(
            AppConfig::default(),
            Some("127.0.0.1:1234".to_string()),
            Some("feed.csv".to_string()),
        );
        assert_eq!(config.server.bind_addr, "127.0.0.1:1234");
        assert_eq!(config.ingestion.csv_path, PathBuf::from("feed.csv"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
