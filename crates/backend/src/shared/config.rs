use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub maps: MapsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used when issuing signed document links
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub documents_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            documents_dir: "target/storage/documents".to_string(),
        }
    }
}

/// Transactional email provider (HTTP JSON API with bearer key)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from_address: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapsConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: None,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
public_url = "http://localhost:3000"

[database]
path = "target/db/app.db"

[storage]
documents_dir = "target/storage/documents"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Load once and keep for the lifetime of the process
pub fn init() -> anyhow::Result<&'static Config> {
    CONFIG.get_or_try_init(load_config)
}

/// Process-wide configuration. Falls back to the embedded default when
/// `init` has not run (unit tests).
pub fn get() -> &'static Config {
    CONFIG.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config {
                server: ServerConfig::default(),
                database: DatabaseConfig {
                    path: "target/db/app.db".to_string(),
                },
                storage: StorageConfig::default(),
                email: EmailConfig::default(),
                maps: MapsConfig::default(),
            }
        })
    })
}

/// Resolve a configured path: absolute as is, relative against the
/// executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}

pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

pub fn get_documents_dir(config: &Config) -> PathBuf {
    resolve_path(&config.storage.documents_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert!(config.email.api_key.is_none());
        assert!(config.maps.api_base_url.starts_with("https://"));
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"/var/lib/app.db\"\n").unwrap();
        assert_eq!(config.storage.documents_dir, "target/storage/documents");
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/app.db")
        );
    }

    #[test]
    fn test_email_section_parses() {
        let src = r#"
[database]
path = "db.sqlite"

[email]
api_url = "https://api.resend.com/emails"
api_key = "re_test"
from_address = "noreply@example.com"
"#;
        let config: Config = toml::from_str(src).unwrap();
        assert_eq!(config.email.api_key.as_deref(), Some("re_test"));
    }
}
