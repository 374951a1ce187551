use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub hotel_provider: HotelProviderConfig,
    pub exchange: ExchangeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub currency: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HotelProviderConfig {
    pub base_url: String,
    pub host: String,
    /// Environment variable that holds the API key
    pub api_key_env: String,
    pub currency: String,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl HotelProviderConfig {
    /// Key from the environment; never stored in config or code
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    #[serde(default = "default_exchange_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_timeout() -> u64 {
    30
}

fn default_exchange_timeout() -> u64 {
    10
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "db/app.db"

[server]
host = "0.0.0.0"
port = 3000

[uploads]
dir = "uploads"

[catalog]
currency = "USD"

[hotel_provider]
base_url = "https://agoda-com.p.rapidapi.com"
host = "agoda-com.p.rapidapi.com"
api_key_env = "HOTEL_PROVIDER_API_KEY"
currency = "USD"
timeout_secs = 30

[exchange]
base_url = "https://api.exchangerate-api.com/v4/latest"
timeout_secs = 10
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

/// Load once and keep for the process lifetime
pub fn initialize() -> anyhow::Result<&'static Config> {
    CONFIG.get_or_try_init(load_config)
}

pub fn get() -> anyhow::Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| anyhow::anyhow!("Configuration has not been initialized"))
}

/// Resolve a configured path: absolute as is, relative against the
/// executable directory, falling back to the current directory
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

pub fn get_uploads_dir(config: &Config) -> PathBuf {
    resolve_path(&config.uploads.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "db/app.db");
        assert_eq!(config.hotel_provider.api_key_env, "HOTEL_PROVIDER_API_KEY");
        assert_eq!(config.exchange.timeout_secs, 10);
    }

    #[test]
    fn test_optional_sections_have_defaults() {
        let minimal = r#"
            [database]
            path = "/var/lib/booking/app.db"

            [hotel_provider]
            base_url = "http://localhost:9000"
            host = "localhost"
            api_key_env = "TEST_PROVIDER_KEY_UNSET"
            currency = "EUR"

            [exchange]
            base_url = "http://localhost:9001"
        "#;
        let config: Config = toml::from_str(minimal).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.catalog.currency, "USD");
        assert_eq!(config.hotel_provider.timeout_secs, 30);
        assert!(config.hotel_provider.api_key().is_none());
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/booking/app.db")
        );
    }
}
