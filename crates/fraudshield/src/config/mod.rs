use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::verification::SimulatedLatency;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub verification: VerificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let backend = StorageBackend::parse(
            &env::var("FRAUDSHIELD_STORE").unwrap_or_else(|_| "json".to_string()),
        )?;
        let data_dir = env::var("FRAUDSHIELD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let storage_key = env::var("FRAUDSHIELD_STORAGE_KEY")
            .unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty()
            || storage_key.contains(['/', '\\'])
            || storage_key.starts_with('.')
        {
            return Err(ConfigError::InvalidStorageKey(storage_key));
        }

        let latency_scale = env::var("FRAUDSHIELD_LATENCY_SCALE")
            .unwrap_or_else(|_| "1.0".to_string())
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|scale| (0.0..=SimulatedLatency::MAX_SCALE).contains(scale))
            .ok_or(ConfigError::InvalidLatencyScale)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                backend,
                data_dir,
                storage_key,
            },
            verification: VerificationConfig {
                latency: SimulatedLatency::scaled(latency_scale),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_STORAGE_KEY: &str = "fraudshield_applications";

/// Which application store backs the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    JsonFile,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "json" | "file" => Ok(Self::JsonFile),
            other => Err(ConfigError::InvalidStorageBackend(other.to_string())),
        }
    }
}

/// Location of the persisted application list.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl StorageConfig {
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }
}

/// Knobs for the mock verification provider.
#[derive(Debug, Clone, Copy)]
pub struct VerificationConfig {
    pub latency: SimulatedLatency,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStorageBackend(String),
    InvalidStorageKey(String),
    InvalidLatencyScale,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStorageBackend(value) => write!(
                f,
                "FRAUDSHIELD_STORE must be 'memory' or 'json' (got '{value}')"
            ),
            ConfigError::InvalidStorageKey(value) => write!(
                f,
                "FRAUDSHIELD_STORAGE_KEY must be a plain file stem (got '{value}')"
            ),
            ConfigError::InvalidLatencyScale => write!(
                f,
                "FRAUDSHIELD_LATENCY_SCALE must be a number between 0 and {}",
                SimulatedLatency::MAX_SCALE
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("FRAUDSHIELD_STORE");
        env::remove_var("FRAUDSHIELD_DATA_DIR");
        env::remove_var("FRAUDSHIELD_STORAGE_KEY");
        env::remove_var("FRAUDSHIELD_LATENCY_SCALE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.storage.backend, StorageBackend::JsonFile);
        assert_eq!(
            config.storage.storage_path(),
            PathBuf::from("./data").join("fraudshield_applications.json")
        );
        assert!(!config.verification.latency.is_disabled());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_unknown_store_backend() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUDSHIELD_STORE", "postgres");
        let err = AppConfig::load().expect_err("unknown backend rejected");
        assert!(matches!(err, ConfigError::InvalidStorageBackend(ref value) if value == "postgres"));
        reset_env();
    }

    #[test]
    fn rejects_storage_key_with_path_separators() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUDSHIELD_STORAGE_KEY", "../escape");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidStorageKey(_))
        ));
        reset_env();
    }

    #[test]
    fn zero_latency_scale_disables_delays() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUDSHIELD_LATENCY_SCALE", "0");
        env::set_var("FRAUDSHIELD_STORE", "memory");
        let config = AppConfig::load().expect("config loads");
        assert!(config.verification.latency.is_disabled());
        assert_eq!(config.storage.backend, StorageBackend::Memory);

        env::set_var("FRAUDSHIELD_LATENCY_SCALE", "-1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLatencyScale)
        ));
        reset_env();
    }

    #[test]
    fn rejects_latency_scale_beyond_maximum() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        for value in ["1e300", "inf", "NaN", "1000.5"] {
            env::set_var("FRAUDSHIELD_LATENCY_SCALE", value);
            assert!(
                matches!(AppConfig::load(), Err(ConfigError::InvalidLatencyScale)),
                "scale {value} accepted"
            );
        }

        env::set_var("FRAUDSHIELD_LATENCY_SCALE", "1000");
        assert!(AppConfig::load().is_ok());
        reset_env();
    }
}
