//! Configuration loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculate::EngineConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Lichess source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LichessConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_lichess_url")]
    pub base_url: String,

    /// Number of most recent games to fetch
    #[serde(default = "default_max_games")]
    pub max_games: u32,

    /// Only fetch rated games
    #[serde(default = "default_enabled")]
    pub rated: bool,

    /// Speed categories to fetch, e.g. "rapid", "classical"
    #[serde(default = "default_perf_types")]
    pub perf_types: Vec<String>,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_enabled() -> bool {
    true
}

fn default_lichess_url() -> String {
    "https://lichess.org".to_string()
}

fn default_max_games() -> u32 {
    20
}

fn default_perf_types() -> Vec<String> {
    vec!["rapid".to_string(), "classical".to_string()]
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("chess-profile/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LichessConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_lichess_url(),
            max_games: default_max_games(),
            rated: default_enabled(),
            perf_types: default_perf_types(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Request dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Deadline for fetching and profiling one user
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    90
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub lichess: LichessConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            dispatch: DispatchConfig::default(),
            lichess: LichessConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from `path`, or use defaults if it doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML configuration.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.dispatch.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.lichess.enabled {
            if self.lichess.timeout_seconds == 0 {
                return Err(ConfigError::ValidationError(
                    "Lichess timeout must be greater than 0".to_string(),
                ));
            }
            if self.lichess.max_games == 0 {
                return Err(ConfigError::ValidationError(
                    "Lichess max_games must be greater than 0".to_string(),
                ));
            }
            url::Url::parse(&self.lichess.base_url).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid Lichess base_url: {}", e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.opening_moves, 2);
        assert_eq!(config.engine.top_openings, 3);
        assert_eq!(config.dispatch.request_timeout_seconds, 90);
        assert!(config.lichess.enabled);
    }

    #[test]
    fn test_lichess_config_default() {
        let lichess = LichessConfig::default();

        assert_eq!(lichess.base_url, "https://lichess.org");
        assert_eq!(lichess.max_games, 20);
        assert!(lichess.rated);
        assert_eq!(lichess.perf_types, vec!["rapid", "classical"]);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_engine() {
        let mut config = AppConfig::default();
        config.engine.opening_moves = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_disabled_lichess_skips_checks() {
        let mut config = AppConfig::default();
        config.lichess.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.lichess.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [engine]
            opening_moves = 3

            [lichess]
            max_games = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine.opening_moves, 3);
        assert_eq!(config.engine.top_openings, 3);
        assert_eq!(config.lichess.max_games, 50);
        assert_eq!(config.lichess.base_url, "https://lichess.org");
    }

    #[test]
    fn test_negative_top_openings_rejected() {
        let result = AppConfig::from_toml("[engine]\ntop_openings = -1\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n[server]\nport = 9090").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed = AppConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config.engine, parsed.engine);
    }
}
