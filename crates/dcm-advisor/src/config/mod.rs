use crate::workflows::myelopathy::{AssessmentEngine, FallbackPolicy, RuleConfig, RuleConfigError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineSettings,
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

        let rules_path = env::var("DCM_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let fallback_policy = match env::var("DCM_FALLBACK_POLICY") {
            Ok(value) => FallbackPolicy::parse(&value)
                .ok_or(ConfigError::InvalidFallbackPolicy { value })?,
            Err(_) => FallbackPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineSettings {
                rules_path,
                fallback_policy,
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

/// Rule source and input handling for the assessment engine.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// JSON rules file; built-in thresholds apply when unset.
    pub rules_path: Option<PathBuf>,
    pub fallback_policy: FallbackPolicy,
}

impl EngineSettings {
    pub fn rules(&self) -> Result<RuleConfig, RuleConfigError> {
        match &self.rules_path {
            Some(path) => RuleConfig::from_json_path(path),
            None => Ok(RuleConfig::default()),
        }
    }

    pub fn build_engine(&self) -> Result<AssessmentEngine, RuleConfigError> {
        self.rules().map(AssessmentEngine::new)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFallbackPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFallbackPolicy { value } => write!(
                f,
                "DCM_FALLBACK_POLICY must be 'lenient' or 'strict', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidFallbackPolicy { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
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
        env::remove_var("DCM_RULES_PATH");
        env::remove_var("DCM_FALLBACK_POLICY");
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
        assert_eq!(config.engine.rules_path, None);
        assert_eq!(config.engine.fallback_policy, FallbackPolicy::Lenient);
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
    fn reads_fallback_policy_and_rejects_unknown_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DCM_FALLBACK_POLICY", "Strict");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.engine.fallback_policy, FallbackPolicy::Strict);

        env::set_var("DCM_FALLBACK_POLICY", "sometimes");
        let error = AppConfig::load().expect_err("unknown policy rejected");
        assert!(matches!(error, ConfigError::InvalidFallbackPolicy { .. }));
        reset_env();
    }

    #[test]
    fn missing_rules_file_surfaces_when_building_the_engine() {
        let settings = EngineSettings {
            rules_path: Some(PathBuf::from("./no-such-rules.json")),
            fallback_policy: FallbackPolicy::Lenient,
        };
        assert!(matches!(
            settings.build_engine(),
            Err(RuleConfigError::Read { .. })
        ));
        assert!(EngineSettings::default().build_engine().is_ok());
    }
}
