use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::recruitment::WorkflowLimits;

pub const DEFAULT_ASSISTANT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_ASSISTANT_MODEL: &str = "deepseek/deepseek-chat";

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

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assistant: AssistantConfig,
    pub limits: WorkflowLimits,
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

        let assistant = AssistantConfig {
            endpoint: env::var("ASSISTANT_API_URL")
                .unwrap_or_else(|_| DEFAULT_ASSISTANT_URL.to_string()),
            api_key: env::var("ASSISTANT_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| DEFAULT_ASSISTANT_MODEL.to_string()),
            timeout: Duration::from_secs(numeric_var("ASSISTANT_TIMEOUT_SECS", 20)?),
        };
        if assistant.timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                key: "ASSISTANT_TIMEOUT_SECS",
                expected: "at least 1 second",
            });
        }

        let defaults = WorkflowLimits::default();
        let limits = WorkflowLimits {
            basic_job_post_cap: numeric_var("BASIC_JOB_POST_CAP", defaults.basic_job_post_cap)?,
            basic_application_cap: numeric_var(
                "BASIC_APPLICATION_CAP",
                defaults.basic_application_cap,
            )?,
            profile_completion_threshold: numeric_var(
                "PROFILE_COMPLETION_THRESHOLD",
                defaults.profile_completion_threshold,
            )?,
            match_profile_minimum: numeric_var(
                "MATCH_PROFILE_MINIMUM",
                defaults.match_profile_minimum,
            )?,
        };
        for (key, value) in [
            ("PROFILE_COMPLETION_THRESHOLD", limits.profile_completion_threshold),
            ("MATCH_PROFILE_MINIMUM", limits.match_profile_minimum),
        ] {
            if value > 100 {
                return Err(ConfigError::OutOfRange {
                    key,
                    expected: "a percentage between 0 and 100",
                });
            }
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assistant,
            limits,
        })
    }
}

fn numeric_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
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

/// Connection settings for the chat-completion provider. Without an API key every
/// assistant call resolves to its fallback payload.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ASSISTANT_URL.to_string(),
            api_key: None,
            model: DEFAULT_ASSISTANT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    OutOfRange {
        key: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::OutOfRange { key, expected } => write!(f, "{key} must be {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
