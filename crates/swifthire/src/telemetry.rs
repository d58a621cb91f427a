use std::net::SocketAddr;

use tracing::Span;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{AppEnvironment, TelemetryConfig};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter '{value}' is not a valid tracing directive")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("a global subscriber is already installed")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Resolves the filter from `RUST_LOG` first, then the configured level.
pub fn filter_for(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs the compact subscriber. Test runs write through the captured test writer.
pub fn init(config: &TelemetryConfig, environment: AppEnvironment) -> Result<(), TelemetryError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config)?)
        .with_target(false)
        .with_ansi(false)
        .compact();

    let installed = match environment {
        AppEnvironment::Test => builder.with_test_writer().try_init(),
        AppEnvironment::Development | AppEnvironment::Production => builder.try_init(),
    };
    installed.map_err(TelemetryError::AlreadyInstalled)
}

/// Root span for a running API. Every request event logged inside it carries
/// the deployment stage and the bound address.
pub fn service_span(environment: AppEnvironment, addr: SocketAddr) -> Span {
    tracing::info_span!("swifthire", env = environment.label(), %addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_log_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "swifthire=[".to_string(),
        };
        let err = filter_for(&config).expect_err("filter should not parse");
        assert!(matches!(err, TelemetryError::Filter { .. }));
    }

    #[test]
    fn accepts_per_module_directives() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "info,swifthire::workflows=debug".to_string(),
        };
        assert!(filter_for(&config).is_ok());
    }
}
