use std::net::SocketAddr;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::recruitment::RecruitmentError;

/// Failures that stop the API binary or the demo scenario.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("http server stopped: {0}")]
    Serve(#[source] std::io::Error),
    /// A hiring step refused by the workflow core (demo runs only).
    #[error("hiring step failed: {0}")]
    Hiring(#[from] RecruitmentError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn bind_failure_names_the_address() {
        let err = AppError::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(
            err.to_string(),
            "cannot listen on 127.0.0.1:3000: address in use"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn workflow_refusals_keep_their_message() {
        let err = AppError::from(RecruitmentError::validation("Job title is required."));
        assert_eq!(err.to_string(), "hiring step failed: Job title is required.");
    }
}
