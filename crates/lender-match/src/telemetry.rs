use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured level when it parses.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

/// Install the global fmt subscriber. Production output drops ANSI colors and targets.
pub fn init(config: &TelemetryConfig, environment: AppEnvironment) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;
    let production = environment == AppEnvironment::Production;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(!production)
        .compact()
        .with_ansi(!production)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env_guard;

    #[test]
    fn rejects_unparseable_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "lender_match=verbose".to_string(),
        };

        let err = build_filter(&config).expect_err("filter should not parse");
        assert!(err.to_string().contains("lender_match=verbose"));
    }

    #[test]
    fn accepts_directive_lists() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "info,lender_match::workflows::funding=debug".to_string(),
        };

        assert!(build_filter(&config).is_ok());
    }
}
