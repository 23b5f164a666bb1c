//! Tracing subscriber setup
//!
//! Installs a global `tracing-subscriber` registry with an [`EnvFilter`] and a
//! human-readable or JSON fmt layer, driven by [`LoggingConfig`].
//!
//! `RUST_LOG`, when set, wins over the configured level.

use chairside_domain::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Tracing initialisation error
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// The configured level is not a valid filter directive
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },
}

/// Result type for observability setup
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Build the filter for `config`, preferring `RUST_LOG`.
///
/// # Errors
/// Returns `ObservabilityError::InvalidFilter` when `RUST_LOG` is unset and
/// `config.level` does not parse.
pub fn build_filter(config: &LoggingConfig) -> ObservabilityResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| ObservabilityError::InvalidFilter {
        directive: config.level.clone(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed (tests, or a
/// host application that set up its own), leaving that one in place.
///
/// # Errors
/// Returns `ObservabilityError::InvalidFilter` for an unparseable level.
pub fn init_tracing(config: &LoggingConfig) -> ObservabilityResult<bool> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, json = config.json, "Tracing initialised");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "chairside=loud".to_string(), json: false };
        assert!(matches!(build_filter(&config), Err(ObservabilityError::InvalidFilter { .. })));
    }

    #[test]
    fn test_second_init_is_a_no_op() {
        let config = LoggingConfig::default();
        init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }
}
