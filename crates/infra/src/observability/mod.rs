//! Tracing subscriber setup
//!
//! The library crates only emit `tracing` events; installing a subscriber is
//! left to the binary embedding them, through [`init_tracing`].

use keyward_domain::{KeywardError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the event filter for `config`
///
/// `RUST_LOG` takes precedence over the configured directive when set.
///
/// # Errors
/// Returns `KeywardError::Config` if the directive cannot be parsed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| KeywardError::Config(format!("Invalid log filter `{}`: {e}", config.filter)))
}

/// Install the global tracing subscriber
///
/// Emits human-readable lines by default and one JSON object per event when
/// `config.json` is set. Calling this again after a subscriber is installed is
/// a no-op.
///
/// # Errors
/// Returns `KeywardError::Config` if the filter directive is invalid.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(false),
            )
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}
