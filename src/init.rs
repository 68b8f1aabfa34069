use crate::env::{self, COMMON_LOGGER_FORMAT_ENV, COMMON_LOGGER_LEVEL_ENV};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Output format of the installed `fmt` layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
}

/// Configuration of the global `tracing` subscriber.
///
/// Only needed by applications that forward records through
/// [`TracingSink`](crate::tracing_sink::TracingSink) and have no
/// subscriber of their own.
///
/// **Fields**
/// - `filter`: `EnvFilter` directive string, e.g. `info` or
///   `info,common_logger=debug`.
/// - `format`: one JSON object per event, or human-readable lines.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub filter: String,
    pub format: OutputFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: OutputFormat::Json,
        }
    }
}

impl TracingConfig {
    /// Read `COMMON_LOGGER_LEVEL` and `COMMON_LOGGER_FORMAT`.
    ///
    /// Any format other than `pretty` selects JSON.
    pub fn from_env() -> Self {
        let format = match env::env_or(COMMON_LOGGER_FORMAT_ENV, "json")
            .to_ascii_lowercase()
            .as_str()
        {
            "pretty" => OutputFormat::Pretty,
            _ => OutputFormat::Json,
        };
        Self {
            filter: env::env_or(COMMON_LOGGER_LEVEL_ENV, "info"),
            format,
        }
    }
}

/// Error type returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a [`Registry`] with an [`EnvFilter`] and a `fmt` layer as the
/// global default subscriber.
///
/// **Returns**
/// - `Ok(())` once the subscriber is installed.
/// - `Err(..)` if `filter` does not parse or another subscriber was
///   installed first.
pub fn try_init_tracing(config: TracingConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(&config.filter)?;

    // The two formats produce different layer types, so each branch
    // assembles its own subscriber.
    match config.format {
        OutputFormat::Json => Registry::default()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        OutputFormat::Pretty => Registry::default()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }
    Ok(())
}

/// Initialize tracing from the environment.
///
/// Equivalent to calling [`try_init_tracing`] with
/// [`TracingConfig::from_env`].
///
/// # Panics
///
/// Panics if the filter is invalid or a global subscriber already exists.
pub fn init_tracing() {
    if let Err(e) = try_init_tracing(TracingConfig::from_env()) {
        panic!("failed to initialize tracing: {}", e);
    }
}
