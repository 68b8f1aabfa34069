//! Environment variable names used by this crate for configuring output
//! without code changes.
//!
//! These are purely helpers; the core logger and sinks never read the
//! environment on their own.

/// Maximum level, e.g. `debug` or `warn`. Read by
/// [`JsonSink::stdout_from_env`](crate::json_sink::JsonSink::stdout_from_env)
/// and used as the default filter directive by `TracingConfig::from_env`.
pub const COMMON_LOGGER_LEVEL_ENV: &str = "COMMON_LOGGER_LEVEL";

/// Output format of the installed `tracing` subscriber: `json` or `pretty`.
pub const COMMON_LOGGER_FORMAT_ENV: &str = "COMMON_LOGGER_FORMAT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_falls_back() {
        assert_eq!(env_or("COMMON_LOGGER_TEST_SURELY_UNSET", "info"), "info");
    }
}
