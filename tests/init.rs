#![cfg(feature = "subscriber")]

use common_logger::init::{try_init_tracing, InitError, OutputFormat, TracingConfig};
use common_logger::{opts, LineLogger, Logger, LoggerConfig, TracingSink};

#[test]
fn second_install_is_rejected() {
    try_init_tracing(TracingConfig {
        filter: "info".to_string(),
        format: OutputFormat::Json,
    })
    .unwrap();

    let logger = Logger::new(TracingSink, LoggerConfig::default());
    logger.info(opts!["forwarded through the global subscriber"]);

    let err = try_init_tracing(TracingConfig::default()).unwrap_err();
    assert!(matches!(err, InitError::AlreadyInstalled(_)));
}
