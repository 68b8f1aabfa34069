use common_logger::init::init_tracing;
use common_logger::resolvers::{context_fields, resolve_json_response};
use common_logger::{opts, Body, LineLogger, LogContext, Logger, LoggerConfig, TracingSink};
use http::Response;

fn main() {
    // COMMON_LOGGER_FORMAT=pretty for human-readable output
    init_tracing();

    let logger = Logger::new(
        TracingSink,
        LoggerConfig::default()
            .with_context_resolver(context_fields([("x-request-id", "request_id")]))
            .with_response_resolver(resolve_json_response),
    );

    let ctx = LogContext::new().with_value("x-request-id", "abc");
    let mut resp = Response::new(Body::from("{\"status\":\"ok\"}"));

    logger.info(opts![&ctx, &mut resp, "upstream answered"]);
    logger.warn(opts![&ctx, "retry budget at 10%"]);
}
