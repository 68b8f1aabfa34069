use std::io;

use chrono::{TimeZone, Utc};
use common_logger::resolvers::{context_fields, resolve_json_request};
use common_logger::{opts, Body, JsonSink, LineLogger, LogContext, LogOption, Logger, LoggerConfig};
use http::Request;

fn main() {
    // Sink level comes from COMMON_LOGGER_LEVEL (default `info`).
    let sink = JsonSink::stdout_from_env();

    let logger = Logger::new(
        sink,
        LoggerConfig::default()
            // every logged context contributes its request id
            .with_context_resolver(context_fields([("x-request-id", "x-request-id")]))
            // requests are expected to carry JSON bodies
            .with_request_resolver(resolve_json_request),
    );

    // fixed so the output below is reproducible
    let now = Utc.with_ymd_and_hms(2006, 1, 2, 4, 5, 6).unwrap();

    let ctx = LogContext::new().with_value("x-request-id", "0000-1111-2222-3333");
    let mut req = match Request::get("http://example.com/")
        .body(Body::from("{\"key\":\"value\"}"))
    {
        Ok(req) => req,
        Err(e) => {
            eprintln!("invalid request: {}", e);
            return;
        }
    };

    logger.info(opts![&ctx, &mut req, "we receive a request", now]);
    // {"level":"info","msg":"we receive a request","request":{"body":{"key":"value"},"headers":{},"method":"GET","url":"http://example.com/"},"time":"2006-01-02T04:05:06Z","x-request-id":"0000-1111-2222-3333"}

    logger.debug(opts![&ctx, "some debug line", now]);
    // filtered out unless COMMON_LOGGER_LEVEL=debug

    let err = io::Error::new(io::ErrorKind::Other, "some error");
    logger.error(opts![&ctx, LogOption::error(&err), now]);
    // {"error":"some error","level":"error","msg":"","time":"2006-01-02T04:05:06Z","x-request-id":"0000-1111-2222-3333"}

    logger.flush();
}
