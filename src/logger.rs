use crate::clock::{Clock, SystemClock};
use crate::config::{LoggerConfig, Resolvers};
use crate::line::LineBuilder;
use crate::option::LogOption;
use crate::record::LogLine;
use crate::sink::LogSink;
use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// Severity methods exposed to application code.
///
/// Every method takes the options of one line; see [`LogOption`]. Nothing
/// is returned: a logging call never fails from the caller's point of view.
pub trait LineLogger {
    fn log<'a>(&self, level: Level, opts: Vec<LogOption<'a>>);

    fn debug<'a>(&self, opts: Vec<LogOption<'a>>) {
        self.log(Level::DEBUG, opts)
    }

    fn info<'a>(&self, opts: Vec<LogOption<'a>>) {
        self.log(Level::INFO, opts)
    }

    fn warn<'a>(&self, opts: Vec<LogOption<'a>>) {
        self.log(Level::WARN, opts)
    }

    fn error<'a>(&self, opts: Vec<LogOption<'a>>) {
        self.log(Level::ERROR, opts)
    }
}

/// Facade that merges log options into one record and hands it to a
/// [`LogSink`].
///
/// The resolver set and clock are fixed at construction. Cloning is cheap
/// and clones share the sink.
///
/// ```
/// use common_logger::{opts, resolvers, LineLogger, Logger, LoggerConfig, LogContext, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::new(
///     sink.clone(),
///     LoggerConfig::default()
///         .with_context_resolver(resolvers::context_fields([("x-request-id", "request_id")])),
/// );
///
/// let ctx = LogContext::new().with_value("x-request-id", "abc");
/// logger.info(opts![&ctx, "order accepted"]);
///
/// let records = sink.records();
/// assert_eq!(records[0].message, "order accepted");
/// assert_eq!(records[0].fields["request_id"], "abc");
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    resolvers: Resolvers,
    clock: Arc<dyn Clock>,
}

impl Logger {
    pub fn new<S>(sink: S, config: LoggerConfig) -> Self
    where
        S: LogSink + 'static,
    {
        Self::with_shared_sink(Arc::new(sink), config)
    }

    /// Like [`Logger::new`] for a sink that is already shared elsewhere.
    pub fn with_shared_sink(sink: Arc<dyn LogSink>, config: LoggerConfig) -> Self {
        Self {
            sink,
            resolvers: config.resolvers,
            clock: config.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        }
    }

    /// Build the line for `opts` without emitting it.
    pub fn build_line<'a, I>(&self, opts: I) -> LogLine
    where
        I: IntoIterator<Item = LogOption<'a>>,
    {
        LineBuilder::new(&self.resolvers, self.clock.as_ref()).build(opts)
    }

    /// Flush the sink. Failures are reported on stderr.
    pub fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("common-logger: failed to flush sink: {}", e);
        }
    }
}

impl LineLogger for Logger {
    fn log<'a>(&self, level: Level, opts: Vec<LogOption<'a>>) {
        let record = self.build_line(opts).into_record(level);
        if let Err(e) = self.sink.send(&record) {
            eprintln!("common-logger: failed to write log record: {}", e);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("resolvers", &self.resolvers)
            .finish_non_exhaustive()
    }
}
