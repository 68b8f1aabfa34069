//! Structured logging facade.
//!
//! A logging call takes an ordered list of [`LogOption`]s (message,
//! [`LogContext`], HTTP request or response, URL, error, extra fields,
//! timestamp) and merges them into one [`LogRecord`] that is handed to a
//! [`LogSink`]. Optional field resolvers decide which fields a context,
//! request or response contributes; request and response bodies stay
//! readable after being logged.

pub mod record;
pub mod context;
pub mod body;
pub mod resolvers;
pub mod option;
pub mod clock;
pub mod line;
pub mod config;
pub mod logger;

pub mod sink;
pub mod json_sink;
pub mod tracing_sink;
pub mod noop_sink;
pub mod memory_sink;

pub mod env;
#[cfg(feature = "subscriber")]
pub mod init;

pub use body::Body;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LoggerConfig, Resolvers};
pub use context::LogContext;
pub use json_sink::JsonSink;
pub use logger::{LineLogger, Logger};
pub use memory_sink::MemorySink;
pub use noop_sink::NoopSink;
pub use option::LogOption;
pub use record::{merge_fields, Fields, LogLine, LogRecord};
pub use resolvers::ResolveError;
pub use sink::{LogSink, SinkError};
pub use tracing_sink::TracingSink;
