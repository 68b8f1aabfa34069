use crate::record::LogRecord;

/// Error type returned by [`LogSink`] implementations.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Underlying structured logger that receives fully-built [`LogRecord`]s.
///
/// Implementations own formatting and output (JSON lines, `tracing`
/// events, an in-memory buffer, ...). The [`Logger`](crate::logger::Logger)
/// calls `send` synchronously from the logging call site and never lets a
/// returned error reach the caller.
pub trait LogSink: Send + Sync {
    /// Emit a single record.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was written or deliberately filtered out.
    /// - `Err(..)` if formatting or output failed.
    fn send(&self, record: &LogRecord) -> Result<(), SinkError>;

    /// Flush any buffered output.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
