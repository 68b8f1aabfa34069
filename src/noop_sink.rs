use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// A sink that simply drops all records.
///
/// Useful for measuring the cost of building lines without any output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn send(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Ok(())
    }
}
