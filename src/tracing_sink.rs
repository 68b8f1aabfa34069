use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};
use chrono::SecondsFormat;
use tracing::Level;

/// Forwards records to the `tracing` ecosystem.
///
/// Each record becomes one event at the record's level with target
/// `common_logger`. The message is the event message, `time` carries the
/// record timestamp (RFC 3339) and `fields` the merged fields as a JSON
/// object string, so whichever subscriber is installed decides the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! forward {
    ($level:expr, $record:expr, $time:expr, $fields:expr) => {
        tracing::event!(
            target: "common_logger",
            $level,
            time = %$time,
            fields = %$fields,
            "{}",
            $record.message
        )
    };
}

impl LogSink for TracingSink {
    fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        let time = record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let fields = serde_json::to_string(&record.fields)?;

        match record.level {
            Level::ERROR => forward!(Level::ERROR, record, time, fields),
            Level::WARN => forward!(Level::WARN, record, time, fields),
            Level::INFO => forward!(Level::INFO, record, time, fields),
            Level::DEBUG => forward!(Level::DEBUG, record, time, fields),
            _ => forward!(Level::TRACE, record, time, fields),
        }
        Ok(())
    }
}
