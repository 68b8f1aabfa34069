use crate::env::{self, COMMON_LOGGER_LEVEL_ENV};
use crate::record::{level_name, LogRecord};
use crate::sink::{LogSink, SinkError};
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing::level_filters::LevelFilter;

const LEVEL_KEY: &str = "level";
const MESSAGE_KEY: &str = "msg";
const TIME_KEY: &str = "time";

/// Writes each record as one JSON object per line.
///
/// The object holds `level`, `msg`, `time` and every field at the top
/// level, keys sorted:
///
/// ```text
/// {"level":"info","msg":"some log line","time":"2006-01-02T04:05:06Z","x_response_id":"0000-1111"}
/// ```
///
/// A field that would clash with one of the three reserved keys is kept
/// under `fields.<key>` instead.
pub struct JsonSink<W> {
    writer: Mutex<W>,
    max_level: LevelFilter,
    seconds_format: SecondsFormat,
}

impl<W: Write + Send> JsonSink<W> {
    /// Sink writing every level to `writer`, timestamps at second precision.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            max_level: LevelFilter::TRACE,
            seconds_format: SecondsFormat::Secs,
        }
    }

    /// Drop records more verbose than `max_level`.
    pub fn with_max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }

    /// Sub-second precision of the `time` key.
    pub fn with_seconds_format(mut self, format: SecondsFormat) -> Self {
        self.seconds_format = format;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Render a record into the JSON object written for it.
    pub fn render(&self, record: &LogRecord) -> Value {
        let mut obj = Map::new();
        for (key, value) in &record.fields {
            let key = match key.as_str() {
                LEVEL_KEY | MESSAGE_KEY | TIME_KEY => format!("fields.{}", key),
                _ => key.clone(),
            };
            obj.insert(key, value.clone());
        }
        obj.insert(LEVEL_KEY.to_string(), Value::String(level_name(&record.level)));
        obj.insert(MESSAGE_KEY.to_string(), Value::String(record.message.clone()));
        obj.insert(
            TIME_KEY.to_string(),
            Value::String(record.timestamp.to_rfc3339_opts(self.seconds_format, true)),
        );
        Value::Object(obj)
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JsonSink<io::Stdout> {
    /// Stdout sink whose maximum level comes from `COMMON_LOGGER_LEVEL`.
    ///
    /// Unset or unparsable values mean `info`.
    pub fn stdout_from_env() -> Self {
        let level = env::env_or(COMMON_LOGGER_LEVEL_ENV, "info")
            .parse()
            .unwrap_or(LevelFilter::INFO);
        JsonSink::new(io::stdout()).with_max_level(level)
    }
}

impl<W: Write + Send> LogSink for JsonSink<W> {
    fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        if record.level > self.max_level {
            return Ok(());
        }
        let mut line = serde_json::to_vec(&self.render(record))?;
        line.push(b'\n');
        self.lock().write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Fields;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tracing::Level;

    fn record(level: Level, msg: &str, fields: Fields) -> LogRecord {
        LogRecord {
            level,
            timestamp: Utc.with_ymd_and_hms(2006, 1, 2, 4, 5, 6).unwrap()
                + chrono::Duration::nanoseconds(7),
            message: msg.to_string(),
            fields,
            context: None,
        }
    }

    fn output(sink: JsonSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn writes_sorted_single_line_objects() {
        let sink = JsonSink::new(Vec::new());
        let mut fields = Fields::new();
        fields.insert("x_response_id".into(), json!("0000-1111-2222-3333"));
        fields.insert("attempt".into(), json!(3));

        sink.send(&record(Level::INFO, "some log line", fields)).unwrap();

        assert_eq!(
            output(sink),
            "{\"attempt\":3,\"level\":\"info\",\"msg\":\"some log line\",\"time\":\"2006-01-02T04:05:06Z\",\"x_response_id\":\"0000-1111-2222-3333\"}\n"
        );
    }

    #[test]
    fn clashing_fields_are_prefixed() {
        let sink = JsonSink::new(Vec::new());
        let mut fields = Fields::new();
        fields.insert("msg".into(), json!("from fields"));
        fields.insert("level".into(), json!(9));

        let rendered = sink.render(&record(Level::ERROR, "real message", fields));

        assert_eq!(rendered["msg"], json!("real message"));
        assert_eq!(rendered["level"], json!("error"));
        assert_eq!(rendered["fields.msg"], json!("from fields"));
        assert_eq!(rendered["fields.level"], json!(9));
    }

    #[test]
    fn records_above_max_level_are_dropped() {
        let sink = JsonSink::new(Vec::new()).with_max_level(LevelFilter::INFO);

        sink.send(&record(Level::DEBUG, "hidden", Fields::new())).unwrap();
        sink.send(&record(Level::ERROR, "shown", Fields::new())).unwrap();

        let out = output(sink);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("\"msg\":\"shown\""));
    }

    #[test]
    fn nanosecond_precision_is_opt_in() {
        let sink = JsonSink::new(Vec::new()).with_seconds_format(SecondsFormat::Nanos);
        let rendered = sink.render(&record(Level::INFO, "", Fields::new()));
        assert_eq!(rendered["time"], json!("2006-01-02T04:05:06.000000007Z"));
    }

    #[test]
    fn write_failures_surface_as_sink_errors() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = JsonSink::new(Closed);
        let err = sink.send(&record(Level::INFO, "lost", Fields::new())).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
