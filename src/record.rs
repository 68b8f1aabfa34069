use crate::context::LogContext;
use crate::resolvers::ResolveError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::Level;

/// Flat, string-keyed bag of loggable values attached to one log line.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Merge two field mappings into a new one.
///
/// Every key of both inputs is kept. When a key exists in both, the value
/// from `later` wins.
pub fn merge_fields(earlier: &Fields, later: &Fields) -> Fields {
    let mut merged = earlier.clone();
    merged.extend(later.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Intermediate result of turning a list of log options into one line.
///
/// Lives for a single logging call.
#[derive(Debug)]
pub struct LogLine {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Fields,
    pub context: Option<LogContext>,
    /// Resolver failures hit while building the line. The options that
    /// caused them contributed no fields.
    pub resolve_errors: Vec<ResolveError>,
}

impl LogLine {
    /// Attach a severity and turn the line into the record handed to a sink.
    pub fn into_record(self, level: Level) -> LogRecord {
        LogRecord {
            level,
            timestamp: self.timestamp,
            message: self.message,
            fields: self.fields,
            context: self.context,
        }
    }
}

/// Fully-built record forwarded to a [`LogSink`](crate::sink::LogSink).
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_level")]
    pub level: Level,
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "msg")]
    pub message: String,
    pub fields: Fields,
    #[serde(skip)]
    pub context: Option<LogContext>,
}

fn serialize_level<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&level_name(level))
}

/// Lowercase level name as it appears in emitted records.
pub fn level_name(level: &Level) -> String {
    level.as_str().to_ascii_lowercase()
}
