use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps every record in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a
/// [`Logger`](crate::logger::Logger) and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Remove and return the records received so far.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        // a panic while holding the lock cannot leave a Vec half-pushed
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn send(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.lock().push(record.clone());
        Ok(())
    }
}
