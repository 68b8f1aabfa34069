use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request-scoped bag of values that can be passed to the logger.
///
/// A context is immutable: [`LogContext::with_value`] returns a derived
/// context and leaves the original as it was. Clones share storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    values: Arc<BTreeMap<String, Value>>,
}

impl LogContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that additionally carries `key`.
    ///
    /// An existing value under the same key is shadowed in the derived
    /// context only.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(values),
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
