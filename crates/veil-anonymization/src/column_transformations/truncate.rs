use super::ColumnRule;
use crate::value::Value;

const DEFAULT_MARKER: &str = "...";

fn truncated(text: &str, length: usize, marker: &str) -> String {
    let prefix: String = text.chars().take(length).collect();

    format!("{}{}", prefix, marker)
}

/// Keeps the first `length` characters of a text or categorical value and
/// appends a marker (`"..."` by default). The variant is preserved.
pub struct Truncate {
    length: usize,
    marker: String,
}

impl Truncate {
    pub fn new(length: usize) -> Self {
        Self::with_marker(length, DEFAULT_MARKER)
    }

    pub fn with_marker(length: usize, marker: impl Into<String>) -> Self {
        Self {
            length,
            marker: marker.into(),
        }
    }
}

impl ColumnRule for Truncate {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Text(text) => Value::Text(truncated(&text, self.length, &self.marker)),
            Value::Categorical(text) => {
                Value::Categorical(truncated(&text, self.length, &self.marker))
            }
            other => other,
        }
    }
}
