use super::ColumnRule;
use crate::value::Value;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DEFAULT_LENGTH: usize = 30;

/// Replaces every non-null value with a random alphanumeric text.
pub struct Randomize {
    length: usize,
}

impl Randomize {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for Randomize {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl ColumnRule for Randomize {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Null => Value::Null,
            _ => Value::Text(
                thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(self.length)
                    .map(char::from)
                    .collect::<String>(),
            ),
        }
    }
}
