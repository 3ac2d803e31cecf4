use super::ColumnRule;
use crate::value::Value;

/// Replaces every value with [`Value::Null`].
pub struct Suppress;

impl ColumnRule for Suppress {
    fn apply(&self, _value: Value) -> Value {
        Value::Null
    }
}
