use super::ColumnRule;
use crate::value::Value;

/// Replaces every non-null value with a fixed text.
pub struct Replace {
    pub new_string: String,
}

impl Replace {
    pub fn new(new_string: impl Into<String>) -> Self {
        Self {
            new_string: new_string.into(),
        }
    }
}

impl ColumnRule for Replace {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Null => Value::Null,
            _ => Value::Text(self.new_string.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace() {
        let replace = Replace::new("");

        assert_eq!(replace.apply(Value::from("Alice")), Value::from(""));
        assert_eq!(replace.apply(Value::Float(1.0)), Value::from(""));
        assert_eq!(replace.apply(Value::Null), Value::Null);
    }
}
