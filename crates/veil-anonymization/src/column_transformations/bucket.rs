use super::ColumnRule;
use crate::value::Value;

fn range_label(value: i64, width: i64) -> String {
    let lower = value.saturating_sub(value.rem_euclid(width));
    let upper = lower.saturating_add(width - 1);

    format!("{}-{}", lower, upper)
}

/// Generalizes numbers into fixed-width ranges aligned to multiples of
/// `width`, e.g. `22` becomes `"20-24"` for a width of 5.
///
/// Floats are floored before bucketing. Anything else passes through.
pub struct Bucket {
    width: i64,
}

impl Bucket {
    pub fn new(width: u32) -> Self {
        Self {
            width: i64::from(width.max(1)),
        }
    }
}

impl ColumnRule for Bucket {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Integer(v) => Value::Text(range_label(v, self.width)),
            Value::Float(v) if v.is_finite() => {
                Value::Text(range_label(v.floor() as i64, self.width))
            }
            other => other,
        }
    }
}
