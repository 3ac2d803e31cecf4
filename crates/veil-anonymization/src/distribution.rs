use crate::value::Value;
use std::{fmt, sync::Arc};

pub type Density = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Expected value range of a column plus an optional density function.
///
/// This is a declaration, not a measurement: nothing checks it against the
/// observed data unless asked via [`Distribution::contains`].
#[derive(Clone)]
pub struct Distribution {
    min: Value,
    max: Value,
    density: Option<Density>,
}

impl Distribution {
    pub fn new(min: Value, max: Value) -> Self {
        Self {
            min,
            max,
            density: None,
        }
    }

    pub fn with_density(
        min: Value,
        max: Value,
        density: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            min,
            max,
            density: Some(Arc::new(density)),
        }
    }

    pub fn min(&self) -> &Value {
        &self.min
    }

    pub fn max(&self) -> &Value {
        &self.max
    }

    /// Evaluates the density at `value`, [`Value::Null`] if none was declared.
    pub fn probability(&self, value: &Value) -> Value {
        match &self.density {
            Some(density) => density(value),
            None => Value::Null,
        }
    }

    /// Whether `value` lies within `[min, max]` under the total value order.
    pub fn contains(&self, value: &Value) -> bool {
        &self.min <= value && value <= &self.max
    }
}

impl fmt::Debug for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Distribution")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("density", &self.density.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let distribution = Distribution::new(Value::Integer(0), Value::Integer(120));

        assert!(distribution.contains(&Value::Integer(0)));
        assert!(distribution.contains(&Value::Integer(120)));
        assert!(!distribution.contains(&Value::Integer(121)));
        assert!(!distribution.contains(&Value::Null));
        assert_eq!(distribution.min(), &Value::Integer(0));
        assert_eq!(distribution.max(), &Value::Integer(120));
    }

    #[test]
    fn test_density() {
        let uniform = Distribution::with_density(Value::Integer(1), Value::Integer(4), |_| {
            Value::Float(0.25)
        });
        let declared_only = Distribution::new(Value::Integer(1), Value::Integer(4));

        assert_eq!(uniform.probability(&Value::Integer(2)), Value::Float(0.25));
        assert_eq!(declared_only.probability(&Value::Integer(2)), Value::Null);
    }
}
