use crate::{
    column_transformations::{ColumnRule, Identity, SharedRule},
    value::Value,
};
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Frequency table over projected values.
///
/// Every observed value is folded through the projection before it is
/// counted, so the histogram's domain is the projected value space. Lookups
/// are projected the same way.
#[derive(Clone)]
pub struct Histogram {
    projection: SharedRule,
    counts: BTreeMap<Value, usize>,
    total: usize,
}

impl Histogram {
    pub fn new(projection: impl ColumnRule + 'static) -> Self {
        Self::with_shared_projection(Arc::new(projection))
    }

    pub fn with_shared_projection(projection: SharedRule) -> Self {
        Self {
            projection,
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    pub fn add_value(&mut self, value: Value) {
        *self
            .counts
            .entry(self.projection.apply(value))
            .or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of the projection of `value`.
    pub fn count(&self, value: &Value) -> usize {
        let projected = self.projection.apply(value.clone());
        self.counts.get(&projected).copied().unwrap_or(0)
    }

    /// Relative frequency of the projection of `value`, `0.0` when nothing
    /// has been observed yet.
    pub fn probability(&self, value: &Value) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.count(value) as f64 / self.total as f64
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct projected values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Projected values with their counts, in value order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, usize)> {
        self.counts.iter().map(|(value, count)| (value, *count))
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(Identity)
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("counts", &self.counts)
            .field("total", &self.total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_transformations::Bucket;
    use proptest::prelude::*;

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::default();

        assert_eq!(histogram.total(), 0);
        assert!(histogram.is_empty());
        assert_eq!(histogram.probability(&Value::Integer(1)), 0.0);
    }

    #[test]
    fn test_identity_histogram() {
        let mut histogram = Histogram::default();
        for value in &["a", "b", "a", "a"] {
            histogram.add_value(Value::from(*value));
        }

        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram.count(&Value::from("a")), 3);
        assert_eq!(histogram.probability(&Value::from("a")), 0.75);
        assert_eq!(histogram.probability(&Value::from("c")), 0.0);
    }

    #[test]
    fn test_lookup_is_projected() {
        let mut histogram = Histogram::new(Bucket::new(10));
        for age in &[21, 25, 29, 42] {
            histogram.add_value(Value::Integer(*age));
        }

        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram.count(&Value::from("20-29")), 3);
        assert_eq!(histogram.probability(&Value::Integer(23)), 0.75);
        assert_eq!(histogram.probability(&Value::Integer(40)), 0.25);
        assert_eq!(histogram.probability(&Value::Integer(50)), 0.0);
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut histogram = Histogram::default();
        histogram.add_value(Value::Null);
        histogram.add_value(Value::Integer(2));
        histogram.add_value(Value::Integer(1));

        let keys: Vec<&Value> = histogram.iter().map(|(value, _)| value).collect();
        assert_eq!(keys, vec![&Value::Integer(1), &Value::Integer(2), &Value::Null]);
    }

    proptest! {
        #[test]
        fn probabilities_sum_to_one(values in prop::collection::vec(-100i64..100, 1..200)) {
            let mut histogram = Histogram::new(Bucket::new(7));
            for value in &values {
                histogram.add_value(Value::Integer(*value));
            }

            let sum: f64 = histogram
                .iter()
                .map(|(value, _)| histogram.probability(value))
                .sum();

            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert_eq!(histogram.total(), values.len());
        }

        #[test]
        fn observation_order_does_not_matter(mut values in prop::collection::vec(any::<i64>(), 0..100)) {
            let mut forward = Histogram::new(Bucket::new(5));
            values.iter().for_each(|v| forward.add_value(Value::Integer(*v)));

            values.reverse();
            let mut backward = Histogram::new(Bucket::new(5));
            values.iter().for_each(|v| backward.add_value(Value::Integer(*v)));

            prop_assert_eq!(forward.total(), backward.total());
            prop_assert!(forward.iter().eq(backward.iter()));
        }
    }
}
