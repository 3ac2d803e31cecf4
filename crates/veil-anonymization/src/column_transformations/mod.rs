mod bucket;
mod date_precision;
mod randomize;
mod replace;
mod suppress;
mod truncate;

pub use bucket::Bucket;
pub use date_precision::{DatePrecision, DateUnit};
pub use randomize::Randomize;
pub use replace::Replace;
pub use suppress::Suppress;
pub use truncate::Truncate;

use crate::value::Value;
use std::sync::Arc;

/// A total, pure rewrite of a single cell.
///
/// Rules have no declared domain: a rule receiving a variant it does not act
/// on must hand it back unchanged rather than fail.
pub trait ColumnRule: Send + Sync {
    fn apply(&self, value: Value) -> Value;
}

impl<F> ColumnRule for F
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn apply(&self, value: Value) -> Value {
        self(value)
    }
}

pub type SharedRule = Arc<dyn ColumnRule>;

/// The identity rule, mostly useful as a histogram projection.
pub struct Identity;

impl ColumnRule for Identity {
    fn apply(&self, value: Value) -> Value {
        value
    }
}

/// Folds `value` through `rules` left to right.
pub fn apply_all(rules: &[SharedRule], value: Value) -> Value {
    rules.iter().fold(value, |working, rule| rule.apply(working))
}
