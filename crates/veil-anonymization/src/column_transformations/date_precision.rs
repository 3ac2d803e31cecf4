use super::ColumnRule;
use crate::value::Value;
use chrono::{Datelike, NaiveDate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateUnit {
    Year,
    Month,
}

/// Coarsens dates to the first day of their year or month.
pub struct DatePrecision {
    unit: DateUnit,
}

impl DatePrecision {
    pub fn new(unit: DateUnit) -> Self {
        Self { unit }
    }

    fn coarsen(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            DateUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            DateUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
        }
    }
}

impl ColumnRule for DatePrecision {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Date(date) => Value::Date(self.coarsen(date).unwrap_or(date)),
            other => other,
        }
    }
}
