use crate::error::{AnonymizationError, AnonymizationResult};
use chrono::NaiveDate;
use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

/// Rendering of [`Value::Null`] in displayed output.
pub const NULL_TOKEN: &str = "(null)";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Folds negative zero into positive zero so both land in the same group.
fn canonical_float(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// The type a column's raw text is parsed as.
///
/// This only describes the input side of a column. Rules may produce values
/// of any variant afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Float,
    Date,
    Text,
    Categorical,
    Null,
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Date => "date",
            DataType::Text => "text",
            DataType::Categorical => "categorical",
            DataType::Null => "null",
        };
        f.write_str(name)
    }
}

/// A single cell.
///
/// Values are totally ordered: first by variant in declaration order
/// (`Integer < Float < Date < Text < Categorical < Null`), then by payload.
/// Floats compare with [`f64::total_cmp`] after folding `-0.0` into `0.0`, so
/// apart from the two zeros every float (NaN included) is equal only to
/// itself. All nulls are equal.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    Categorical(String),
    Null,
}

impl Value {
    /// Parses raw input text according to a column's declared type.
    ///
    /// Numeric and date text may carry surrounding whitespace; text and
    /// categorical values are taken verbatim. A `Null` column yields
    /// [`Value::Null`] for any input.
    pub fn parse(data_type: DataType, text: &str) -> AnonymizationResult<Value> {
        let parse_error = |reason: String| AnonymizationError::Parse {
            data_type,
            text: text.to_string(),
            reason,
        };

        match data_type {
            DataType::Integer => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|err| parse_error(err.to_string())),
            DataType::Float => text
                .trim()
                .parse::<f64>()
                .map(|value| Value::Float(canonical_float(value)))
                .map_err(|err| parse_error(err.to_string())),
            DataType::Date => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|err| parse_error(err.to_string())),
            DataType::Text => Ok(Value::Text(text.to_string())),
            DataType::Categorical => Ok(Value::Categorical(text.to_string())),
            DataType::Null => Ok(Value::Null),
        }
    }

    /// The variant currently held, expressed as a [`DataType`].
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Date(_) => DataType::Date,
            Value::Text(_) => DataType::Text,
            Value::Categorical(_) => DataType::Categorical,
            Value::Null => DataType::Null,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Integer(_) => 0,
            Value::Float(_) => 1,
            Value::Date(_) => 2,
            Value::Text(_) => 3,
            Value::Categorical(_) => 4,
            Value::Null => 5,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
            Value::Text(v) | Value::Categorical(v) => f.write_str(v),
            Value::Null => f.write_str(NULL_TOKEN),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => {
                canonical_float(*a).total_cmp(&canonical_float(*b))
            }
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Categorical(a), Value::Categorical(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Null, Value::Null) => Ordering::Equal,
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Integer(v) => v.hash(state),
            Value::Float(v) => canonical_float(*v).to_bits().hash(state),
            Value::Date(v) => v.hash(state),
            Value::Text(v) | Value::Categorical(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(canonical_float(value))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
