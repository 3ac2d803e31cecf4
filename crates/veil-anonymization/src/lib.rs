mod algorithm;
mod column;
pub mod column_transformations;
mod distribution;
mod error;
mod histogram;
mod table;
mod value;

pub use algorithm::{
    k_anonymity, l_diversity, GroupCounts, GroupKey, KAnonymityReport, LDiversityReport,
};
pub use column::{Column, IdentificationClass, Schema};
pub use column_transformations::{ColumnRule, SharedRule};
pub use distribution::{Density, Distribution};
pub use error::{AnonymizationError, AnonymizationResult};
pub use histogram::Histogram;
pub use table::{Row, Table};
pub use value::{DataType, Value, NULL_TOKEN};
