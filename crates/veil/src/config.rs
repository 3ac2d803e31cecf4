use ::config::ConfigError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use veil_anonymization::{
    column_transformations::{
        Bucket, DatePrecision, DateUnit, Identity, Randomize, Replace, Suppress, Truncate,
    },
    Column, DataType, Distribution, Histogram, IdentificationClass, Schema, SharedRule, Value,
};

const DEFAULT_DELIMITER: &str = ",";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeRef {
    Integer,
    Float,
    Date,
    Text,
    Categorical,
    Null,
}

impl From<DataTypeRef> for DataType {
    fn from(def: DataTypeRef) -> DataType {
        match def {
            DataTypeRef::Integer => DataType::Integer,
            DataTypeRef::Float => DataType::Float,
            DataTypeRef::Date => DataType::Date,
            DataTypeRef::Text => DataType::Text,
            DataTypeRef::Categorical => DataType::Categorical,
            DataTypeRef::Null => DataType::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationClassRef {
    Identifier,
    QuasiIdentifier,
    NonIdentifier,
}

impl From<IdentificationClassRef> for IdentificationClass {
    fn from(def: IdentificationClassRef) -> IdentificationClass {
        match def {
            IdentificationClassRef::Identifier => IdentificationClass::Identifier,
            IdentificationClassRef::QuasiIdentifier => IdentificationClass::QuasiIdentifier,
            IdentificationClassRef::NonIdentifier => IdentificationClass::NonIdentifier,
        }
    }
}

impl Default for IdentificationClassRef {
    fn default() -> Self {
        IdentificationClassRef::NonIdentifier
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateUnitRef {
    Year,
    Month,
}

impl From<DateUnitRef> for DateUnit {
    fn from(def: DateUnitRef) -> DateUnit {
        match def {
            DateUnitRef::Year => DateUnit::Year,
            DateUnitRef::Month => DateUnit::Month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum RuleConfiguration {
    Identity,
    Bucket {
        width: u32,
    },
    Truncate {
        length: usize,
        marker: Option<String>,
    },
    Suppress,
    Replace {
        value: String,
    },
    Randomize {
        length: Option<usize>,
    },
    DatePrecision {
        unit: DateUnitRef,
    },
}

impl RuleConfiguration {
    pub fn to_rule(&self) -> SharedRule {
        match self {
            RuleConfiguration::Identity => Arc::new(Identity),
            RuleConfiguration::Bucket { width } => Arc::new(Bucket::new(*width)),
            RuleConfiguration::Truncate { length, marker } => match marker {
                Some(marker) => Arc::new(Truncate::with_marker(*length, marker.clone())),
                None => Arc::new(Truncate::new(*length)),
            },
            RuleConfiguration::Suppress => Arc::new(Suppress),
            RuleConfiguration::Replace { value } => Arc::new(Replace::new(value.clone())),
            RuleConfiguration::Randomize { length } => match length {
                Some(length) => Arc::new(Randomize::new(*length)),
                None => Arc::new(Randomize::default()),
            },
            RuleConfiguration::DatePrecision { unit } => {
                Arc::new(DatePrecision::new((*unit).into()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistributionConfiguration {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColumnConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataTypeRef,
    #[serde(default)]
    pub class: IdentificationClassRef,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub rules: Vec<RuleConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<RuleConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionConfiguration>,
}

impl ColumnConfiguration {
    /// The column declaration without its rules; those are attached once the
    /// data is loaded.
    pub fn to_column(&self) -> Result<Column> {
        let data_type = DataType::from(self.data_type);
        let mut column = Column::new(self.name.as_str(), data_type, self.class.into())
            .sensitive(self.sensitive);

        if let Some(projection) = &self.histogram {
            column = column.with_histogram(Histogram::with_shared_projection(projection.to_rule()));
        }

        if let Some(distribution) = &self.distribution {
            let parse = |text: &str| {
                Value::parse(data_type, text)
                    .with_context(|| format!("invalid distribution bound for column {}", self.name))
            };
            column = column.with_distribution(Distribution::new(
                parse(&distribution.min)?,
                parse(&distribution.max)?,
            ));
        }

        Ok(column)
    }
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_has_header() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApplicationConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_has_header")]
    pub has_header: bool,
    #[serde(default)]
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    pub columns: Vec<ColumnConfiguration>,
}

impl ApplicationConfig {
    pub fn delimiter(&self) -> Result<u8> {
        parse_delimiter(&self.delimiter)
    }

    pub fn schema(&self) -> Result<Schema> {
        let columns = self
            .columns
            .iter()
            .map(ColumnConfiguration::to_column)
            .collect::<Result<Vec<Column>>>()?;

        Ok(Schema::new(columns))
    }

    /// Attaches every configured rule pipeline to its column.
    pub fn attach_rules(&self, schema: &mut Schema) -> Result<()> {
        for column in &self.columns {
            let target = schema.column_mut(&column.name)?;
            target.clear_rules();
            for rule in &column.rules {
                target.add_shared_rule(rule.to_rule());
            }
        }

        Ok(())
    }
}

pub fn parse_delimiter(delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(anyhow!(
            "delimiter must be a single byte, got {:?}",
            delimiter
        )),
    }
}

pub fn load_config(path: &Path) -> Result<ApplicationConfig, ConfigError> {
    let mut s = config::Config::default();
    s.merge(config::File::from(path))?;
    s.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
input = "people.csv"
output = "people.out.csv"
k = 2

[[columns]]
name = "Name"
type = "text"
class = "identifier"
rules = [{ type = "suppress" }]

[[columns]]
name = "Age"
type = "integer"
class = "quasi_identifier"
sensitive = true
rules = [{ type = "bucket", width = 5 }, { type = "truncate", length = 2, marker = "*" }]
histogram = { type = "bucket", width = 10 }
distribution = { min = "0", max = "120" }

[[columns]]
name = "Born"
type = "date"
rules = [{ type = "date_precision", unit = "year" }]
"#;

    fn parsed() -> ApplicationConfig {
        toml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parsed();

        assert_eq!(config.delimiter().unwrap(), b',');
        assert!(config.has_header);
        assert!(!config.strict);
        assert_eq!(config.k, Some(2));
        assert_eq!(config.columns[2].class, IdentificationClassRef::NonIdentifier);
        assert!(!config.columns[0].sensitive);
    }

    #[test]
    fn test_rule_configuration() {
        let config = parsed();

        assert_eq!(
            config.columns[1].rules,
            vec![
                RuleConfiguration::Bucket { width: 5 },
                RuleConfiguration::Truncate {
                    length: 2,
                    marker: Some("*".to_string())
                },
            ]
        );
        assert_eq!(
            config.columns[2].rules,
            vec![RuleConfiguration::DatePrecision {
                unit: DateUnitRef::Year
            }]
        );
    }

    #[test]
    fn test_schema_and_rules() {
        let config = parsed();
        let mut schema = config.schema().unwrap();

        let age = schema.column(1).unwrap();
        assert_eq!(age.rule_count(), 0);
        assert!(age.is_sensitive());
        assert!(age.histogram().is_some());
        assert!(age.distribution().unwrap().contains(&Value::Integer(42)));
        assert_eq!(schema.identifying_columns(), vec![0, 1]);

        config.attach_rules(&mut schema).unwrap();
        let age = schema.column(1).unwrap();
        assert_eq!(age.apply_rules(Value::Integer(33)), Value::from("30*"));
        assert_eq!(schema.column(0).unwrap().apply_rules(Value::from("Ann")), Value::Null);
    }

    #[test]
    fn test_invalid_distribution_bound() {
        let mut config = parsed();
        config.columns[1].distribution = Some(DistributionConfiguration {
            min: "zero".to_string(),
            max: "120".to_string(),
        });

        assert!(config.schema().is_err());
    }

    #[test]
    fn test_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
    }
}
