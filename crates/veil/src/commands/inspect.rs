use crate::config::{
    parse_delimiter, ApplicationConfig, ColumnConfiguration, DataTypeRef, IdentificationClassRef,
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::{Path, PathBuf};
use veil_anonymization::{DataType, Value};

/// Guesses the declared type of a column from a sample value.
pub fn infer_data_type(sample: &str) -> DataTypeRef {
    if sample.trim().is_empty() {
        return DataTypeRef::Text;
    }

    [
        (DataType::Integer, DataTypeRef::Integer),
        (DataType::Float, DataTypeRef::Float),
        (DataType::Date, DataTypeRef::Date),
    ]
    .iter()
    .find(|(data_type, _)| match Value::parse(*data_type, sample) {
        Ok(Value::Float(value)) => value.is_finite(),
        Ok(_) => true,
        Err(_) => false,
    })
    .map_or(DataTypeRef::Text, |(_, data_type_ref)| *data_type_ref)
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |stem| stem.to_string_lossy());

    input.with_file_name(format!("{}.anonymized.csv", stem))
}

/// Builds a configuration skeleton for a CSV file: every column becomes a
/// non-identifier without rules.
pub fn skeleton(input: &Path, delimiter: &str) -> Result<ApplicationConfig> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(parse_delimiter(delimiter)?)
        .has_headers(true)
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("cannot open input {}", input.display()))?;

    let headers = reader.headers()?.clone();
    let sample = reader.records().next().transpose()?;

    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnConfiguration {
            name: name.to_string(),
            data_type: sample
                .as_ref()
                .and_then(|record| record.get(index))
                .map_or(DataTypeRef::Text, infer_data_type),
            class: IdentificationClassRef::NonIdentifier,
            sensitive: false,
            rules: vec![],
            histogram: None,
            distribution: None,
        })
        .collect();

    Ok(ApplicationConfig {
        input: input.to_path_buf(),
        output: output_path(input),
        delimiter: delimiter.to_string(),
        has_header: true,
        strict: false,
        k: None,
        columns,
    })
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let input = Path::new(
        matches
            .value_of("input")
            .context("missing value for 'input' argument")?,
    );
    let delimiter = matches
        .value_of("delimiter")
        .context("missing value for 'delimiter' argument")?;

    let config = skeleton(input, delimiter)?;
    print!("{}", toml::to_string(&config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_infer_data_type() {
        assert_eq!(infer_data_type("42"), DataTypeRef::Integer);
        assert_eq!(infer_data_type("4.2"), DataTypeRef::Float);
        assert_eq!(infer_data_type("2020-01-31"), DataTypeRef::Date);
        assert_eq!(infer_data_type("Dublin"), DataTypeRef::Text);
        assert_eq!(infer_data_type(""), DataTypeRef::Text);
    }

    #[test]
    fn test_non_finite_samples_are_text() {
        for sample in &["Nan", "NaN", "inf", "Infinity", "-INF"] {
            assert_eq!(infer_data_type(sample), DataTypeRef::Text, "{}", sample);
        }
        assert_eq!(infer_data_type("1e3"), DataTypeRef::Float);
    }

    #[test]
    fn test_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "name;age;joined").unwrap();
        writeln!(file, "Alice;22;2020-01-31").unwrap();
        drop(file);

        let config = skeleton(&input, ";").unwrap();

        assert_eq!(config.output, dir.path().join("people.anonymized.csv"));
        assert_eq!(
            config
                .columns
                .iter()
                .map(|column| (column.name.as_str(), column.data_type))
                .collect::<Vec<_>>(),
            vec![
                ("name", DataTypeRef::Text),
                ("age", DataTypeRef::Integer),
                ("joined", DataTypeRef::Date),
            ]
        );

        let rendered = toml::to_string(&config).unwrap();
        let reparsed: ApplicationConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
