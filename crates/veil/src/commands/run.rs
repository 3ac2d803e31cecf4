use crate::config::{load_config, ApplicationConfig};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use std::{
    io::{self, Write},
    path::Path,
    sync::Arc,
};
use tracing::{info, warn};
use veil_anonymization::{
    k_anonymity, l_diversity, AnonymizationError, KAnonymityReport, LDiversityReport, Table,
    Value,
};

/// Maps every configured column to the position of its field in the input.
///
/// With a header, columns are found by name and input columns missing from
/// the config are dropped. Without one, fields are taken in config order.
fn field_positions(
    config: &ApplicationConfig,
    headers: Option<&csv::StringRecord>,
) -> Result<Vec<usize>> {
    let headers = match headers {
        Some(headers) => headers,
        None => return Ok((0..config.columns.len()).collect()),
    };

    let positions = config
        .columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == column.name)
                .with_context(|| format!("column {:?} is missing from the input header", column.name))
        })
        .collect::<Result<Vec<usize>>>()?;

    let dropped: Vec<&str> = headers
        .iter()
        .filter(|header| !config.columns.iter().any(|column| column.name == *header))
        .collect();
    if !dropped.is_empty() {
        warn!(columns = ?dropped, "dropping input columns without a configuration");
    }

    Ok(positions)
}

/// Reads the configured input into `table`, returning the number of rows
/// that were skipped.
pub fn load_rows(config: &ApplicationConfig, table: &mut Table) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter()?)
        .has_headers(config.has_header)
        .flexible(true)
        .from_path(&config.input)
        .with_context(|| format!("cannot open input {}", config.input.display()))?;

    let headers = if config.has_header {
        Some(reader.headers()?.clone())
    } else {
        None
    };
    let positions = field_positions(config, headers.as_ref())?;
    let expected = headers
        .as_ref()
        .map_or(config.columns.len(), |headers| headers.len());

    let mut rejected = 0;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());

        let pushed = if record.len() == expected {
            let fields: Vec<&str> = positions.iter().map(|&position| &record[position]).collect();
            table.push_raw_row(&fields)
        } else {
            Err(AnonymizationError::MalformedRow {
                expected,
                found: record.len(),
            })
        };

        if let Err(err) = pushed {
            if config.strict {
                return Err(err).with_context(|| format!("rejected row on line {}", line));
            }

            warn!(line, %err, "skipping row");
            rejected += 1;
        }
    }

    Ok(rejected)
}

pub fn write_rows(config: &ApplicationConfig, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter()?)
        .from_path(&config.output)
        .with_context(|| format!("cannot create output {}", config.output.display()))?;

    if config.has_header {
        writer.write_record(table.header())?;
    }
    for row in table.display_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

fn format_group(group: &[Value]) -> String {
    group
        .iter()
        .map(Value::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn print_report(
    out: &mut impl Write,
    table: &Table,
    k_report: &KAnonymityReport,
    l_report: &LDiversityReport,
) -> io::Result<()> {
    writeln!(
        out,
        "k-anonymity: k = {} over {} groups ({} rows)",
        k_report.k,
        k_report.group_count,
        table.len()
    )?;
    writeln!(out, "minimal groups ({}):", k_report.minimal_groups.len())?;
    for group in &k_report.minimal_groups {
        writeln!(out, "  [{}]", format_group(group))?;
    }

    match l_report.l {
        Some(l) => {
            writeln!(out, "l-diversity: l = {}", l)?;
            for (name, l) in &l_report.columns {
                writeln!(out, "  {}: {}", name, l)?;
            }
        }
        None => writeln!(out, "l-diversity: no sensitive columns")?,
    }

    for column in table.schema().iter() {
        if let Some(histogram) = column.histogram() {
            writeln!(out, "histogram {} ({} values):", column.name(), histogram.total())?;
            for (value, _) in histogram.iter() {
                writeln!(out, "  {}: {:.4}", value, histogram.probability(value))?;
            }
        }
    }

    Ok(())
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config_file_path = Path::new(
        matches
            .value_of("config")
            .context("missing value for 'config' argument")?,
    );

    let config_file_path = std::env::current_dir()?.join(config_file_path);
    let config = load_config(&config_file_path)
        .with_context(|| format!("cannot load config {}", config_file_path.display()))?;

    let mut table = Table::new(Arc::new(config.schema()?));

    let rejected = load_rows(&config, &mut table)?;
    info!(rows = table.len(), rejected, "loaded input");

    for (index, column) in table.schema().iter().enumerate() {
        if let Some(distribution) = column.distribution() {
            let outside = table
                .rows()
                .iter()
                .filter(|row| !distribution.contains(&row[index]))
                .count();
            if outside > 0 {
                warn!(column = column.name(), outside, "values outside the declared range");
            }
        }
    }

    table.observe_histograms();
    config.attach_rules(table.configure())?;
    table.apply_rules();

    write_rows(&config, &table)?;
    info!(output = %config.output.display(), "wrote anonymized rows");

    let k_report = k_anonymity(&table)?;
    let l_report = l_diversity(&table)?;

    print_report(&mut io::stdout().lock(), &table, &k_report, &l_report)?;

    if let Some(target) = config.k {
        if !k_report.is_k_anonymous(target) {
            bail!("target k = {} not reached, data is only {}-anonymous", target, k_report.k);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_anonymization::{Column, DataType, Histogram, IdentificationClass, Schema};

    fn two_column_config() -> ApplicationConfig {
        toml::from_str(
            r#"
            input = "in.csv"
            output = "out.csv"

            [[columns]]
            name = "FullName"
            type = "text"
            class = "identifier"

            [[columns]]
            name = "Age"
            type = "integer"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_field_positions_follow_header_names() {
        let config = two_column_config();
        let headers = csv::StringRecord::from(vec!["County", "Age", "FullName"]);

        assert_eq!(field_positions(&config, Some(&headers)).unwrap(), vec![2, 1]);
        assert_eq!(field_positions(&config, None).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_field_positions_missing_column() {
        let config = two_column_config();
        let headers = csv::StringRecord::from(vec!["Age", "Name"]);

        let err = field_positions(&config, Some(&headers)).unwrap_err();
        assert!(err.to_string().contains("\"FullName\" is missing"));
    }

    #[test]
    fn test_print_report() {
        let schema = Schema::new(vec![
            Column::new("Id", DataType::Null, IdentificationClass::Identifier),
            Column::new("Age", DataType::Integer, IdentificationClass::QuasiIdentifier)
                .with_histogram(Histogram::default()),
        ]);
        let mut table = Table::new(Arc::new(schema));
        table.push_raw_row(&["a", "22"]).unwrap();
        table.push_raw_row(&["b", "22"]).unwrap();
        table.push_raw_row(&["c", "40"]).unwrap();
        table.observe_histograms();

        let k_report = k_anonymity(&table).unwrap();
        let l_report = l_diversity(&table).unwrap();

        let mut out = vec![];
        print_report(&mut out, &table, &k_report, &l_report).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert_eq!(
            printed,
            "k-anonymity: k = 1 over 2 groups (3 rows)\n\
             minimal groups (1):\n  [(null), 40]\n\
             l-diversity: no sensitive columns\n\
             histogram Age (3 values):\n  22: 0.6667\n  40: 0.3333\n"
        );
    }
}
