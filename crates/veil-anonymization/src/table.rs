use crate::{
    column::Schema,
    error::{AnonymizationError, AnonymizationResult},
    value::Value,
};
use std::sync::Arc;
use tracing::debug;

pub type Row = Vec<Value>;

/// Rows of values together with the schema they were parsed against.
///
/// The schema is reference counted and only meant to be changed through
/// [`Table::configure`] before [`Table::apply_rules`] runs.
#[derive(Clone, Debug)]
pub struct Table {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            rows: vec![],
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Mutable access to the schema for attaching rules, histograms and
    /// distributions. Copies the schema first if it is shared elsewhere.
    pub fn configure(&mut self) -> &mut Schema {
        Arc::make_mut(&mut self.schema)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_width(&self, found: usize) -> AnonymizationResult<()> {
        let expected = self.schema.len();
        if found != expected {
            return Err(AnonymizationError::MalformedRow { expected, found });
        }

        Ok(())
    }

    pub fn push_row(&mut self, row: Row) -> AnonymizationResult<()> {
        self.check_width(row.len())?;
        self.rows.push(row);
        Ok(())
    }

    /// Parses one raw record, field `i` according to column `i`.
    pub fn parse_row<S: AsRef<str>>(&self, fields: &[S]) -> AnonymizationResult<Row> {
        self.check_width(fields.len())?;

        self.schema
            .iter()
            .zip(fields)
            .map(|(column, field)| column.parse(field.as_ref()))
            .collect()
    }

    pub fn push_raw_row<S: AsRef<str>>(&mut self, fields: &[S]) -> AnonymizationResult<()> {
        let row = self.parse_row(fields)?;
        self.rows.push(row);
        Ok(())
    }

    /// Rewrites every cell through its column's rule pipeline.
    pub fn apply_rules(&mut self) {
        debug!(rows = self.rows.len(), columns = self.schema.len(), "applying column rules");

        let schema = &self.schema;
        for row in &mut self.rows {
            for (cell, column) in row.iter_mut().zip(schema.iter()) {
                let value = std::mem::replace(cell, Value::Null);
                *cell = column.apply_rules(value);
            }
        }
    }

    /// Feeds each column's current values into that column's histogram, for
    /// the columns that declare one.
    pub fn observe_histograms(&mut self) {
        let rows = &self.rows;
        let schema = Arc::make_mut(&mut self.schema);

        for (index, column) in schema.columns_mut().iter_mut().enumerate() {
            if let Some(histogram) = column.histogram_mut() {
                for row in rows {
                    histogram.add_value(row[index].clone());
                }
            }
        }
    }

    pub fn header(&self) -> Vec<&str> {
        self.schema.names()
    }

    pub fn display_row(&self, index: usize) -> Option<Vec<String>> {
        self.rows
            .get(index)
            .map(|row| row.iter().map(Value::to_string).collect())
    }

    pub fn display_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect())
    }

    /// The values of the identifying columns of every row, in schema order.
    pub fn identifying_projections(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        let indices = self.schema.identifying_columns();

        self.rows
            .iter()
            .map(move |row| indices.iter().map(|&index| row[index].clone()).collect())
    }
}
