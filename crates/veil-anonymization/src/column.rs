use crate::{
    column_transformations::{apply_all, ColumnRule, SharedRule},
    distribution::Distribution,
    error::{AnonymizationError, AnonymizationResult},
    histogram::Histogram,
    value::{DataType, Value},
};
use std::{fmt, sync::Arc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentificationClass {
    Identifier,
    QuasiIdentifier,
    NonIdentifier,
}

impl IdentificationClass {
    /// Whether columns of this class take part in equivalence-class grouping.
    ///
    /// Identifiers count as well as quasi-identifiers, so a suppressed
    /// identifier column collapses into a single class instead of vanishing.
    pub fn is_identifying(&self) -> bool {
        !matches!(self, IdentificationClass::NonIdentifier)
    }
}

/// Declaration of a single column and its anonymization pipeline.
#[derive(Clone)]
pub struct Column {
    name: String,
    data_type: DataType,
    id_class: IdentificationClass,
    sensitive: bool,
    distribution: Option<Distribution>,
    histogram: Option<Histogram>,
    rules: Vec<SharedRule>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, id_class: IdentificationClass) -> Self {
        Self {
            name: name.into(),
            data_type,
            id_class,
            sensitive: false,
            distribution: None,
            histogram: None,
            rules: vec![],
        }
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_histogram(mut self, histogram: Histogram) -> Self {
        self.histogram = Some(histogram);
        self
    }

    pub fn with_rule(mut self, rule: impl ColumnRule + 'static) -> Self {
        self.add_rule(rule);
        self
    }

    /// Appends a rule to the end of the pipeline.
    pub fn add_rule(&mut self, rule: impl ColumnRule + 'static) -> &mut Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn add_shared_rule(&mut self, rule: SharedRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn id_class(&self) -> IdentificationClass {
        self.id_class
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }

    pub fn histogram_mut(&mut self) -> Option<&mut Histogram> {
        self.histogram.as_mut()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn parse(&self, text: &str) -> AnonymizationResult<Value> {
        Value::parse(self.data_type, text)
    }

    pub fn apply_rules(&self, value: Value) -> Value {
        apply_all(&self.rules, value)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("id_class", &self.id_class)
            .field("sensitive", &self.sensitive)
            .field("distribution", &self.distribution)
            .field("histogram", &self.histogram)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Ordered column declarations shared by every row of a table.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    pub fn column_mut(&mut self, name: &str) -> AnonymizationResult<&mut Column> {
        self.columns
            .iter_mut()
            .find(|column| column.name() == name)
            .ok_or_else(|| AnonymizationError::UnknownColumn(name.to_string()))
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Indices of the columns taking part in equivalence-class grouping, in
    /// schema order.
    pub fn identifying_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.id_class().is_identifying())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_transformations::{Bucket, Suppress};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("name", DataType::Text, IdentificationClass::Identifier),
            Column::new("country", DataType::Categorical, IdentificationClass::NonIdentifier),
            Column::new("age", DataType::Integer, IdentificationClass::QuasiIdentifier)
                .sensitive(true),
        ])
    }

    #[test]
    fn test_identifying_columns() {
        assert_eq!(schema().identifying_columns(), vec![0, 2]);
    }

    #[test]
    fn test_lookup() {
        let mut schema = schema();

        assert_eq!(schema.position("age"), Some(2));
        assert_eq!(schema.names(), vec!["name", "country", "age"]);
        assert!(schema.column(2).unwrap().is_sensitive());
        assert_eq!(
            schema.column_mut("zip").unwrap_err(),
            AnonymizationError::UnknownColumn("zip".to_string())
        );
    }

    #[test]
    fn test_rules_added_after_declaration() {
        let mut schema = schema();
        schema.column_mut("age").unwrap().add_rule(Bucket::new(5));
        schema.column_mut("name").unwrap().add_rule(Suppress);

        let age = schema.column(2).unwrap();
        assert_eq!(age.rule_count(), 1);
        assert_eq!(age.apply_rules(Value::Integer(23)), Value::from("20-24"));
        assert_eq!(
            schema.column(0).unwrap().apply_rules(Value::from("Alice")),
            Value::Null
        );
        assert_eq!(
            schema.column(1).unwrap().apply_rules(Value::from("IE")),
            Value::from("IE")
        );
    }
}
