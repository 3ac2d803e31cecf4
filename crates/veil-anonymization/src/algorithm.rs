use crate::{
    error::{AnonymizationError, AnonymizationResult},
    table::Table,
    value::Value,
};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Tuple of identifying-column values shared by an equivalence class.
pub type GroupKey = Vec<Value>;

/// Number of rows per equivalence class.
///
/// Partial counts built over disjoint slices of a table can be combined with
/// [`GroupCounts::merge`]; the result is the same as counting in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupCounts {
    counts: HashMap<GroupKey, usize>,
}

impl GroupCounts {
    pub fn from_keys(keys: impl IntoIterator<Item = GroupKey>) -> Self {
        Self {
            counts: keys.into_iter().counts(),
        }
    }

    pub fn from_table(table: &Table) -> Self {
        Self::from_keys(table.identifying_projections())
    }

    pub fn merge(&mut self, other: GroupCounts) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    pub fn group_count(&self) -> usize {
        self.counts.len()
    }

    /// Rows counted over all groups.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn size_of(&self, key: &[Value]) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KAnonymityReport {
    /// Size of the smallest equivalence class.
    pub k: usize,
    pub group_count: usize,
    /// Every identifying tuple whose class has exactly `k` rows.
    pub minimal_groups: BTreeSet<GroupKey>,
}

impl KAnonymityReport {
    pub fn from_counts(counts: &GroupCounts) -> AnonymizationResult<Self> {
        let k = counts
            .counts
            .values()
            .copied()
            .min()
            .ok_or(AnonymizationError::EmptyDataset)?;

        let minimal_groups = counts
            .iter()
            .filter(|(_, size)| *size == k)
            .map(|(key, _)| key.clone())
            .collect();

        Ok(Self {
            k,
            group_count: counts.group_count(),
            minimal_groups,
        })
    }

    pub fn is_k_anonymous(&self, k: usize) -> bool {
        self.k >= k
    }
}

/// Measures the k-anonymity of a (transformed) table over its identifier
/// and quasi-identifier columns.
pub fn k_anonymity(table: &Table) -> AnonymizationResult<KAnonymityReport> {
    let counts = GroupCounts::from_table(table);
    let report = KAnonymityReport::from_counts(&counts)?;

    debug!(
        k = report.k,
        groups = report.group_count,
        minimal = report.minimal_groups.len(),
        "computed k-anonymity"
    );

    Ok(report)
}

#[derive(Clone, Debug, PartialEq)]
pub struct LDiversityReport {
    /// Smallest `l` over all sensitive columns, `None` without any.
    pub l: Option<usize>,
    /// Per sensitive column: the fewest distinct values found in any
    /// equivalence class.
    pub columns: BTreeMap<String, usize>,
}

impl LDiversityReport {
    pub fn is_l_diverse(&self, l: usize) -> bool {
        self.l.map_or(true, |value| value >= l)
    }
}

/// Measures distinct l-diversity for every sensitive column that is not
/// itself used for grouping.
pub fn l_diversity(table: &Table) -> AnonymizationResult<LDiversityReport> {
    if table.is_empty() {
        return Err(AnonymizationError::EmptyDataset);
    }

    let schema = table.schema();
    let sensitive_columns: Vec<(usize, &str)> = schema
        .iter()
        .enumerate()
        .filter(|(_, column)| column.is_sensitive() && !column.id_class().is_identifying())
        .map(|(index, column)| (index, column.name()))
        .collect();

    let classes: HashMap<GroupKey, Vec<usize>> = table
        .identifying_projections()
        .enumerate()
        .map(|(row_index, key)| (key, row_index))
        .into_group_map();

    let mut columns = BTreeMap::new();
    for (column_index, name) in sensitive_columns {
        let l = classes
            .values()
            .map(|members| {
                members
                    .iter()
                    .map(|&row_index| &table.rows()[row_index][column_index])
                    .collect::<HashSet<&Value>>()
                    .len()
            })
            .min()
            .unwrap_or(0);

        columns.insert(name.to_string(), l);
    }

    let report = LDiversityReport {
        l: columns.values().copied().min(),
        columns,
    };

    debug!(l = ?report.l, "computed l-diversity");

    Ok(report)
}
