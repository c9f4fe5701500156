use std::collections::{BTreeMap, BTreeSet};

use super::model::{FilterColumn, LiftRecord, LiftType};

// ---------------------------------------------------------------------------
// Filter catalog: selectable values per column
// ---------------------------------------------------------------------------

/// For each filter column, the distinct present values seen in the rows.
///
/// Empty text, numeric zero and boolean `false` count as absent and are never
/// offered, whichever decoder produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCatalog {
    values: BTreeMap<FilterColumn, BTreeSet<String>>,
}

impl FilterCatalog {
    /// Walk every row once. Every filter column gets an entry, possibly empty.
    pub fn from_rows(rows: &[LiftRecord]) -> Self {
        let mut values: BTreeMap<FilterColumn, BTreeSet<String>> = FilterColumn::ALL
            .into_iter()
            .map(|col| (col, BTreeSet::new()))
            .collect();

        for rec in rows {
            for col in FilterColumn::ALL {
                if let Some(value) = col.value_of(rec).filter(|v| is_present(v)) {
                    if let Some(set) = values.get_mut(&col) {
                        if !set.contains(value) {
                            set.insert(value.to_string());
                        }
                    }
                }
            }
        }

        FilterCatalog { values }
    }

    /// Sorted distinct values for a column.
    pub fn values(&self, column: FilterColumn) -> impl Iterator<Item = &str> {
        self.values
            .get(&column)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn contains(&self, column: FilterColumn, value: &str) -> bool {
        self.values
            .get(&column)
            .is_some_and(|set| set.contains(value))
    }

    /// Columns in display order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (FilterColumn, &BTreeSet<String>)> {
        self.values.iter().map(|(col, set)| (*col, set))
    }
}

/// Decoders render numeric zero as `"0"` and boolean false as `"false"`.
fn is_present(value: &str) -> bool {
    !matches!(value, "" | "0" | "false")
}

// ---------------------------------------------------------------------------
// Filter selection: at most one required value per column
// ---------------------------------------------------------------------------

/// The user's current constraints. A column without an entry is unset and
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    values: BTreeMap<FilterColumn, String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `value` for `column`; `None` or an empty string unsets it.
    pub fn set(&mut self, column: FilterColumn, value: Option<String>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.values.insert(column, v);
            }
            None => {
                self.values.remove(&column);
            }
        }
    }

    /// Builder-style [`FilterSelection::set`].
    pub fn with(mut self, column: FilterColumn, value: impl Into<String>) -> Self {
        self.set(column, Some(value.into()));
        self
    }

    pub fn get(&self, column: FilterColumn) -> Option<&str> {
        self.values.get(&column).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Exact equality on every set column, no normalisation.
    pub fn matches(&self, rec: &LiftRecord) -> bool {
        self.values
            .iter()
            .all(|(col, required)| col.value_of(rec) == Some(required.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Best results for `lift` of the partition rows matching `selection`,
/// in partition order.
pub fn filter_values<'a>(
    partition: impl IntoIterator<Item = &'a LiftRecord>,
    lift: LiftType,
    selection: &FilterSelection,
) -> Vec<f64> {
    partition
        .into_iter()
        .filter(|rec| selection.matches(rec))
        .filter_map(|rec| lift.best_result(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifter(sex: &str, equipment: &str, bench: f64) -> LiftRecord {
        LiftRecord {
            sex: sex.into(),
            equipment: equipment.into(),
            max_lift: "Bench".into(),
            best3_bench_kg: Some(bench),
            ..Default::default()
        }
    }

    #[test]
    fn catalog_collects_distinct_present_values() {
        let rows = vec![
            lifter("M", "Raw", 100.0),
            lifter("F", "Raw", 60.0),
            lifter("M", "", 110.0),
        ];
        let catalog = FilterCatalog::from_rows(&rows);

        assert_eq!(catalog.values(FilterColumn::Sex).collect::<Vec<_>>(), ["F", "M"]);
        assert_eq!(catalog.values(FilterColumn::Equipment).collect::<Vec<_>>(), ["Raw"]);
        assert_eq!(catalog.values(FilterColumn::Sanctioned).count(), 0);
        assert_eq!(catalog.iter().count(), FilterColumn::ALL.len());
        assert!(catalog.contains(FilterColumn::Sex, "M"));
        assert!(!catalog.contains(FilterColumn::Sex, "Mx"));
    }

    #[test]
    fn catalog_skips_zero_and_false() {
        let mut zero = lifter("M", "Raw", 100.0);
        zero.weight_class_kg = "0".into();
        zero.sanctioned = "false".into();
        let mut classed = lifter("F", "Raw", 60.0);
        classed.weight_class_kg = "63".into();
        classed.sanctioned = "0".into();

        let catalog = FilterCatalog::from_rows(&[zero, classed]);
        assert_eq!(catalog.values(FilterColumn::WeightClassKg).collect::<Vec<_>>(), ["63"]);
        assert_eq!(catalog.values(FilterColumn::Sanctioned).count(), 0);
        assert!(!catalog.contains(FilterColumn::WeightClassKg, "0"));
    }

    #[test]
    fn every_catalog_value_occurs_in_a_row() {
        let rows = vec![lifter("M", "Wraps", 100.0), lifter("F", "Single-ply", 60.0)];
        let catalog = FilterCatalog::from_rows(&rows);
        for (col, values) in catalog.iter() {
            for v in values {
                assert!(rows.iter().any(|r| col.value_of(r) == Some(v.as_str())));
            }
        }
    }

    #[test]
    fn empty_selection_returns_whole_partition_in_order() {
        let rows = vec![lifter("M", "Raw", 100.0), lifter("F", "Raw", 60.0), lifter("M", "Wraps", 90.0)];
        let values = filter_values(&rows, LiftType::Bench, &FilterSelection::new());
        assert_eq!(values, [100.0, 60.0, 90.0]);
    }

    #[test]
    fn all_constraints_must_match() {
        let rows = vec![lifter("M", "Raw", 100.0), lifter("F", "Raw", 60.0), lifter("M", "Wraps", 90.0)];
        let selection = FilterSelection::new()
            .with(FilterColumn::Sex, "M")
            .with(FilterColumn::Equipment, "Raw");
        assert_eq!(filter_values(&rows, LiftType::Bench, &selection), [100.0]);
    }

    #[test]
    fn unmatched_value_gives_empty_result() {
        let rows = vec![lifter("M", "Raw", 100.0)];
        let selection = FilterSelection::new().with(FilterColumn::Sex, "Mx");
        assert!(filter_values(&rows, LiftType::Bench, &selection).is_empty());
    }

    #[test]
    fn unset_clears_a_constraint() {
        let mut selection = FilterSelection::new().with(FilterColumn::Sex, "F");
        selection.set(FilterColumn::Sex, Some(String::new()));
        assert!(selection.is_empty());

        selection.set(FilterColumn::Equipment, Some("Raw".into()));
        assert_eq!(selection.get(FilterColumn::Equipment), Some("Raw"));
        selection.set(FilterColumn::Equipment, None);
        assert_eq!(selection.get(FilterColumn::Equipment), None);
    }

    #[test]
    fn matching_is_exact() {
        let rows = vec![lifter("M", "Raw", 100.0)];
        let selection = FilterSelection::new().with(FilterColumn::Equipment, "raw");
        assert!(filter_values(&rows, LiftType::Bench, &selection).is_empty());
    }
}
