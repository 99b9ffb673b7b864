//! Aggregate shapes handed to chart renderers.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Longest year range that gets densely filled.
pub const MAX_DENSE_SPAN: i64 = 10_000;

/// Group key to total, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult(IndexMap<String, f64>);

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to a key, creating it at zero first.
    pub fn add(&mut self, key: impl Into<String>, amount: f64) {
        *self.0.entry(key.into()).or_insert(0.0) += amount;
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum over all groups.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Entries sorted by descending value, ties by key.
    pub fn sorted_desc(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.0.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut result = AggregateResult::new();
        for (key, amount) in iter {
            result.add(key, amount);
        }
        result
    }
}

/// One point of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i64,
    pub value: f64,
}

/// A yearly series in both of the shapes a time chart needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearSeries {
    /// Every year from the first to the last present one, zeros included.
    pub dense: Vec<YearPoint>,
    /// Years with a strictly positive value, for axis ticks.
    pub ticks: Vec<i64>,
}

impl YearSeries {
    /// Build both shapes from per-year totals.
    pub fn from_totals(totals: &BTreeMap<i64, f64>) -> Self {
        let (Some((&first, _)), Some((&last, _))) =
            (totals.first_key_value(), totals.last_key_value())
        else {
            return Self::default();
        };

        let dense: Vec<YearPoint> = if last - first > MAX_DENSE_SPAN {
            warn!(first, last, "year range too wide to fill, keeping present years only");
            totals
                .iter()
                .map(|(&year, &value)| YearPoint { year, value })
                .collect()
        } else {
            (first..=last)
                .map(|year| YearPoint {
                    year,
                    value: totals.get(&year).copied().unwrap_or(0.0),
                })
                .collect()
        };

        let ticks = dense
            .iter()
            .filter(|p| p.value > 0.0)
            .map(|p| p.year)
            .collect();

        Self { dense, ticks }
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Points with a strictly positive value.
    pub fn non_zero(&self) -> Vec<YearPoint> {
        self.dense.iter().copied().filter(|p| p.value > 0.0).collect()
    }

    /// First and last year of the dense range.
    pub fn extent(&self) -> Option<(i64, i64)> {
        Some((self.dense.first()?.year, self.dense.last()?.year))
    }
}

/// A dense row-by-column matrix of totals, e.g. jurisdiction by age group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    /// Sorted row labels.
    pub rows: Vec<String>,
    /// Sorted column labels.
    pub columns: Vec<String>,
    /// `cells[r][c]`, zero where no records fell.
    pub cells: Vec<Vec<f64>>,
}

/// One cell of a [`CrossTab`], for renderers that want a flat list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabCell {
    pub row: String,
    pub column: String,
    pub value: f64,
}

impl CrossTab {
    /// Build from sparse `(row, column) -> total` entries.
    pub fn from_sparse(entries: &BTreeMap<(String, String), f64>) -> Self {
        let mut rows: Vec<String> = entries.keys().map(|(r, _)| r.clone()).collect();
        rows.dedup();
        let mut columns: Vec<String> = entries.keys().map(|(_, c)| c.clone()).collect();
        columns.sort();
        columns.dedup();

        let cells = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| {
                        entries
                            .get(&(r.clone(), c.clone()))
                            .copied()
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.cells[r][c])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Drop the row and column labelled `label`, if present.
    pub fn without_label(mut self, label: &str) -> Self {
        if let Some(r) = self.rows.iter().position(|x| x == label) {
            self.rows.remove(r);
            self.cells.remove(r);
        }
        if let Some(c) = self.columns.iter().position(|x| x == label) {
            self.columns.remove(c);
            for row in &mut self.cells {
                row.remove(c);
            }
        }
        self
    }

    /// Drop rows and columns for null values.
    pub fn without_unknown(self) -> Self {
        self.without_label(crate::input::UNKNOWN)
    }

    /// Largest cell value, for colour scales.
    pub fn max_value(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Row-major flat list of cells.
    pub fn items(&self) -> Vec<CrossTabCell> {
        self.rows
            .iter()
            .zip(&self.cells)
            .flat_map(|(r, row)| {
                self.columns.iter().zip(row).map(move |(c, v)| CrossTabCell {
                    row: r.clone(),
                    column: c.clone(),
                    value: *v,
                })
            })
            .collect()
    }
}

/// One point of a scatter/bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Police versus camera totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DetectionSplit {
    pub police: f64,
    pub camera: f64,
}

impl DetectionSplit {
    pub fn total(&self) -> f64 {
        self.police + self.camera
    }

    pub fn is_empty(&self) -> bool {
        self.police <= 0.0 && self.camera <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_series_fills_gaps() {
        let totals = BTreeMap::from([(2008, 5.0), (2010, 7.0)]);
        let series = YearSeries::from_totals(&totals);

        assert_eq!(
            series.dense,
            vec![
                YearPoint { year: 2008, value: 5.0 },
                YearPoint { year: 2009, value: 0.0 },
                YearPoint { year: 2010, value: 7.0 },
            ]
        );
        assert_eq!(series.ticks, vec![2008, 2010]);
        assert_eq!(series.non_zero().len(), 2);
        assert_eq!(series.extent(), Some((2008, 2010)));
    }

    #[test]
    fn test_zero_present_year_is_not_a_tick() {
        let totals = BTreeMap::from([(2020, 0.0), (2021, 3.0)]);
        let series = YearSeries::from_totals(&totals);
        assert_eq!(series.dense.len(), 2);
        assert_eq!(series.ticks, vec![2021]);
    }

    #[test]
    fn test_empty_series() {
        let series = YearSeries::from_totals(&BTreeMap::new());
        assert!(series.is_empty());
        assert!(series.ticks.is_empty());
        assert_eq!(series.extent(), None);
    }

    #[test]
    fn test_wide_range_is_not_filled() {
        let totals = BTreeMap::from([(0, 1.0), (1_000_000, 2.0)]);
        let series = YearSeries::from_totals(&totals);
        assert_eq!(series.dense.len(), 2);
    }

    #[test]
    fn test_aggregate_sorted_desc() {
        let agg: AggregateResult = [("B", 5.0), ("A", 13.0), ("C", 5.0)].into_iter().collect();
        assert_eq!(
            agg.sorted_desc(),
            vec![("A".to_string(), 13.0), ("B".to_string(), 5.0), ("C".to_string(), 5.0)]
        );
        assert_eq!(agg.total(), 23.0);
    }

    #[test]
    fn test_crosstab_zero_fill_and_unknown() {
        let entries = BTreeMap::from([
            (("NSW".to_string(), "17-25".to_string()), 4.0),
            (("VIC".to_string(), "26-39".to_string()), 2.0),
            (("VIC".to_string(), "Unknown".to_string()), 9.0),
        ]);
        let tab = CrossTab::from_sparse(&entries);

        assert_eq!(tab.rows, vec!["NSW", "VIC"]);
        assert_eq!(tab.columns, vec!["17-25", "26-39", "Unknown"]);
        assert_eq!(tab.get("NSW", "26-39"), Some(0.0));
        assert_eq!(tab.max_value(), 9.0);

        let tab = tab.without_unknown();
        assert_eq!(tab.columns, vec!["17-25", "26-39"]);
        assert_eq!(tab.items().len(), 4);
        assert_eq!(tab.max_value(), 4.0);
    }
}
