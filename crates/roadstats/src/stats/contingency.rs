//! 2×2 contingency tables.

use serde::{Deserialize, Serialize};

use crate::classify::LocationCategory;
use crate::input::{Record, field};

/// Counts of (group, condition) pairs: `[[a, b], [c, d]]`, rows are groups,
/// columns are condition present / absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContingencyTable {
    pub cells: [[f64; 2]; 2],
}

impl ContingencyTable {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            cells: [[a, b], [c, d]],
        }
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.cells[row][column]
    }

    pub fn row_totals(&self) -> [f64; 2] {
        [
            self.cells[0][0] + self.cells[0][1],
            self.cells[1][0] + self.cells[1][1],
        ]
    }

    pub fn column_totals(&self) -> [f64; 2] {
        [
            self.cells[0][0] + self.cells[1][0],
            self.cells[0][1] + self.cells[1][1],
        ]
    }

    /// Grand total N.
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Build a table from rows.
    ///
    /// `group` places a row in table row 0 or 1, or skips it with `None`.
    /// `condition` picks column 0 when true. Each row adds `value_field`
    /// (unparseable as zero), or one when no value field is given.
    pub fn from_rows<'a, I, G, C>(
        rows: I,
        group: G,
        condition: C,
        value_field: Option<&str>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        G: Fn(&Record) -> Option<usize>,
        C: Fn(&Record) -> bool,
    {
        let mut table = Self::default();
        for record in rows {
            let Some(row) = group(record).filter(|r| *r < 2) else {
                continue;
            };
            let column = if condition(record) { 0 } else { 1 };
            table.cells[row][column] +=
                value_field.map_or(1.0, |v| field(record, v).number_or_zero());
        }
        table
    }

    /// Major cities versus regional locations, by whether `metric_field`
    /// equals `metric`.
    ///
    /// Row 0 is Major Cities, row 1 the inner/outer regional, remote and very
    /// remote categories together. Locations that classify as neither are
    /// left out.
    pub fn location_by_metric<'a, I>(
        rows: I,
        location_field: &str,
        metric_field: &str,
        metric: &str,
        value_field: Option<&str>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        Self::from_rows(
            rows,
            |r| match LocationCategory::from_value(field(r, location_field)) {
                LocationCategory::MajorCities => Some(0),
                category if category.is_regional() => Some(1),
                _ => None,
            },
            |r| field(r, metric_field).group_key() == metric,
            value_field,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn record(location: &str, metric: &str, fines: &str) -> Record {
        [
            ("LOCATION", Value::from_cell(location)),
            ("METRIC", Value::from_cell(metric)),
            ("FINES", Value::from_cell(fines)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_totals() {
        let table = ContingencyTable::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(table.row_totals(), [3.0, 7.0]);
        assert_eq!(table.column_totals(), [4.0, 6.0]);
        assert_eq!(table.total(), 10.0);
    }

    #[test]
    fn test_location_by_metric() {
        let rows = vec![
            record("Major Cities of Australia", "mobile_phone_use", "100"),
            record("Major Cities of Australia", "speed_fines", "40"),
            record("Inner Regional Australia", "mobile_phone_use", "20"),
            record("Very Remote Australia", "mobile_phone_use", "5"),
            record("Remote Australia", "speed_fines", "7"),
            record("Unknown", "mobile_phone_use", "999"),
            record("", "speed_fines", "999"),
        ];

        let table = ContingencyTable::location_by_metric(
            &rows,
            "LOCATION",
            "METRIC",
            "mobile_phone_use",
            Some("FINES"),
        );
        assert_eq!(table, ContingencyTable::new(100.0, 40.0, 25.0, 7.0));
    }

    #[test]
    fn test_from_rows_counts_without_value_field() {
        let rows = vec![
            record("Major Cities", "a", "1"),
            record("Major Cities", "b", "1"),
            record("Outer Regional", "a", "1"),
        ];
        let table = ContingencyTable::location_by_metric(&rows, "LOCATION", "METRIC", "a", None);
        assert_eq!(table, ContingencyTable::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_serializes_as_nested_array() {
        let json = serde_json::to_string(&ContingencyTable::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
    }
}
