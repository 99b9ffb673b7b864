//! Filtered row subsets and the aggregations computed over them.

use std::collections::BTreeMap;

use tracing::debug;

use super::aggregate::{AggregateResult, CrossTab, DetectionSplit, ScatterPoint, YearSeries};
use super::state::{FilterState, Selection};
use crate::classify::{
    DETECTION_CAMERA, DETECTION_POLICE, derive_detection, detection_label, order_detection_options,
};
use crate::input::{Dataset, Record, UNKNOWN, field};
use crate::schema::Schema;

/// The rows of a dataset that pass one [`FilterState`].
///
/// Views only borrow the dataset and schema, so any number of them, built
/// from different selections, can be alive at once.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    schema: &'a Schema,
    filters: FilterState,
    rows: Vec<&'a Record>,
}

/// Select the rows of `dataset` matching every active filter.
pub fn apply_filters<'a>(
    dataset: &'a Dataset,
    schema: &'a Schema,
    filters: &FilterState,
) -> FilteredView<'a> {
    let rows: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| matches_filters(r, schema, filters))
        .collect();

    debug!(
        year = %filters.year,
        category = %filters.category,
        detection = %filters.detection,
        dimensions = filters.dimensions.len(),
        matched = rows.len(),
        total = dataset.len(),
        "applied filters"
    );

    FilteredView {
        dataset,
        schema,
        filters: filters.clone(),
        rows,
    }
}

fn matches_filters(record: &Record, schema: &Schema, filters: &FilterState) -> bool {
    if let (Selection::Only(year), Some(year_field)) = (&filters.year, &schema.year_field) {
        if field(record, year_field).as_year() != Some(*year) {
            return false;
        }
    }

    if let (Selection::Only(category), Some(cat_field)) =
        (&filters.category, &schema.categorical_field)
    {
        if field(record, cat_field).group_key() != category.as_str() {
            return false;
        }
    }

    if let Selection::Only(label) = &filters.detection {
        if schema.has_detection_columns() {
            // Unknown labels leave aggregated-column datasets unfiltered
            if let Some(column) = schema.detection_column(label) {
                if field(record, column).number_or_zero() <= 0.0 {
                    return false;
                }
            }
        } else if derive_detection(record) != label.as_str() {
            return false;
        }
    }

    filters
        .dimensions
        .iter()
        .all(|(name, wanted)| field(record, name).group_key() == wanted.as_str())
}

impl<'a> FilteredView<'a> {
    /// The matching rows, in dataset order.
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Sum `value_field` per distinct value of `group_field`.
    ///
    /// Null groups become `"Unknown"`; unparseable values add zero. With no
    /// value field, rows are counted instead. Field names the dataset does not
    /// have produce an empty result.
    pub fn group_sum(&self, group_field: &str, value_field: Option<&str>) -> AggregateResult {
        if !self.dataset.has_field(group_field) {
            return AggregateResult::new();
        }
        let Some(value_field) = value_field else {
            return self.group_count(group_field);
        };
        if !self.dataset.has_field(value_field) {
            return AggregateResult::new();
        }

        let mut result = AggregateResult::new();
        for record in &self.rows {
            result.add(
                field(record, group_field).group_key(),
                field(record, value_field).number_or_zero(),
            );
        }
        result
    }

    /// Count rows per distinct value of `group_field`.
    pub fn group_count(&self, group_field: &str) -> AggregateResult {
        if !self.dataset.has_field(group_field) {
            return AggregateResult::new();
        }

        let mut result = AggregateResult::new();
        for record in &self.rows {
            result.add(field(record, group_field).group_key(), 1.0);
        }
        result
    }

    /// Totals per category for non-time charts (pie, bar).
    ///
    /// The key is the category alone, so with the year filter inactive every
    /// category appears once, summed over all years. Empty when the schema
    /// has no categorical field.
    pub fn category_totals(&self, value_field: Option<&str>) -> AggregateResult {
        match &self.schema.categorical_field {
            Some(cat) => self.group_sum(cat, value_field),
            None => AggregateResult::new(),
        }
    }

    /// Per-year totals per group, for grouped bar charts.
    ///
    /// Rows without a parseable year are skipped.
    pub fn group_sum_by_year(
        &self,
        group_field: &str,
        value_field: Option<&str>,
    ) -> BTreeMap<i64, AggregateResult> {
        let mut by_year: BTreeMap<i64, AggregateResult> = BTreeMap::new();
        let Some(year_field) = &self.schema.year_field else {
            return by_year;
        };
        if !self.dataset.has_field(group_field)
            || value_field.is_some_and(|v| !self.dataset.has_field(v))
        {
            return by_year;
        }

        for record in &self.rows {
            let Some(year) = field(record, year_field).as_year() else {
                continue;
            };
            let amount = value_field.map_or(1.0, |v| field(record, v).number_or_zero());
            by_year
                .entry(year)
                .or_default()
                .add(field(record, group_field).group_key(), amount);
        }
        by_year
    }

    /// Yearly totals of `value_field` (or row counts), dense and tick forms.
    ///
    /// The dense form covers every year from the first to the last, except
    /// when that span exceeds [`MAX_DENSE_SPAN`](super::MAX_DENSE_SPAN)
    /// years: then only the years present in the rows are kept, so the dense
    /// form can have gaps.
    pub fn year_series(&self, value_field: Option<&str>) -> YearSeries {
        let Some(year_field) = &self.schema.year_field else {
            return YearSeries::default();
        };
        if value_field.is_some_and(|v| !self.dataset.has_field(v)) {
            return YearSeries::default();
        }

        let mut totals: BTreeMap<i64, f64> = BTreeMap::new();
        for record in &self.rows {
            let Some(year) = field(record, year_field).as_year() else {
                continue;
            };
            let amount = value_field.map_or(1.0, |v| field(record, v).number_or_zero());
            *totals.entry(year).or_insert(0.0) += amount;
        }
        YearSeries::from_totals(&totals)
    }

    /// Years with a positive total, for a year selector.
    pub fn year_options(&self, value_field: Option<&str>) -> Vec<i64> {
        self.year_series(value_field).ticks
    }

    /// Totals of `value_field` (or counts) for every row/column label pair.
    pub fn crosstab(
        &self,
        row_field: &str,
        column_field: &str,
        value_field: Option<&str>,
    ) -> CrossTab {
        if !self.dataset.has_field(row_field)
            || !self.dataset.has_field(column_field)
            || value_field.is_some_and(|v| !self.dataset.has_field(v))
        {
            return CrossTab::default();
        }

        let mut entries: BTreeMap<(String, String), f64> = BTreeMap::new();
        for record in &self.rows {
            let key = (
                field(record, row_field).group_key().into_owned(),
                field(record, column_field).group_key().into_owned(),
            );
            let amount = value_field.map_or(1.0, |v| field(record, v).number_or_zero());
            *entries.entry(key).or_insert(0.0) += amount;
        }
        CrossTab::from_sparse(&entries)
    }

    /// Points for a scatter chart; rows where either axis is not a number
    /// are dropped. Labels are detection labels of `label_field`.
    pub fn scatter_points(
        &self,
        x_field: &str,
        y_field: &str,
        label_field: Option<&str>,
    ) -> Vec<ScatterPoint> {
        self.rows
            .iter()
            .filter_map(|record| {
                let x = field(record, x_field).as_number()?;
                let y = field(record, y_field).as_number()?;
                let label = label_field
                    .map(|f| detection_label(field(record, f)).into_owned())
                    .unwrap_or_else(|| UNKNOWN.to_string());
                Some(ScatterPoint { x, y, label })
            })
            .collect()
    }

    /// Scatter points for datasets with detection columns: x is the column for
    /// `label`, y the sum of all detection columns, labelled by category.
    pub fn detection_scatter(&self, label: &str) -> Vec<ScatterPoint> {
        let columns: Vec<&str> = self
            .schema
            .detection_columns
            .values()
            .map(String::as_str)
            .collect();
        let Some(selected) = self
            .schema
            .detection_column(label)
            .or_else(|| columns.first().copied())
        else {
            return Vec::new();
        };

        self.rows
            .iter()
            .map(|record| ScatterPoint {
                x: field(record, selected).number_or_zero(),
                y: columns
                    .iter()
                    .map(|c| field(record, c).number_or_zero())
                    .sum(),
                label: self
                    .schema
                    .categorical_field
                    .as_deref()
                    .map(|c| field(record, c).group_key().into_owned())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            })
            .collect()
    }

    /// Police versus camera totals over the view.
    ///
    /// Detection columns are summed when the schema has them; otherwise each
    /// row's derived detection decides, adding `value_field` or one per row.
    pub fn detection_split(&self, value_field: Option<&str>) -> DetectionSplit {
        let mut split = DetectionSplit::default();

        if self.schema.has_detection_columns() {
            let sum = |label: &str| -> f64 {
                self.schema.detection_column(label).map_or(0.0, |col| {
                    self.rows
                        .iter()
                        .map(|r| field(r, col).number_or_zero())
                        .sum()
                })
            };
            split.police = sum(DETECTION_POLICE);
            split.camera = sum(DETECTION_CAMERA);
            return split;
        }

        for record in &self.rows {
            let amount = value_field.map_or(1.0, |v| field(record, v).number_or_zero());
            match derive_detection(record) {
                DETECTION_POLICE => split.police += amount,
                DETECTION_CAMERA => split.camera += amount,
                _ => {}
            }
        }
        split
    }

    /// Detection labels present in the view, ordered for a selector.
    pub fn detection_options(&self) -> Vec<String> {
        if self.schema.has_detection_columns() {
            return order_detection_options(self.schema.detection_columns.keys());
        }
        order_detection_options(self.rows.iter().map(|r| derive_detection(r)))
    }
}
