//! Inferred schema types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-field counts gathered during inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProfile {
    /// Field name.
    pub name: String,
    /// Records with a non-empty value.
    pub non_empty: usize,
    /// Records whose value parses as a number.
    pub numeric: usize,
}

/// Roles inferred for the fields of a dataset.
///
/// Every role is optional; a missing role means the consumer that needs it
/// (a time series without a year, a pie without a category) should be skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Profiles in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldProfile>,
    /// The time dimension.
    pub year_field: Option<String>,
    /// Numeric measures in declaration order. May include the year field.
    #[serde(default)]
    pub numeric_fields: Vec<String>,
    /// The primary categorical dimension. Never numeric.
    pub categorical_field: Option<String>,
    /// Pre-aggregated detection columns, keyed by detection label.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub detection_columns: IndexMap<String, String>,
}

impl Schema {
    /// Whether a field was classified as numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric_fields.iter().any(|f| f == name)
    }

    /// The default measure: the first numeric field that is not the year.
    pub fn primary_measure(&self) -> Option<&str> {
        self.numeric_fields
            .iter()
            .find(|f| self.year_field.as_deref() != Some(f.as_str()))
            .map(String::as_str)
    }

    /// Whether detection is carried as numeric columns rather than row text.
    pub fn has_detection_columns(&self) -> bool {
        !self.detection_columns.is_empty()
    }

    /// The numeric column holding totals for a detection label.
    pub fn detection_column(&self, label: &str) -> Option<&str> {
        self.detection_columns.get(label).map(String::as_str)
    }

    /// Look up a field profile by name.
    pub fn profile(&self, name: &str) -> Option<&FieldProfile> {
        self.fields.iter().find(|p| p.name == name)
    }
}
