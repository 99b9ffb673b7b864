//! User filter selections.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A selector value: either everything or one specific value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// The selected value, if the selector is active.
    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// Parses `"All"` (any case) as [`Selection::All`], anything else as a value.
impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.trim().parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// The active selections for one view.
///
/// Each dimension is independent; a row must satisfy every active one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Year, matched against the schema's year field.
    pub year: Selection<i64>,
    /// Category, matched against the schema's categorical field.
    pub category: Selection<String>,
    /// Detection method label.
    pub detection: Selection<String>,
    /// Extra exact-match filters keyed by field name.
    pub dimensions: IndexMap<String, String>,
}

impl FilterState {
    /// No active filters.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Selection::Only(year);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Selection::Only(category.into());
        self
    }

    pub fn with_detection(mut self, label: impl Into<String>) -> Self {
        self.detection = Selection::Only(label.into());
        self
    }

    /// Add an exact-match filter on any field, e.g. `AGE_GROUP = "17-25"`.
    pub fn with_dimension(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(field.into(), value.into());
        self
    }

    /// Whether every row passes.
    pub fn is_unfiltered(&self) -> bool {
        self.year.is_all()
            && self.category.is_all()
            && self.detection.is_all()
            && self.dimensions.is_empty()
    }
}
