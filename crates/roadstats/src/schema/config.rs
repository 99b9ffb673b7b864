//! Tunables for schema inference.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoadstatsError};

/// Field-name keywords that mark a preferred categorical dimension.
pub const DEFAULT_CATEGORICAL_KEYWORDS: &[&str] = &[
    "method",
    "detection",
    "type",
    "issued",
    "offence",
    "offense",
    "category",
    "jurisdiction",
    "region",
];

/// Year field-name patterns, tried in order.
pub const DEFAULT_YEAR_PATTERNS: &[&str] = &[r"(?i)year", r"(?i)yr\b"];

/// Configuration for [`SchemaInference`](super::SchemaInference).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Minimum fraction of records whose value must parse as a number for a
    /// field to count as numeric.
    pub numeric_threshold_fraction: f64,
    /// Case-insensitive substrings that prefer a field as the category.
    pub categorical_keywords: Vec<String>,
    /// Regexes matched against field names to find the year field. Each
    /// pattern is tried over every field before the next pattern.
    pub year_patterns: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            numeric_threshold_fraction: 0.25,
            categorical_keywords: DEFAULT_CATEGORICAL_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            year_patterns: DEFAULT_YEAR_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl InferenceConfig {
    /// Set the numeric threshold.
    pub fn with_numeric_threshold(mut self, fraction: f64) -> Self {
        self.numeric_threshold_fraction = fraction;
        self
    }

    /// Replace the categorical keyword list.
    pub fn with_categorical_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Check value ranges. Patterns are checked when compiled.
    pub fn validate(&self) -> Result<()> {
        let t = self.numeric_threshold_fraction;
        if !(t > 0.0 && t <= 1.0) {
            return Err(RoadstatsError::Config(format!(
                "numeric_threshold_fraction must be in (0, 1], got {}",
                t
            )));
        }
        if self.year_patterns.is_empty() {
            return Err(RoadstatsError::Config(
                "at least one year pattern is required".to_string(),
            ));
        }
        Ok(())
    }
}
