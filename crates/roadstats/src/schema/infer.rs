//! Heuristic field-role detection over loosely typed records.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::config::{DEFAULT_YEAR_PATTERNS, InferenceConfig};
use super::types::{FieldProfile, Schema};
use crate::classify::detection_column_labels;
use crate::error::Result;
use crate::input::{Dataset, Record, field};

static DEFAULT_YEAR_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_YEAR_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Infers a [`Schema`] from records.
#[derive(Debug, Clone)]
pub struct SchemaInference {
    threshold: f64,
    keywords: Vec<String>,
    year_patterns: Vec<Regex>,
}

impl SchemaInference {
    /// Create an inference engine with default settings.
    pub fn new() -> Self {
        let defaults = InferenceConfig::default();
        Self {
            threshold: defaults.numeric_threshold_fraction,
            keywords: defaults.categorical_keywords,
            year_patterns: DEFAULT_YEAR_REGEXES.clone(),
        }
    }

    /// Create an inference engine from a validated configuration.
    pub fn with_config(config: &InferenceConfig) -> Result<Self> {
        config.validate()?;
        let year_patterns = config
            .year_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            threshold: config.numeric_threshold_fraction,
            keywords: config
                .categorical_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            year_patterns,
        })
    }

    /// Infer roles for a dataset, using its declared field order.
    pub fn infer_dataset(&self, dataset: &Dataset) -> Schema {
        self.infer_fields(dataset.fields(), dataset.records())
    }

    /// Infer roles for bare records; field order follows first appearance.
    pub fn infer(&self, records: &[Record]) -> Schema {
        let mut fields: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !fields.iter().any(|f| f == key) {
                    fields.push(key.clone());
                }
            }
        }
        self.infer_fields(&fields, records)
    }

    fn infer_fields(&self, fields: &[String], records: &[Record]) -> Schema {
        if records.is_empty() {
            return Schema::default();
        }

        let profiles: Vec<FieldProfile> = fields
            .iter()
            .map(|name| profile_field(name, records))
            .collect();

        let required = self.required_numeric(records.len());
        let numeric_fields: Vec<String> = profiles
            .iter()
            .filter(|p| p.numeric >= required)
            .map(|p| p.name.clone())
            .collect();

        let year_field = self.detect_year(fields);
        let categorical_field = self.detect_categorical(fields, &numeric_fields);

        let mut detection_columns = IndexMap::new();
        for name in &numeric_fields {
            for label in detection_column_labels(name) {
                detection_columns.insert(label.to_string(), name.clone());
            }
        }

        debug!(
            records = records.len(),
            required,
            year = ?year_field,
            numeric = ?numeric_fields,
            categorical = ?categorical_field,
            "inferred schema"
        );

        Schema {
            fields: profiles,
            year_field,
            numeric_fields,
            categorical_field,
            detection_columns,
        }
    }

    /// Parsed values needed for a field to count as numeric: at least one,
    /// and at least the configured fraction of all records.
    fn required_numeric(&self, total: usize) -> usize {
        // The epsilon keeps products like 0.1 * 30 from rounding up a whole step
        let needed = (self.threshold * total as f64 - 1e-9).ceil();
        (needed.max(1.0)) as usize
    }

    fn detect_year(&self, fields: &[String]) -> Option<String> {
        self.year_patterns
            .iter()
            .find_map(|pattern| fields.iter().find(|f| pattern.is_match(f)))
            .cloned()
    }

    fn detect_categorical(&self, fields: &[String], numeric: &[String]) -> Option<String> {
        let candidates: Vec<&String> = fields
            .iter()
            .filter(|f| !numeric.contains(*f))
            .collect();

        candidates
            .iter()
            .find(|f| {
                let lower = f.to_lowercase();
                self.keywords.iter().any(|k| lower.contains(k.as_str()))
            })
            .or_else(|| candidates.first())
            .map(|f| (*f).clone())
    }
}

impl Default for SchemaInference {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer a schema with default settings.
pub fn infer_schema(records: &[Record]) -> Schema {
    SchemaInference::new().infer(records)
}

fn profile_field(name: &str, records: &[Record]) -> FieldProfile {
    let mut non_empty = 0;
    let mut numeric = 0;
    for record in records {
        let value = field(record, name);
        if !value.is_empty() {
            non_empty += 1;
        }
        if value.as_number().is_some() {
            numeric += 1;
        }
    }
    FieldProfile {
        name: name.to_string(),
        non_empty,
        numeric,
    }
}
