//! Main Dashboard struct and public API.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, RoadstatsError};
use crate::filter::{FilterState, FilteredView, apply_filters};
use crate::input::{Dataset, Parser, ParserConfig, SourceMetadata};
use crate::schema::{InferenceConfig, Schema, SchemaInference};

/// Configuration for loading and inference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Schema inference configuration.
    pub inference: InferenceConfig,
}

impl DashboardConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| RoadstatsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.inference.validate()?;
        Ok(config)
    }
}

/// Overview of a loaded dataset and its inferred roles.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub rows: usize,
    pub fields: usize,
    pub schema: Schema,
    /// The measure charts default to.
    pub primary_measure: Option<String>,
    /// Years with a positive total, for a year selector.
    pub years: Vec<i64>,
    /// Distinct values of the categorical field.
    pub categories: Vec<String>,
    /// Detection labels, ordered for a selector.
    pub detection_options: Vec<String>,
}

/// A loaded dataset with its schema, handing out filtered views.
///
/// The dataset and schema never change after construction; filter state
/// belongs to the caller and is passed in for each view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    schema: Schema,
}

impl Dashboard {
    /// Build from a dataset with default inference settings.
    pub fn new(dataset: Dataset) -> Self {
        let schema = SchemaInference::new().infer_dataset(&dataset);
        Self { dataset, schema }
    }

    /// Build from a dataset with custom inference settings.
    pub fn with_config(dataset: Dataset, config: &InferenceConfig) -> Result<Self> {
        let schema = SchemaInference::with_config(config)?.infer_dataset(&dataset);
        Ok(Self { dataset, schema })
    }

    /// Load a delimited file with default settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_config(path, &DashboardConfig::default())
    }

    /// Load a delimited file.
    pub fn load_with_config(path: impl AsRef<Path>, config: &DashboardConfig) -> Result<Self> {
        let inference = SchemaInference::with_config(&config.inference)?;
        let dataset = Parser::with_config(config.parser.clone()).parse_file(path)?;
        let schema = inference.infer_dataset(&dataset);

        info!(
            year = ?schema.year_field,
            categorical = ?schema.categorical_field,
            numeric = schema.numeric_fields.len(),
            "schema ready"
        );

        Ok(Self { dataset, schema })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The rows and aggregations for one filter selection.
    pub fn view(&self, filters: &FilterState) -> FilteredView<'_> {
        apply_filters(&self.dataset, &self.schema, filters)
    }

    /// Years whose primary-measure total (or row count) is positive.
    pub fn year_options(&self) -> Vec<i64> {
        self.view(&FilterState::all())
            .year_options(self.schema.primary_measure())
    }

    /// Distinct categorical values in first-seen order.
    pub fn category_options(&self) -> Vec<String> {
        self.view(&FilterState::all())
            .category_totals(None)
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Detection labels present in the whole dataset.
    pub fn detection_options(&self) -> Vec<String> {
        self.view(&FilterState::all()).detection_options()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            source: self.dataset.source().cloned(),
            rows: self.dataset.len(),
            fields: self.dataset.fields().len(),
            schema: self.schema.clone(),
            primary_measure: self.schema.primary_measure().map(str::to_string),
            years: self.year_options(),
            categories: self.category_options(),
            detection_options: self.detection_options(),
        }
    }
}
