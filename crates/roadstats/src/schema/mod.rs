//! Schema inference: which fields hold years, measures and categories.

mod config;
mod infer;
mod types;

pub use config::{DEFAULT_CATEGORICAL_KEYWORDS, DEFAULT_YEAR_PATTERNS, InferenceConfig};
pub use infer::{SchemaInference, infer_schema};
pub use types::{FieldProfile, Schema};
