//! roadstats: schema inference, cross-filtering and statistics for road-safety
//! fines datasets.
//!
//! Tabular data arrives with no fixed schema. roadstats works out which field
//! is the year, which fields are measures and which is the main category, then
//! serves filtered rows and grouped totals to chart renderers, plus a 2×2
//! chi-square comparison.
//!
//! # Core Principles
//!
//! - **Immutable data**: a loaded dataset and its schema never change
//! - **Explicit state**: filter selections are values passed into each view
//! - **Total functions**: missing roles or fields give empty results, not errors
//!
//! # Example
//!
//! ```no_run
//! use roadstats::{Dashboard, FilterState};
//!
//! let dashboard = Dashboard::load("police_enforcement_2024_fines.csv").unwrap();
//! let view = dashboard.view(&FilterState::all().with_year(2024));
//!
//! let measure = dashboard.schema().primary_measure();
//! for (jurisdiction, total) in view.category_totals(measure).iter() {
//!     println!("{jurisdiction}: {total}");
//! }
//! ```

pub mod classify;
pub mod error;
pub mod filter;
pub mod input;
pub mod schema;
pub mod stats;

mod dashboard;

pub use crate::dashboard::{Dashboard, DashboardConfig, DashboardSummary};
pub use error::{Result, RoadstatsError};
pub use filter::{AggregateResult, FilterState, FilteredView, Selection, YearSeries, apply_filters};
pub use input::{Dataset, Parser, ParserConfig, Record, SourceMetadata, Value};
pub use schema::{InferenceConfig, Schema, SchemaInference, infer_schema};
pub use stats::{ChiSquareResult, ContingencyTable, chi_square_independence};
