//! Cross-filtering and grouped aggregation over an inferred schema.

mod aggregate;
mod state;
mod view;

pub use aggregate::{
    AggregateResult, CrossTab, CrossTabCell, DetectionSplit, MAX_DENSE_SPAN, ScatterPoint, YearPoint,
    YearSeries,
};
pub use state::{FilterState, Selection};
pub use view::{FilteredView, apply_filters};
