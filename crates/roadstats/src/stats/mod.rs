//! Statistical comparison of aggregated counts.

mod chi_square;
mod contingency;

pub use chi_square::{ChiSquareResult, chi_square_independence, erf};
pub use contingency::ContingencyTable;
