//! Chi-square independence test for 2×2 tables.
//!
//! The p-value is `1 - erf(sqrt(chi2) / sqrt(2))`, a normal approximation on
//! `sqrt(chi2)` rather than the exact chi-square survival function with one
//! degree of freedom. Outputs stay numerically compatible with earlier
//! reports that used this formula.

use serde::{Deserialize, Serialize};

use super::contingency::ContingencyTable;

// Abramowitz & Stegun 7.1.26, max absolute error 1.5e-7
const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Result of [`chi_square_independence`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    /// Test statistic.
    pub chi2: f64,
    /// Approximate p-value.
    pub p: f64,
    /// Expected counts under independence.
    pub expected: ContingencyTable,
}

impl ChiSquareResult {
    /// Whether `p` falls below `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p < alpha
    }
}

/// Chi-square statistic and approximate p-value for a 2×2 table.
///
/// An empty table gives `chi2 = 0`, `p = 1`. Cells whose expected count is
/// zero contribute nothing.
pub fn chi_square_independence(table: &ContingencyTable) -> ChiSquareResult {
    let n = table.total();
    if n == 0.0 {
        return ChiSquareResult {
            chi2: 0.0,
            p: 1.0,
            expected: ContingencyTable::default(),
        };
    }

    let rows = table.row_totals();
    let cols = table.column_totals();

    let mut expected = ContingencyTable::default();
    let mut chi2 = 0.0;
    for i in 0..2 {
        for j in 0..2 {
            let e = rows[i] * cols[j] / n;
            expected.cells[i][j] = e;
            if e > 0.0 {
                chi2 += (table.cells[i][j] - e).powi(2) / e;
            }
        }
    }

    let p = 1.0 - erf(chi2.sqrt() / std::f64::consts::SQRT_2);

    ChiSquareResult { chi2, p, expected }
}

/// Rational approximation of the error function.
pub fn erf(x: f64) -> f64 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_association() {
        let result = chi_square_independence(&ContingencyTable::new(10.0, 0.0, 0.0, 10.0));

        assert!((result.chi2 - 20.0).abs() < 1e-12);
        assert_eq!(result.expected, ContingencyTable::new(5.0, 5.0, 5.0, 5.0));
        assert!(result.p > 0.0);
        assert!(result.p < 0.001);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_empty_table() {
        let result = chi_square_independence(&ContingencyTable::default());
        assert_eq!(result.chi2, 0.0);
        assert_eq!(result.p, 1.0);
        assert_eq!(result.expected, ContingencyTable::default());
    }

    #[test]
    fn test_independent_table() {
        let result = chi_square_independence(&ContingencyTable::new(10.0, 20.0, 30.0, 60.0));
        assert!(result.chi2.abs() < 1e-12);
        assert!((result.p - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_expected_cells_are_skipped() {
        // Second column is empty, so two expected cells are zero
        let result = chi_square_independence(&ContingencyTable::new(4.0, 0.0, 6.0, 0.0));
        assert_eq!(result.chi2, 0.0);
        assert!(result.chi2.is_finite());
        assert_eq!(result.expected.get(0, 1), 0.0);
    }

    #[test]
    fn test_erf_reference_values() {
        assert!(erf(0.0).abs() < 1e-7);
        assert!((erf(1.0) - 0.8427007929).abs() < 2e-7);
        assert!((erf(-1.0) + 0.8427007929).abs() < 2e-7);
        assert!((erf(2.0) - 0.9953222650).abs() < 2e-7);
    }

    #[test]
    fn test_p_uses_normal_approximation() {
        // chi2 = 3.841 is the exact 0.05 cutoff for one degree of freedom;
        // the normal approximation on sqrt(chi2) lands at the same place.
        let p = 1.0 - erf(3.841_f64.sqrt() / std::f64::consts::SQRT_2);
        assert!((p - 0.05).abs() < 1e-3);
    }
}
