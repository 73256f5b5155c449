//! Ordinary least squares
//!
//! Solves `min ||y - X b||²` through the normal equations `X'X b = X'y`
//! with partially pivoted Gaussian elimination. The systems solved here are
//! tiny (two columns for the market model) so a direct solve is enough.

use crate::error::{Result, ScoreError};
use ndarray::{Array1, Array2, Axis};

/// Relative pivot threshold below which `X'X` is treated as singular
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Result of a least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// Fitted coefficients, one per design column
    pub coefficients: Array1<f64>,
    /// Per-observation residuals `y - X b`
    pub residuals: Array1<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
}

impl OlsFit {
    /// Coefficient on the first design column.
    ///
    /// For [`market_model`] this is the market beta.
    pub fn slope(&self) -> f64 {
        self.coefficients[0]
    }

    /// Coefficient on the last design column.
    ///
    /// For [`market_model`] this is the intercept (alpha).
    pub fn intercept(&self) -> f64 {
        self.coefficients[self.coefficients.len() - 1]
    }
}

/// Fit `y` on the columns of `x` by ordinary least squares.
///
/// # Errors
/// * [`ScoreError::DimensionMismatch`] if `y` and `x` disagree on the
///   number of observations
/// * [`ScoreError::InsufficientData`] if there are not more observations
///   than columns
/// * [`ScoreError::NonFinite`] if any input is NaN or infinite
/// * [`ScoreError::SingularMatrix`] if the columns of `x` are collinear
pub fn ols(x: &Array2<f64>, y: &Array1<f64>) -> Result<OlsFit> {
    let (n_obs, n_cols) = x.dim();
    if y.len() != n_obs {
        return Err(ScoreError::DimensionMismatch {
            expected: n_obs,
            actual: y.len(),
        });
    }
    if n_obs <= n_cols {
        return Err(ScoreError::InsufficientData {
            required: n_cols + 1,
            actual: n_obs,
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ScoreError::NonFinite("regression inputs"));
    }

    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    let coefficients = solve(xtx, xty)?;

    let residuals = y - &x.dot(&coefficients);
    let ssr = residuals.dot(&residuals);

    Ok(OlsFit {
        coefficients,
        residuals,
        ssr,
    })
}

/// Single-index market model `asset = beta * market + alpha + e`.
///
/// Both slices are chronological and aligned observation by observation.
pub fn market_model(asset: &[f64], market: &[f64]) -> Result<OlsFit> {
    if asset.len() != market.len() {
        return Err(ScoreError::DimensionMismatch {
            expected: market.len(),
            actual: asset.len(),
        });
    }

    let n = market.len();
    let mut design = Array2::<f64>::ones((n, 2));
    design
        .index_axis_mut(Axis(1), 0)
        .assign(&Array1::from(market.to_vec()));

    ols(&design, &Array1::from(asset.to_vec()))
}

/// Solve the square system `a x = b` in place.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let scale = (0..n).map(|i| a[[i, i]].abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Err(ScoreError::SingularMatrix(
            "design matrix has no variation".to_string(),
        ));
    }
    let tolerance = SINGULAR_TOLERANCE * scale;

    // Forward elimination with partial pivoting
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot_row, col]].abs() <= tolerance {
            return Err(ScoreError::SingularMatrix(format!(
                "pivot {} below tolerance {:e}",
                col, tolerance
            )));
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_exact_line() {
        let market = [0.01, -0.02, 0.015, 0.003, -0.007, 0.012];
        let asset: Vec<f64> = market.iter().map(|m| 1.5 * m + 0.001).collect();

        let fit = market_model(&asset, &market).unwrap();
        assert_abs_diff_eq!(fit.slope(), 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.intercept(), 0.001, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.ssr, 0.0, epsilon = 1e-18);
    }

    #[test]
    fn test_residuals_sum_to_zero_with_intercept() {
        let market = [0.01, -0.02, 0.015, 0.003, -0.007, 0.012, 0.0, -0.004];
        let asset = [0.02, -0.01, 0.01, 0.0, -0.02, 0.03, 0.001, -0.002];

        let fit = market_model(&asset, &market).unwrap();
        assert_abs_diff_eq!(fit.residuals.sum(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.ssr, fit.residuals.dot(&fit.residuals), epsilon = 1e-15);
        assert!(fit.ssr > 0.0);
    }

    #[test]
    fn test_general_design() {
        // y = 2 a - 3 b + 1 with three columns
        let x = array![
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [2.0, 1.0, 1.0],
            [3.0, 5.0, 1.0],
        ];
        let y = x.dot(&array![2.0, -3.0, 1.0]);

        let fit = ols(&x, &y).unwrap();
        assert_abs_diff_eq!(fit.coefficients[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.coefficients[1], -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.intercept(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_market_is_singular() {
        let market = [0.01; 21];
        let asset = [0.02; 21];
        assert!(matches!(
            market_model(&asset, &market),
            Err(ScoreError::SingularMatrix(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            market_model(&[0.1, 0.2], &[0.1, 0.2, 0.3]),
            Err(ScoreError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_too_few_observations() {
        assert!(matches!(
            market_model(&[0.1, 0.2], &[0.3, 0.1]),
            Err(ScoreError::InsufficientData {
                required: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_non_finite_input() {
        let market = [0.01, f64::NAN, 0.02, 0.03];
        let asset = [0.01, 0.02, 0.03, 0.04];
        assert!(matches!(
            market_model(&asset, &market),
            Err(ScoreError::NonFinite(_))
        ));
    }
}
