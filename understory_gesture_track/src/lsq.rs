// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted polynomial least-squares fitting.
//!
//! The fit uses a Gram–Schmidt QR decomposition of the weighted Vandermonde
//! matrix, then back-substitutes against `R`. It is tuned for the small
//! systems velocity estimation produces (a handful of samples, degree ≤ 2).

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Column norms below this are treated as a rank-deficient system.
pub const PRECISION_TOLERANCE: f64 = 1e-10;

/// Result of a polynomial fit: `y ≈ Σ coefficients[i] · xⁱ`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialFit {
    /// Coefficients in ascending power order.
    pub coefficients: Vec<f64>,
    /// Coefficient of determination in `[0, 1]`; `1` for a perfect fit.
    pub confidence: f64,
}

impl PolynomialFit {
    /// Evaluate the fitted polynomial at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

/// Fit a polynomial of `degree` to samples `(x[i], y[i])` with weights `w[i]`.
///
/// Returns `None` when there are fewer samples than coefficients, when the
/// input slices disagree in length, or when the system is rank-deficient
/// (for example, every sample shares the same `x`).
pub fn solve(x: &[f64], y: &[f64], w: &[f64], degree: usize) -> Option<PolynomialFit> {
    let m = x.len();
    let n = degree + 1;
    if y.len() != m || w.len() != m || n > m {
        return None;
    }

    // Weighted Vandermonde matrix, stored column-major: a[i][h] = w[h] * x[h]^i.
    let mut a = vec![vec![0.0; m]; n];
    for h in 0..m {
        a[0][h] = w[h];
        for i in 1..n {
            a[i][h] = a[i - 1][h] * x[h];
        }
    }

    let mut q = vec![vec![0.0; m]; n];
    let mut r = vec![vec![0.0; n]; n];
    for j in 0..n {
        q[j].copy_from_slice(&a[j]);
        for i in 0..j {
            let d = dot(&q[j], &q[i]);
            for h in 0..m {
                q[j][h] -= d * q[i][h];
            }
        }
        let norm = dot(&q[j], &q[j]).sqrt();
        if norm < PRECISION_TOLERANCE {
            return None;
        }
        let inv = 1.0 / norm;
        for v in &mut q[j] {
            *v *= inv;
        }
        for i in j..n {
            r[j][i] = dot(&q[j], &a[i]);
        }
    }

    let wy: Vec<f64> = y.iter().zip(w).map(|(y, w)| y * w).collect();
    let mut coefficients = vec![0.0; n];
    for i in (0..n).rev() {
        let mut c = dot(&q[i], &wy);
        for j in (i + 1)..n {
            c -= r[i][j] * coefficients[j];
        }
        coefficients[i] = c / r[i][i];
    }

    let y_mean = y.iter().sum::<f64>() / m as f64;
    let mut fit = PolynomialFit {
        coefficients,
        confidence: 1.0,
    };
    let mut sse = 0.0;
    let mut sst = 0.0;
    for h in 0..m {
        let err = y[h] - fit.eval(x[h]);
        let var = y[h] - y_mean;
        sse += w[h] * w[h] * err * err;
        sst += w[h] * w[h] * var * var;
    }
    if sst > PRECISION_TOLERANCE {
        fit.confidence = (1.0 - sse / sst).clamp(0.0, 1.0);
    }
    Some(fit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn fits_a_line_exactly() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let w = [1.0; 4];
        let fit = solve(&x, &y, &w, 1).unwrap();
        assert!(close(fit.coefficients[0], 1.0), "{fit:?}");
        assert!(close(fit.coefficients[1], 2.0), "{fit:?}");
        assert!(close(fit.confidence, 1.0), "{fit:?}");
    }

    #[test]
    fn fits_a_parabola_through_three_points() {
        let x = [-2.0, -1.0, 0.0];
        let y: Vec<f64> = x.iter().map(|x| 0.5 * x * x - 3.0 * x + 2.0).collect();
        let fit = solve(&x, &y, &[1.0; 3], 2).unwrap();
        assert!(close(fit.coefficients[0], 2.0), "{fit:?}");
        assert!(close(fit.coefficients[1], -3.0), "{fit:?}");
        assert!(close(fit.coefficients[2], 0.5), "{fit:?}");
        assert!(close(fit.eval(1.0), -0.5), "{fit:?}");
    }

    #[test]
    fn rejects_underdetermined_systems() {
        assert!(solve(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 1.0], 2).is_none());
        assert!(solve(&[], &[], &[], 0).is_none());
    }

    #[test]
    fn rejects_degenerate_abscissae() {
        // All samples at the same time: the linear column vanishes after projection.
        let x = [5.0, 5.0, 5.0];
        assert!(solve(&x, &[1.0, 2.0, 3.0], &[1.0; 3], 1).is_none());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(solve(&[0.0, 1.0], &[0.0], &[1.0, 1.0], 0).is_none());
    }
}
