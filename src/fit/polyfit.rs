//! Least-squares polynomial fitting.
//!
//! Solves the Vandermonde system `V c ≈ y` in the least-squares sense with the
//! truncated-SVD pseudo-inverse. Columns are scaled to unit norm first to keep
//! the factorisation well conditioned.
//!
//! A degree of `n - 1` or more for `n` samples is accepted: with `degree == n - 1`
//! the fit is the interpolating polynomial, and above that the minimum-norm
//! (scaled) coefficient vector among all exact interpolants is returned.

use crate::error::Result;
use crate::matrix::DenseMatrix;
use crate::samples::SampleSet;
use crate::solver::svd;

/// Polynomial with coefficients stored lowest power first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Fit a polynomial of `degree` minimising the sum of squared residuals.
    pub fn least_squares(samples: &SampleSet, degree: usize) -> Result<Self> {
        samples.require(1, "least-squares fit")?;
        let x = samples.x();
        let m = x.len();
        let k = degree + 1;
        if k > m {
            tracing::debug!(degree, samples = m, "underdetermined fit, using minimum-norm solution");
        }

        let mut vander = DenseMatrix::from_fn(m, k, |i, j| x[i].powi(j as i32));
        let mut scale = vec![0.0; k];
        for (j, s) in scale.iter_mut().enumerate() {
            let norm = (0..m).map(|i| vander.get(i, j).powi(2)).sum::<f64>().sqrt();
            *s = if norm == 0.0 { 1.0 } else { norm };
            for i in 0..m {
                vander.set(i, j, vander.get(i, j) / *s);
            }
        }

        let factors = svd::thin_svd(&vander)?;
        let s_max = factors.s.iter().cloned().fold(0.0_f64, f64::max);
        let cutoff = s_max * m as f64 * f64::EPSILON;
        let (scaled, truncated) = svd::pseudo_inverse_apply(&factors, samples.y(), cutoff);
        if truncated > 0 {
            tracing::debug!(truncated, "rank-deficient Vandermonde matrix");
        }

        let coefficients = scaled.iter().zip(&scale).map(|(c, s)| c / s).collect();
        Ok(Self { coefficients })
    }

    /// Coefficients, constant term first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Sum of squared residuals over `samples`.
    pub fn sum_squared_residuals(&self, samples: &SampleSet) -> f64 {
        samples
            .x()
            .iter()
            .zip(samples.y())
            .map(|(&x, &y)| (self.evaluate(x) - y).powi(2))
            .sum()
    }
}
