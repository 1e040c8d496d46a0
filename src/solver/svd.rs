//! Truncated-SVD pseudo-inverse solver.
//!
//! Factors `A = U Σ Vᵗ` with faer and applies `x = V Σ⁺ Uᵗ b`, where `Σ⁺`
//! inverts only singular values above a cutoff. For rank-deficient `A` this
//! gives the minimum-norm least-squares solution. The same kernel backs the
//! least-squares polynomial fit and the matrix property report.

use crate::error::{FlowfitError, Result};
use crate::matrix::DenseMatrix;

use super::{Diagnostics, LinearSystem, Outcome, SolverParams};

/// Thin SVD factors: `u` is m×k, `s` has k entries, `v` is n×k, k = min(m, n).
#[derive(Debug, Clone)]
pub struct SvdFactors {
    pub u: DenseMatrix,
    pub s: Vec<f64>,
    pub v: DenseMatrix,
}

/// Compute the thin SVD of `a`.
pub fn thin_svd(a: &DenseMatrix) -> Result<SvdFactors> {
    let m = a.to_faer();
    let svd = m
        .as_ref()
        .thin_svd()
        .map_err(|e| FlowfitError::Numerical(format!("SVD failed: {e:?}")))?;

    let u = svd.U();
    let v = svd.V();
    let s = svd.S().column_vector();
    let k = s.nrows();

    Ok(SvdFactors {
        u: DenseMatrix::from_fn(a.nrows, k, |i, j| u[(i, j)]),
        s: (0..k).map(|i| s[i]).collect(),
        v: DenseMatrix::from_fn(a.ncols, k, |i, j| v[(i, j)]),
    })
}

/// Apply the truncated pseudo-inverse to `b`.
///
/// Singular values `<= cutoff` are zeroed. Returns the solution and the
/// number of truncated values.
pub fn pseudo_inverse_apply(factors: &SvdFactors, b: &[f64], cutoff: f64) -> (Vec<f64>, usize) {
    let n = factors.v.nrows;
    let mut x = vec![0.0; n];
    let mut truncated = 0;

    for (k, &sigma) in factors.s.iter().enumerate() {
        if sigma.abs() <= cutoff {
            truncated += 1;
            continue;
        }
        // (u_k . b) / sigma_k
        let mut coeff = 0.0;
        for (i, &bi) in b.iter().enumerate() {
            coeff += factors.u.get(i, k) * bi;
        }
        coeff /= sigma;
        for (i, xi) in x.iter_mut().enumerate() {
            *xi += coeff * factors.v.get(i, k);
        }
    }

    (x, truncated)
}

/// Solve `system` through the truncated pseudo-inverse.
pub fn solve(system: &LinearSystem, params: &SolverParams) -> Result<Outcome> {
    let factors = thin_svd(system.a())?;
    let (solution, truncated) = pseudo_inverse_apply(&factors, system.b(), params.svd_tolerance);
    if truncated > 0 {
        tracing::debug!(truncated, "zeroed small singular values");
    }

    Ok(Outcome {
        solution,
        history: None,
        converged: true,
        diagnostics: Diagnostics {
            truncated_singular_values: truncated,
            ..Diagnostics::default()
        },
    })
}
