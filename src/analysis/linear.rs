//! Linear-system analyses: side-by-side solves and matrix properties.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::Result;
use crate::matrix::{self, DenseMatrix, MatrixProperties};
use crate::solver::{LinearSystem, Method, SolveResult, SolverParams};
use crate::stats::Stats;

/// Solve `system` with each of `methods`.
///
/// Singular systems and non-convergence are carried in the results; only
/// kernel failures (a faer SVD error) abort the analysis.
pub fn solve(
    system: &LinearSystem,
    params: &SolverParams,
    methods: &[Method],
    mut stats: Option<&mut Stats>,
) -> Result<BTreeMap<Method, SolveResult>> {
    let _span = tracing::info_span!("solve_analysis", n = system.size(), methods = methods.len())
        .entered();

    let results = crate::solver::solve_with(system, params, methods)?;

    if let Some(ref mut s) = stats {
        s.linear_solves += results.len() as u32;
        s.linear_solve += results.values().map(|r| r.duration).sum::<Duration>();
        for r in results.values() {
            s.iterations += r.iterations().unwrap_or(0) as u32;
            if !r.converged {
                s.non_converged += 1;
            }
        }
    }

    for r in results.values() {
        tracing::info!(
            method = %r.method,
            residual = r.residual,
            converged = r.converged,
            iterations = r.iterations(),
            "solution"
        );
    }

    Ok(results)
}

/// Condition number, determinant and rank of `a`.
pub fn properties(a: &DenseMatrix) -> Result<MatrixProperties> {
    let _span = tracing::info_span!("properties_analysis", rows = a.nrows, cols = a.ncols).entered();
    let props = matrix::properties(a)?;
    if !a.is_diagonally_dominant() {
        tracing::info!("matrix is not diagonally dominant, iterative methods may not converge");
    }
    Ok(props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn network() -> LinearSystem {
        let a = DenseMatrix::from_rows(&[
            vec![1.0, -1.0, 0.0, 0.0],
            vec![-1.0, 2.0, -1.0, 0.0],
            vec![0.0, -1.0, 2.0, -1.0],
            vec![0.0, 0.0, -1.0, 1.0],
        ])
        .unwrap();
        LinearSystem::new(a, vec![10.0, 5.0, -3.0, -12.0]).unwrap()
    }

    #[test]
    fn test_network_solve_counts() {
        let mut stats = Stats::new();
        let results = solve(
            &network(),
            &SolverParams::default(),
            &Method::ALL,
            Some(&mut stats),
        )
        .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(stats.linear_solves, 4);
        // Jacobi oscillates on the singular network
        assert_eq!(stats.non_converged, 2);
        assert!(!results[&Method::Jacobi].converged);
        assert!(!results[&Method::GaussElimination].converged);
        assert!(results[&Method::GaussSeidel].converged);
    }

    #[test]
    fn test_network_properties() {
        let props = properties(network().a()).unwrap();
        assert_eq!(props.rank, 3);
        assert_abs_diff_eq!(props.determinant, 0.0, epsilon = 1e-12);
        assert!(props.condition_number > 1e12);
    }
}
