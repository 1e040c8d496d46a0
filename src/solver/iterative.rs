//! Stationary iterative solvers: Jacobi and Gauss-Seidel.
//!
//! Both start from the zero vector and stop when the relative change
//! `||x_new - x_old|| / ||x_new||` drops below `params.tolerance`, or after
//! `params.max_iterations` sweeps. Every sweep appends its relative change to
//! the history. Hitting the cap is not an error: the last iterate is returned
//! with `converged = false`.

use crate::matrix::norm2;

use super::{Diagnostics, LinearSystem, Outcome, SolverParams};

/// Solve with Jacobi iteration: `x_new = (b - R x_old) / D`.
pub fn jacobi(system: &LinearSystem, params: &SolverParams) -> Outcome {
    let a = system.a();
    let b = system.b();
    let d = a.diagonal();
    iterate("Jacobi", system.size(), params, |x_old, x| {
        for (j, xj) in x.iter_mut().enumerate() {
            let row = a.row(j);
            let mut sum = b[j];
            for (k, &ajk) in row.iter().enumerate() {
                if k != j {
                    sum -= ajk * x_old[k];
                }
            }
            *xj = sum / d[j];
        }
    })
}

/// Solve with Gauss-Seidel iteration.
///
/// Components are updated in order within a sweep, so `x_j` already sees the
/// new values of `x_0 .. x_{j-1}`.
pub fn gauss_seidel(system: &LinearSystem, params: &SolverParams) -> Outcome {
    let a = system.a();
    let b = system.b();
    let d = a.diagonal();
    iterate("Gauss-Seidel", system.size(), params, |x_old, x| {
        for j in 0..x.len() {
            let row = a.row(j);
            let mut sum = b[j];
            for k in 0..j {
                sum -= row[k] * x[k];
            }
            for k in (j + 1)..x.len() {
                sum -= row[k] * x_old[k];
            }
            x[j] = sum / d[j];
        }
    })
}

/// Shared driver: runs `sweep(x_old, x)` until convergence or the cap.
fn iterate(
    name: &'static str,
    n: usize,
    params: &SolverParams,
    mut sweep: impl FnMut(&[f64], &mut [f64]),
) -> Outcome {
    let mut x = vec![0.0; n];
    let mut history = Vec::new();

    for iter in 0..params.max_iterations {
        let x_old = x.clone();
        sweep(&x_old, &mut x);

        let diff: Vec<f64> = x.iter().zip(&x_old).map(|(new, old)| new - old).collect();
        let change = norm2(&diff);
        // A sweep that changes nothing is a fixed point, even at x = 0.
        let error = if change == 0.0 { 0.0 } else { change / norm2(&x) };
        history.push(error);
        tracing::trace!(iter, error, "{name} sweep");

        if !error.is_finite() {
            tracing::warn!(iterations = iter + 1, "{name} produced a non-finite iterate");
            return Outcome {
                solution: x,
                history: Some(history),
                converged: false,
                diagnostics: Diagnostics {
                    non_finite: true,
                    ..Diagnostics::default()
                },
            };
        }

        if error < params.tolerance {
            tracing::info!(iterations = iter + 1, "{name} converged");
            return Outcome {
                solution: x,
                history: Some(history),
                converged: true,
                diagnostics: Diagnostics::default(),
            };
        }
    }

    tracing::warn!(
        max_iterations = params.max_iterations,
        last_error = history.last().copied().unwrap_or(f64::NAN),
        "{name} did not converge"
    );
    Outcome {
        solution: x,
        history: Some(history),
        converged: false,
        diagnostics: Diagnostics::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;
    use approx::assert_abs_diff_eq;

    fn dominant_system() -> LinearSystem {
        let a = DenseMatrix::from_rows(&[
            vec![4.0, -1.0, 0.0, 0.0],
            vec![-1.0, 4.0, -1.0, 0.0],
            vec![0.0, -1.0, 4.0, -1.0],
            vec![0.0, 0.0, -1.0, 3.0],
        ])
        .unwrap();
        LinearSystem::new(a, vec![15.0, 10.0, 10.0, 10.0]).unwrap()
    }

    fn conservation_system() -> LinearSystem {
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
    fn jacobi_converges_on_dominant_system() {
        let sys = dominant_system();
        let out = jacobi(&sys, &SolverParams::default());
        assert!(out.converged);
        for &xi in &out.solution {
            assert_abs_diff_eq!(xi, 5.0, epsilon = 1e-8);
        }
        let history = out.history.unwrap();
        assert_abs_diff_eq!(history[0], 1.0, epsilon = 1e-12);
        assert!(*history.last().unwrap() < 1e-10);
    }

    #[test]
    fn gauss_seidel_needs_no_more_sweeps_than_jacobi() {
        let sys = dominant_system();
        let params = SolverParams::default();
        let j = jacobi(&sys, &params).history.unwrap();
        let gs = gauss_seidel(&sys, &params).history.unwrap();
        assert!(gs.len() <= j.len(), "GS {} vs Jacobi {}", gs.len(), j.len());
    }

    #[test]
    fn histories_decrease_on_dominant_system() {
        let sys = dominant_system();
        let params = SolverParams::default();
        for history in [
            jacobi(&sys, &params).history.unwrap(),
            gauss_seidel(&sys, &params).history.unwrap(),
        ] {
            for w in history.windows(2) {
                assert!(w[1] < w[0], "history not decreasing: {history:?}");
            }
        }
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let sys = dominant_system();
        let params = SolverParams {
            max_iterations: 3,
            ..SolverParams::default()
        };
        for out in [jacobi(&sys, &params), gauss_seidel(&sys, &params)] {
            assert!(!out.converged);
            assert_eq!(out.history.unwrap().len(), 3);
            assert!(out.solution.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn zero_cap_returns_initial_guess() {
        let sys = dominant_system();
        let params = SolverParams {
            max_iterations: 0,
            ..SolverParams::default()
        };
        let out = jacobi(&sys, &params);
        assert!(!out.converged);
        assert!(out.history.unwrap().is_empty());
        assert_eq!(out.solution, vec![0.0; 4]);
    }

    #[test]
    fn zero_rhs_is_an_immediate_fixed_point() {
        let a = DenseMatrix::identity(3);
        let sys = LinearSystem::new(a, vec![0.0; 3]).unwrap();
        let out = gauss_seidel(&sys, &SolverParams::default());
        assert!(out.converged);
        assert_eq!(out.history.unwrap(), vec![0.0]);
    }

    #[test]
    fn zero_diagonal_is_flagged_non_finite() {
        let a = DenseMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let sys = LinearSystem::new(a, vec![1.0, 1.0]).unwrap();
        let out = jacobi(&sys, &SolverParams::default());
        assert!(!out.converged);
        assert!(out.diagnostics.non_finite);
        assert_eq!(out.history.unwrap().len(), 1);
    }

    #[test]
    fn gauss_seidel_solves_conservation_network() {
        let sys = conservation_system();
        let out = gauss_seidel(&sys, &SolverParams::default());
        assert!(out.converged);
        assert!(sys.residual(&out.solution) < 1e-6);
    }

    #[test]
    fn jacobi_oscillates_on_conservation_network() {
        // The path-graph Laplacian gives a Jacobi iteration matrix with eigenvalue -1.
        let sys = conservation_system();
        let params = SolverParams::default();
        let out = jacobi(&sys, &params);
        assert!(!out.converged);
        assert_eq!(out.history.unwrap().len(), params.max_iterations);
        assert!(out.solution.iter().all(|v| v.is_finite()));
    }
}
