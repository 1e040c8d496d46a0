//! Gaussian elimination with partial pivoting.
//!
//! Works on a copy of the augmented matrix `[A | b]`. Singular systems do not
//! fail: a numerically zero pivot leaves its unknown at 0 and the row index
//! is reported in the diagnostics.

use super::{Diagnostics, LinearSystem, Outcome, SolverParams};

/// Solve `system` by elimination and back substitution.
pub fn solve(system: &LinearSystem, params: &SolverParams) -> Outcome {
    let n = system.size();
    let a = system.a();
    let b = system.b();

    // Build augmented matrix [A | b]
    let mut aug: Vec<Vec<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Vec::with_capacity(n + 1);
        row.extend_from_slice(a.row(i));
        row.push(b[i]);
        aug.push(row);
    }

    // Forward elimination with partial pivoting
    for k in 0..n {
        let mut max_val = aug[k][k].abs();
        let mut max_row = k;
        for i in (k + 1)..n {
            let v = aug[i][k].abs();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }

        if max_row != k {
            aug.swap(k, max_row);
        }

        let pivot = aug[k][k];
        if pivot == 0.0 {
            continue;
        }
        for i in (k + 1)..n {
            let factor = aug[i][k] / pivot;
            aug[i][k] = 0.0;
            for j in (k + 1)..=n {
                aug[i][j] -= factor * aug[k][j];
            }
        }
    }

    // Back substitution, skipping degenerate rows
    let mut x = vec![0.0; n];
    let mut skipped = Vec::new();
    for i in (0..n).rev() {
        if aug[i][i].abs() < params.pivot_tolerance {
            skipped.push(i);
            continue;
        }
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }
    skipped.reverse();

    Outcome {
        solution: x,
        history: None,
        converged: skipped.is_empty(),
        diagnostics: Diagnostics {
            skipped_pivots: skipped,
            ..Diagnostics::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;
    use approx::assert_abs_diff_eq;

    fn system(rows: &[Vec<f64>], b: &[f64]) -> LinearSystem {
        LinearSystem::new(DenseMatrix::from_rows(rows).unwrap(), b.to_vec()).unwrap()
    }

    #[test]
    fn identity_2x2() {
        let sys = LinearSystem::new(DenseMatrix::identity(2), vec![3.0, 7.0]).unwrap();
        let out = solve(&sys, &SolverParams::default());
        assert_abs_diff_eq!(out.solution[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.solution[1], 7.0, epsilon = 1e-12);
        assert!(out.converged);
    }

    #[test]
    fn known_2x2() {
        // det = 14 - 5 = 9
        // x1 = (77 - 13)/9 = 64/9, x2 = (26 - 55)/9 = -29/9
        let sys = system(&[vec![2.0, 1.0], vec![5.0, 7.0]], &[11.0, 13.0]);
        let out = solve(&sys, &SolverParams::default());
        assert_abs_diff_eq!(out.solution[0], 64.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.solution[1], -29.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn needs_pivoting_3x3() {
        // Row 0 has zero in pivot position. Solution: x = [1, 2, 1]
        let sys = system(
            &[
                vec![0.0, 2.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![2.0, 1.0, 0.0],
            ],
            &[5.0, 4.0, 4.0],
        );
        let out = solve(&sys, &SolverParams::default());
        assert_abs_diff_eq!(out.solution[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.solution[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.solution[2], 1.0, epsilon = 1e-12);
        assert!(out.diagnostics.skipped_pivots.is_empty());
    }

    #[test]
    fn singular_matrix_reports_skipped_row() {
        // Row 2 = 2 * row 1
        let sys = system(&[vec![1.0, 2.0], vec![2.0, 4.0]], &[3.0, 6.0]);
        let out = solve(&sys, &SolverParams::default());
        assert_eq!(out.diagnostics.skipped_pivots, vec![1]);
        assert!(!out.converged);
        assert!(out.solution.iter().all(|v| v.is_finite()));
        // Pivoting puts [2, 4 | 6] first; x1 is left at 0 so x0 = 3.
        assert_abs_diff_eq!(out.solution[1], 0.0);
        assert_abs_diff_eq!(out.solution[0], 3.0, epsilon = 1e-12);
        assert!(sys.residual(&out.solution) < 1e-12);
    }

    #[test]
    fn conservation_network_is_consistent() {
        let sys = system(
            &[
                vec![1.0, -1.0, 0.0, 0.0],
                vec![-1.0, 2.0, -1.0, 0.0],
                vec![0.0, -1.0, 2.0, -1.0],
                vec![0.0, 0.0, -1.0, 1.0],
            ],
            &[10.0, 5.0, -3.0, -12.0],
        );
        let out = solve(&sys, &SolverParams::default());
        assert_eq!(out.diagnostics.skipped_pivots, vec![3]);
        assert!(sys.residual(&out.solution) < 1e-6);
    }

    #[test]
    fn verifies_with_matvec() {
        let sys = system(
            &[
                vec![4.0, -1.0, 0.0],
                vec![-1.0, 4.0, -1.0],
                vec![0.0, -1.0, 4.0],
            ],
            &[1.0, 5.0, 10.0],
        );
        let out = solve(&sys, &SolverParams::default());
        let ax = sys.a().matvec(&out.solution);
        for i in 0..3 {
            assert_abs_diff_eq!(ax[i], sys.b()[i], epsilon = 1e-10);
        }
    }
}
