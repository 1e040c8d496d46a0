//! Problem compiler.
//!
//! Validates a parsed [`Problem`] into the objects the analyses run on:
//!
//! - matrix rows and the right-hand side become a [`LinearSystem`] when both
//!   are present,
//! - sample points become a [`SampleSet`] when any are given,
//! - `.OPTIONS` values are laid over [`SolverParams::default`].
//!
//! Every analysis command is checked against what it needs, so a problem
//! that asks for `.SOLVE` without a matrix fails here rather than halfway
//! through the run.

use crate::error::{FlowfitError, Result};
use crate::ir::{Analysis, Problem, SolverOptions};
use crate::matrix::{ensure_finite, DenseMatrix};
use crate::samples::SampleSet;
use crate::solver::{LinearSystem, SolverParams};

/// The compiled problem, ready for analysis.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Coefficient matrix, present whenever A rows are given.
    pub matrix: Option<DenseMatrix>,
    /// Present when both A rows and a B line are given.
    pub system: Option<LinearSystem>,
    pub samples: Option<SampleSet>,
    pub params: SolverParams,
}

/// Compile a Problem into a Workload.
pub fn compile(problem: &Problem) -> Result<Workload> {
    let params = apply_options(&problem.options)?;

    let matrix = if problem.rows.is_empty() {
        None
    } else {
        let a = DenseMatrix::from_rows(&problem.rows)?;
        ensure_finite(&a.values, "matrix")?;
        Some(a)
    };

    let system = match (&matrix, &problem.rhs) {
        (Some(a), Some(rhs)) => Some(LinearSystem::new(a.clone(), rhs.clone())?),
        (None, Some(_)) => {
            return Err(FlowfitError::Compile(
                "right-hand side given without matrix rows".into(),
            ))
        }
        _ => None,
    };

    let samples = if problem.points.is_empty() {
        None
    } else {
        Some(SampleSet::from_points(&problem.points)?)
    };

    for analysis in &problem.analyses {
        match analysis {
            Analysis::Solve { .. } if system.is_none() => {
                return Err(FlowfitError::Compile(".SOLVE requires A rows and a B line".into()))
            }
            Analysis::Properties if matrix.is_none() => {
                return Err(FlowfitError::Compile(".PROPS requires A rows".into()))
            }
            Analysis::Interpolate { .. } | Analysis::Spline { .. } | Analysis::LeastSquares { .. }
                if samples.is_none() =>
            {
                return Err(FlowfitError::Compile(format!(
                    "{} requires P sample points",
                    command_name(analysis)
                )))
            }
            Analysis::Spline { points } | Analysis::LeastSquares { points, .. } if *points == 0 => {
                return Err(FlowfitError::Compile(format!(
                    "{} needs at least one grid point",
                    command_name(analysis)
                )))
            }
            _ => {}
        }
    }

    tracing::debug!(
        unknowns = system.as_ref().map(LinearSystem::size),
        samples = samples.as_ref().map(SampleSet::len),
        analyses = problem.analyses.len(),
        "problem compiled"
    );

    Ok(Workload {
        matrix,
        system,
        samples,
        params,
    })
}

fn command_name(analysis: &Analysis) -> &'static str {
    match analysis {
        Analysis::Solve { .. } => ".SOLVE",
        Analysis::Properties => ".PROPS",
        Analysis::Interpolate { .. } => ".INTERP",
        Analysis::Spline { .. } => ".SPLINE",
        Analysis::LeastSquares { .. } => ".LSQ",
    }
}

/// Lay `.OPTIONS` over the default solver parameters.
pub fn apply_options(options: &SolverOptions) -> Result<SolverParams> {
    let mut params = SolverParams::default();
    if let Some(tol) = options.tolerance {
        params.tolerance = check_tolerance("TOL", tol)?;
    }
    if let Some(tol) = options.svd_tolerance {
        params.svd_tolerance = check_tolerance("SVDTOL", tol)?;
    }
    if let Some(tol) = options.pivot_tolerance {
        params.pivot_tolerance = check_tolerance("PIVTOL", tol)?;
    }
    if let Some(n) = options.max_iterations {
        params.max_iterations = n;
    }
    Ok(params)
}

fn check_tolerance(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FlowfitError::Compile(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Method;

    fn network() -> Problem {
        Problem {
            rows: vec![
                vec![1.0, -1.0, 0.0, 0.0],
                vec![-1.0, 2.0, -1.0, 0.0],
                vec![0.0, -1.0, 2.0, -1.0],
                vec![0.0, 0.0, -1.0, 1.0],
            ],
            rhs: Some(vec![10.0, 5.0, -3.0, -12.0]),
            analyses: vec![Analysis::Solve { methods: vec![] }],
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_system() {
        let w = compile(&network()).unwrap();
        let system = w.system.unwrap();
        assert_eq!(system.size(), 4);
        assert_eq!(system.a().get(1, 1), 2.0);
        assert_eq!(system.b(), &[10.0, 5.0, -3.0, -12.0]);
        assert!(w.samples.is_none());
        assert_eq!(w.params, SolverParams::default());
    }

    #[test]
    fn test_options_override_defaults() {
        let mut p = network();
        p.options.tolerance = Some(1e-6);
        p.options.max_iterations = Some(50);
        let w = compile(&p).unwrap();
        assert_eq!(w.params.tolerance, 1e-6);
        assert_eq!(w.params.max_iterations, 50);
        assert_eq!(w.params.svd_tolerance, 1e-10);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut p = network();
        p.options.pivot_tolerance = Some(-1.0);
        let err = compile(&p).unwrap_err().to_string();
        assert!(err.contains("PIVTOL"), "got: {err}");
    }

    #[test]
    fn test_rhs_length_mismatch() {
        let mut p = network();
        p.rhs = Some(vec![1.0, 2.0]);
        assert!(matches!(
            compile(&p),
            Err(FlowfitError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let mut p = network();
        p.rows[2].pop();
        assert!(matches!(
            compile(&p),
            Err(FlowfitError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_missing_rhs() {
        let mut p = network();
        p.rhs = None;
        assert!(matches!(compile(&p), Err(FlowfitError::Compile(_))));

        // Properties only need the matrix
        p.analyses = vec![Analysis::Properties];
        let w = compile(&p).unwrap();
        assert!(w.system.is_none());
        assert_eq!(w.matrix.unwrap().nrows, 4);
    }

    #[test]
    fn test_nan_matrix_rejected_without_rhs() {
        let p = Problem {
            rows: vec![vec![1.0, f64::NAN], vec![1.0, 2.0]],
            analyses: vec![Analysis::Properties],
            ..Default::default()
        };
        assert!(matches!(
            compile(&p),
            Err(FlowfitError::NonFinite {
                index: 1,
                context: "matrix"
            })
        ));
    }

    #[test]
    fn test_rhs_without_rows() {
        let p = Problem {
            rhs: Some(vec![1.0]),
            ..Default::default()
        };
        assert!(matches!(compile(&p), Err(FlowfitError::Compile(_))));
    }

    #[test]
    fn test_solve_without_system() {
        let p = Problem {
            analyses: vec![Analysis::Solve {
                methods: vec![Method::Svd],
            }],
            ..Default::default()
        };
        let err = compile(&p).unwrap_err().to_string();
        assert!(err.contains(".SOLVE"), "got: {err}");
    }

    #[test]
    fn test_samples() {
        let p = Problem {
            points: vec![(2.0, 80.0), (3.0, 78.0), (4.0, 82.0)],
            analyses: vec![Analysis::Interpolate { query: 2.5 }],
            ..Default::default()
        };
        let w = compile(&p).unwrap();
        assert!(w.system.is_none());
        assert_eq!(w.samples.unwrap().x(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_duplicate_sample_node() {
        let p = Problem {
            points: vec![(2.0, 80.0), (2.0, 78.0), (4.0, 82.0)],
            ..Default::default()
        };
        assert!(matches!(
            compile(&p),
            Err(FlowfitError::DuplicateNode { index: 1, .. })
        ));
    }

    #[test]
    fn test_fit_without_samples() {
        let p = Problem {
            analyses: vec![Analysis::Spline { points: 10 }],
            ..Default::default()
        };
        let err = compile(&p).unwrap_err().to_string();
        assert!(err.contains(".SPLINE"), "got: {err}");
    }

    #[test]
    fn test_zero_grid_points() {
        let p = Problem {
            points: vec![(1.0, 1.0), (2.0, 2.0), (3.0, 1.0)],
            analyses: vec![Analysis::LeastSquares {
                degree: 1,
                points: 0,
            }],
            ..Default::default()
        };
        assert!(matches!(compile(&p), Err(FlowfitError::Compile(_))));
    }
}
