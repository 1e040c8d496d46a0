//! Linear system solvers.
//!
//! Four independent strategies solve the same system `Ax = b`: truncated-SVD
//! pseudo-inverse, Gaussian elimination with partial pivoting, Jacobi and
//! Gauss-Seidel. Each produces a [`SolveResult`] carrying the solution plus
//! timing, residual and convergence diagnostics, so the strategies can be
//! compared side by side. Numerical trouble (singular matrix, iteration cap)
//! is reported in the result rather than as an error.

pub mod gauss;
pub mod iterative;
pub mod svd;

use crate::error::{FlowfitError, Result};
use crate::matrix::{ensure_finite, norm2, DenseMatrix};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// A square linear system `Ax = b`.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    a: DenseMatrix,
    b: Vec<f64>,
}

impl LinearSystem {
    pub fn new(a: DenseMatrix, b: Vec<f64>) -> Result<Self> {
        if a.ncols != a.nrows || b.len() != a.nrows {
            return Err(FlowfitError::DimensionMismatch(format!(
                "matrix is {}x{}, rhs length is {}",
                a.nrows,
                a.ncols,
                b.len()
            )));
        }
        if a.nrows == 0 {
            return Err(FlowfitError::InsufficientData {
                required: 1,
                actual: 0,
                context: "linear system",
            });
        }
        ensure_finite(&a.values, "matrix")?;
        ensure_finite(&b, "rhs")?;
        Ok(Self { a, b })
    }

    pub fn a(&self) -> &DenseMatrix {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.b.len()
    }

    /// `||A x - b||_2`
    pub fn residual(&self, x: &[f64]) -> f64 {
        let ax = self.a.matvec(x);
        let r: Vec<f64> = ax.iter().zip(&self.b).map(|(l, r)| l - r).collect();
        norm2(&r)
    }
}

/// Solution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Svd,
    GaussElimination,
    Jacobi,
    GaussSeidel,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Svd,
        Method::GaussElimination,
        Method::Jacobi,
        Method::GaussSeidel,
    ];

    pub fn is_iterative(self) -> bool {
        matches!(self, Method::Jacobi | Method::GaussSeidel)
    }

    /// Run this strategy, timing only the strategy itself.
    pub fn solve(self, system: &LinearSystem, params: &SolverParams) -> Result<SolveResult> {
        let _span = tracing::info_span!("solve", method = %self, n = system.size()).entered();

        let start = Instant::now();
        let outcome = match self {
            Method::Svd => svd::solve(system, params)?,
            Method::GaussElimination => gauss::solve(system, params),
            Method::Jacobi => iterative::jacobi(system, params),
            Method::GaussSeidel => iterative::gauss_seidel(system, params),
        };
        let duration = start.elapsed();

        let residual = system.residual(&outcome.solution);
        if outcome.diagnostics.is_singular() {
            tracing::warn!(
                skipped_pivots = ?outcome.diagnostics.skipped_pivots,
                truncated = outcome.diagnostics.truncated_singular_values,
                residual,
                "system is singular or near-singular"
            );
        }
        tracing::debug!(residual, elapsed = ?duration, "solve finished");

        Ok(SolveResult {
            method: self,
            solution: outcome.solution,
            duration,
            residual,
            history: outcome.history,
            converged: outcome.converged,
            diagnostics: outcome.diagnostics,
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Svd => "SVD",
            Method::GaussElimination => "Gauss",
            Method::Jacobi => "Jacobi",
            Method::GaussSeidel => "Gauss-Seidel",
        };
        f.write_str(name)
    }
}

/// Tolerances and limits shared by all strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParams {
    /// Iterative methods stop once the relative change drops below this.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Singular values at or below this are treated as zero.
    pub svd_tolerance: f64,
    /// Elimination pivots below this (in magnitude) are treated as zero.
    pub pivot_tolerance: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
            svd_tolerance: 1e-10,
            pivot_tolerance: 1e-10,
        }
    }
}

/// Degeneracies detected while solving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Rows whose elimination pivot was numerically zero; their unknowns stay 0.
    pub skipped_pivots: Vec<usize>,
    /// Number of singular values zeroed by the SVD cutoff.
    pub truncated_singular_values: usize,
    /// An iterate contained NaN or Inf (zero diagonal or divergence).
    pub non_finite: bool,
}

impl Diagnostics {
    pub fn is_singular(&self) -> bool {
        !self.skipped_pivots.is_empty() || self.truncated_singular_values > 0
    }
}

/// Raw output of a strategy, before timing and residual are attached.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub solution: Vec<f64>,
    pub history: Option<Vec<f64>>,
    pub converged: bool,
    pub diagnostics: Diagnostics,
}

/// Solution and diagnostics for one strategy.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub method: Method,
    pub solution: Vec<f64>,
    pub duration: Duration,
    /// `||A x - b||_2`, recomputed for every method.
    pub residual: f64,
    /// Relative change per iteration; `None` for direct methods.
    pub history: Option<Vec<f64>>,
    pub converged: bool,
    pub diagnostics: Diagnostics,
}

impl SolveResult {
    /// Iterations performed by an iterative method.
    pub fn iterations(&self) -> Option<usize> {
        self.history.as_ref().map(|h| h.len())
    }
}

/// Solve `system` with every strategy.
pub fn solve_all(
    system: &LinearSystem,
    params: &SolverParams,
) -> Result<BTreeMap<Method, SolveResult>> {
    solve_with(system, params, &Method::ALL)
}

/// Solve `system` with the given strategies.
pub fn solve_with(
    system: &LinearSystem,
    params: &SolverParams,
    methods: &[Method],
) -> Result<BTreeMap<Method, SolveResult>> {
    let mut results = BTreeMap::new();
    for &method in methods {
        results.insert(method, method.solve(system, params)?);
    }
    Ok(results)
}
