//! Problem intermediate representation.
//!
//! The parser produces a `Problem` holding raw matrix rows, the right-hand
//! side, sample points, solver options and analysis commands. The compiler
//! validates it into a `LinearSystem` and `SampleSet`.

use crate::solver::Method;

/// Solver settings given by `.OPTIONS`; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverOptions {
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub svd_tolerance: Option<f64>,
    pub pivot_tolerance: Option<f64>,
}

/// An analysis command from the problem file.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Solve the linear system (.SOLVE). Empty means every method.
    Solve { methods: Vec<Method> },
    /// Report matrix properties (.PROPS)
    Properties,
    /// Interpolate the samples at one point (.INTERP)
    Interpolate { query: f64 },
    /// Natural cubic spline over the sample range (.SPLINE)
    Spline { points: usize },
    /// Least-squares polynomial over the sample range (.LSQ)
    LeastSquares { degree: usize, points: usize },
}

/// A parsed problem file.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    /// Matrix rows in file order.
    pub rows: Vec<Vec<f64>>,
    pub rhs: Option<Vec<f64>>,
    /// (x, y) sample points in file order.
    pub points: Vec<(f64, f64)>,
    pub options: SolverOptions,
    pub analyses: Vec<Analysis>,
}
