//! Curve fitting for visualisation.
//!
//! Fits are continuous functions sampled over a caller-supplied grid; they
//! have no single scalar answer.

pub mod polyfit;
pub mod spline;

pub use polyfit::Polynomial;
pub use spline::CubicSpline;

use crate::error::{FlowfitError, Result};
use crate::samples::SampleSet;
use std::fmt;

/// Which curve to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitKind {
    /// Natural cubic spline through every sample.
    CubicSpline,
    /// Least-squares polynomial of the given degree.
    LeastSquares { degree: usize },
}

impl fmt::Display for FitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitKind::CubicSpline => write!(f, "Cubic Spline"),
            FitKind::LeastSquares { degree } => write!(f, "Least Squares (Degree {})", degree),
        }
    }
}

/// A fitted curve sampled over a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FitCurve {
    pub kind: FitKind,
    pub domain: Vec<f64>,
    /// `values[i]` is the fit evaluated at `domain[i]`.
    pub values: Vec<f64>,
}

/// Fit `samples` and evaluate the fit at every point of `domain`.
pub fn fit_curve(samples: &SampleSet, kind: FitKind, domain: &[f64]) -> Result<FitCurve> {
    let _span = tracing::debug_span!("fit_curve", %kind, points = domain.len()).entered();
    let values = match kind {
        FitKind::CubicSpline => {
            let spline = CubicSpline::natural(samples)?;
            domain.iter().map(|&x| spline.evaluate(x)).collect()
        }
        FitKind::LeastSquares { degree } => {
            let poly = Polynomial::least_squares(samples, degree)?;
            domain.iter().map(|&x| poly.evaluate(x)).collect()
        }
    };
    Ok(FitCurve {
        kind,
        domain: domain.to_vec(),
        values,
    })
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Result<Vec<f64>> {
    match n {
        0 => Err(FlowfitError::InsufficientData {
            required: 1,
            actual: 0,
            context: "grid",
        }),
        1 => Ok(vec![start]),
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            grid[n - 1] = stop;
            Ok(grid)
        }
    }
}
