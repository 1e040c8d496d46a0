//! Analysis engine: runs the commands of a compiled problem.
//!
//! Each command maps to one [`Report`]. Linear-system commands live in
//! [`linear`], sample-series commands in [`series`].

pub mod linear;
pub mod series;

use std::collections::BTreeMap;

use crate::compiler::Workload;
use crate::error::{FlowfitError, Result};
use crate::fit::{FitCurve, FitKind};
use crate::interpolate::InterpolationResult;
use crate::ir::Analysis;
use crate::matrix::MatrixProperties;
use crate::solver::{Method, SolveResult};
use crate::stats::Stats;

/// Result of one analysis command.
#[derive(Debug, Clone)]
pub enum Report {
    /// One result per requested method, in method order.
    Solve(BTreeMap<Method, SolveResult>),
    Properties(MatrixProperties),
    Interpolation(InterpolationResult),
    Fit(FitCurve),
}

/// Run a single analysis command against `workload`.
pub fn run(workload: &Workload, analysis: &Analysis, stats: Option<&mut Stats>) -> Result<Report> {
    match analysis {
        Analysis::Solve { methods } => {
            let system = workload
                .system
                .as_ref()
                .ok_or_else(|| FlowfitError::Analysis("no linear system to solve".into()))?;
            let methods: &[Method] = if methods.is_empty() {
                &Method::ALL
            } else {
                methods
            };
            linear::solve(system, &workload.params, methods, stats).map(Report::Solve)
        }
        Analysis::Properties => {
            let matrix = workload
                .matrix
                .as_ref()
                .ok_or_else(|| FlowfitError::Analysis("no matrix for properties".into()))?;
            linear::properties(matrix).map(Report::Properties)
        }
        Analysis::Interpolate { query } => {
            let samples = require_samples(workload)?;
            series::interpolate(samples, *query, stats).map(Report::Interpolation)
        }
        Analysis::Spline { points } => {
            let samples = require_samples(workload)?;
            series::fit(samples, FitKind::CubicSpline, *points, stats).map(Report::Fit)
        }
        Analysis::LeastSquares { degree, points } => {
            let samples = require_samples(workload)?;
            series::fit(samples, FitKind::LeastSquares { degree: *degree }, *points, stats)
                .map(Report::Fit)
        }
    }
}

fn require_samples(workload: &Workload) -> Result<&crate::samples::SampleSet> {
    workload
        .samples
        .as_ref()
        .ok_or_else(|| FlowfitError::Analysis("no sample points".into()))
}
