//! Sample-series analyses: interpolation at a query point and curve fits
//! sampled across the node range.

use crate::error::Result;
use crate::fit::{fit_curve, linspace, FitCurve, FitKind};
use crate::interpolate::{self, InterpolationResult};
use crate::samples::SampleSet;
use crate::stats::Stats;

/// Relative agreement expected between the three formulations.
const AGREEMENT_TOL: f64 = 1e-9;

/// Interpolate `samples` at `query` with every formulation.
pub fn interpolate(
    samples: &SampleSet,
    query: f64,
    stats: Option<&mut Stats>,
) -> Result<InterpolationResult> {
    let _span = tracing::info_span!("interpolate_analysis", query, samples = samples.len()).entered();

    let (lo, hi) = samples.range();
    if query < lo || query > hi {
        tracing::warn!(query, lo, hi, "query outside the node range, extrapolating");
    }

    let result = interpolate::interpolate(samples, query)?;
    let scale = result.lagrange.abs().max(1.0);
    if result.spread() > AGREEMENT_TOL * scale {
        tracing::warn!(spread = result.spread(), "interpolation formulations disagree");
    }

    if let Some(s) = stats {
        s.interpolations += 1;
    }
    Ok(result)
}

/// Fit `samples` and evaluate the fit at `points` evenly spaced grid points
/// spanning `[x_0, x_{n-1}]`.
pub fn fit(
    samples: &SampleSet,
    kind: FitKind,
    points: usize,
    stats: Option<&mut Stats>,
) -> Result<FitCurve> {
    let _span = tracing::info_span!("fit_analysis", %kind, points).entered();

    let (lo, hi) = samples.range();
    let grid = linspace(lo, hi, points)?;
    let curve = fit_curve(samples, kind, &grid)?;

    if let Some(s) = stats {
        s.fits += 1;
        s.fit_points += curve.domain.len();
    }
    Ok(curve)
}
