//! Ordered sample points `(x_i, y_i)` shared by interpolation and curve fitting.

use crate::error::{FlowfitError, Result};
use crate::matrix::ensure_finite;

/// Samples with strictly increasing `x`.
///
/// Validation happens once here, so the interpolation and fitting routines
/// never divide by a zero node spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl SampleSet {
    /// Build a sample set, rejecting length mismatches, NaN/Inf values,
    /// repeated and unsorted nodes.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FlowfitError::DimensionMismatch(format!(
                "x has {} values, y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(FlowfitError::InsufficientData {
                required: 1,
                actual: 0,
                context: "sample set",
            });
        }
        ensure_finite(&x, "sample x")?;
        ensure_finite(&y, "sample y")?;
        for i in 1..x.len() {
            if x[i] == x[i - 1] {
                return Err(FlowfitError::DuplicateNode { index: i, value: x[i] });
            }
            if x[i] < x[i - 1] {
                // An unsorted repeat is still a repeat.
                if let Some(j) = x[..i].iter().position(|&v| v == x[i]) {
                    tracing::debug!(first = j, repeat = i, "repeated node");
                    return Err(FlowfitError::DuplicateNode { index: i, value: x[i] });
                }
                return Err(FlowfitError::NotIncreasing { index: i });
            }
        }
        Ok(Self { x, y })
    }

    /// Build from `(x, y)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let (x, y) = points.iter().cloned().unzip();
        Self::new(x, y)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x_0, x_{n-1})`
    pub fn range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Fail unless at least `required` samples are present.
    pub(crate) fn require(&self, required: usize, context: &'static str) -> Result<()> {
        if self.len() < required {
            return Err(FlowfitError::InsufficientData {
                required,
                actual: self.len(),
                context,
            });
        }
        Ok(())
    }
}
