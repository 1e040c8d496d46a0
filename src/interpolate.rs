//! Polynomial interpolation in three equivalent formulations.
//!
//! Lagrange, Newton divided differences and Neville's tableau all evaluate the
//! unique degree-(n-1) polynomial through the samples, so for the same input
//! their results agree up to rounding. Computing all three gives a cheap
//! cross-check of each.

use crate::error::Result;
use crate::samples::SampleSet;
use std::fmt;

/// Interpolated value at one query point, by each formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationResult {
    pub query: f64,
    pub lagrange: f64,
    pub newton: f64,
    pub neville: f64,
}

impl InterpolationResult {
    /// Largest pairwise difference between the three values.
    pub fn spread(&self) -> f64 {
        let values = [self.lagrange, self.newton, self.neville];
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        max - min
    }
}

/// Interpolation formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formulation {
    Lagrange,
    Newton,
    Neville,
}

impl Formulation {
    pub const ALL: [Formulation; 3] = [
        Formulation::Lagrange,
        Formulation::Newton,
        Formulation::Neville,
    ];

    /// Evaluate the interpolating polynomial of `samples` at `xq`.
    pub fn evaluate(self, samples: &SampleSet, xq: f64) -> Result<f64> {
        samples.require(2, "polynomial interpolation")?;
        let (x, y) = (samples.x(), samples.y());
        Ok(match self {
            Formulation::Lagrange => lagrange(x, y, xq),
            Formulation::Newton => NewtonPolynomial::from_nodes(x, y).evaluate(xq),
            Formulation::Neville => neville(x, y, xq),
        })
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Formulation::Lagrange => "Lagrange",
            Formulation::Newton => "Newton",
            Formulation::Neville => "Neville",
        };
        f.write_str(name)
    }
}

/// Interpolate `samples` at `xq` with all three formulations.
pub fn interpolate(samples: &SampleSet, xq: f64) -> Result<InterpolationResult> {
    let _span = tracing::debug_span!("interpolate", n = samples.len(), xq).entered();
    let result = InterpolationResult {
        query: xq,
        lagrange: Formulation::Lagrange.evaluate(samples, xq)?,
        newton: Formulation::Newton.evaluate(samples, xq)?,
        neville: Formulation::Neville.evaluate(samples, xq)?,
    };
    tracing::debug!(spread = result.spread(), "interpolation finished");
    Ok(result)
}

/// Sum of `y_i * L_i(xq)` with `L_i(x) = prod_{j != i} (x - x_j) / (x_i - x_j)`.
fn lagrange(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let n = x.len();
    let mut total = 0.0;
    for i in 0..n {
        let mut basis = 1.0;
        for j in 0..n {
            if j != i {
                basis *= (xq - x[j]) / (x[i] - x[j]);
            }
        }
        total += y[i] * basis;
    }
    total
}

/// Neville's tableau; `q[i]` holds column `j` of the tableau after pass `j`.
fn neville(x: &[f64], y: &[f64], xq: f64) -> f64 {
    let n = x.len();
    let mut q = y.to_vec();
    for j in 1..n {
        for i in 0..(n - j) {
            q[i] = ((xq - x[i + j]) * q[i] - (xq - x[i]) * q[i + 1]) / (x[i] - x[i + j]);
        }
    }
    q[0]
}

/// Newton form of the interpolating polynomial.
///
/// Holds the divided-difference coefficients so repeated queries cost O(n).
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonPolynomial {
    nodes: Vec<f64>,
    coefficients: Vec<f64>,
}

impl NewtonPolynomial {
    /// Build from validated samples.
    pub fn new(samples: &SampleSet) -> Result<Self> {
        samples.require(2, "Newton interpolation")?;
        Ok(Self::from_nodes(samples.x(), samples.y()))
    }

    fn from_nodes(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        let mut coef = y.to_vec();
        // Column j of the divided-difference table overwrites entries j..n,
        // walking backwards so each update still sees column j-1.
        for j in 1..n {
            for i in (j..n).rev() {
                coef[i] = (coef[i] - coef[i - 1]) / (x[i] - x[i - j]);
            }
        }
        Self {
            nodes: x.to_vec(),
            coefficients: coef,
        }
    }

    /// Divided differences `f[x_0], f[x_0, x_1], ...`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// `c_0 + c_1 (xq - x_0) + c_2 (xq - x_0)(xq - x_1) + ...`
    pub fn evaluate(&self, xq: f64) -> f64 {
        let mut result = self.coefficients[0];
        let mut product = 1.0;
        for i in 1..self.coefficients.len() {
            product *= xq - self.nodes[i - 1];
            result += self.coefficients[i] * product;
        }
        result
    }
}
