//! Natural cubic spline.
//!
//! Stores the second derivative `M_i` at each knot. Interior values solve the
//! tridiagonal system
//!
//! ```text
//! h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (s_i - s_{i-1})
//! ```
//!
//! with `h_i = x_{i+1} - x_i`, `s_i = (y_{i+1} - y_i) / h_i` and the natural
//! boundary `M_0 = M_{n-1} = 0`. The system is solved with the Thomas algorithm.

use crate::error::Result;
use crate::samples::SampleSet;

/// Piecewise cubic through every sample, C² at interior knots.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build a natural spline. Needs at least 3 samples.
    pub fn natural(samples: &SampleSet) -> Result<Self> {
        samples.require(3, "cubic spline")?;
        let x = samples.x().to_vec();
        let y = samples.y().to_vec();
        let n = x.len();

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<f64> = y
            .windows(2)
            .zip(&h)
            .map(|(w, hi)| (w[1] - w[0]) / hi)
            .collect();

        // Interior unknowns M_1 .. M_{n-2}
        let k = n - 2;
        let mut diag = Vec::with_capacity(k);
        let mut upper = Vec::with_capacity(k);
        let mut rhs = Vec::with_capacity(k);
        for i in 1..n - 1 {
            diag.push(2.0 * (h[i - 1] + h[i]));
            upper.push(h[i]);
            rhs.push(6.0 * (slopes[i] - slopes[i - 1]));
        }
        // Lower diagonal of row r is h[r], same values as upper shifted by one.
        let lower: Vec<f64> = (1..k).map(|r| h[r]).collect();

        let interior = thomas(&lower, &diag, &upper, &rhs);

        let mut m = vec![0.0; n];
        m[1..n - 1].copy_from_slice(&interior);

        Ok(Self { x, y, m })
    }

    /// Second derivatives at the knots.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.m
    }

    /// Evaluate the spline. Outside the knots the end segments are extended.
    pub fn evaluate(&self, xq: f64) -> f64 {
        let i = self.segment(xq);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let h = x1 - x0;
        let (a, b) = (x1 - xq, xq - x0);

        self.m[i] * a.powi(3) / (6.0 * h)
            + self.m[i + 1] * b.powi(3) / (6.0 * h)
            + (self.y[i] / h - self.m[i] * h / 6.0) * a
            + (self.y[i + 1] / h - self.m[i + 1] * h / 6.0) * b
    }

    /// First derivative of segment `i` at `xq`.
    fn derivative_on(&self, i: usize, xq: f64) -> f64 {
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let h = x1 - x0;
        let (a, b) = (x1 - xq, xq - x0);

        -self.m[i] * a * a / (2.0 * h) + self.m[i + 1] * b * b / (2.0 * h)
            - (self.y[i] / h - self.m[i] * h / 6.0)
            + (self.y[i + 1] / h - self.m[i + 1] * h / 6.0)
    }

    /// Second derivative at `xq`; linear in `M` along each segment.
    pub fn second_derivative(&self, xq: f64) -> f64 {
        let i = self.segment(xq);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let h = x1 - x0;
        (self.m[i] * (x1 - xq) + self.m[i + 1] * (xq - x0)) / h
    }

    /// First derivative at `xq`.
    pub fn derivative(&self, xq: f64) -> f64 {
        self.derivative_on(self.segment(xq), xq)
    }

    /// Index of the segment `[x_i, x_{i+1}]` used for `xq`.
    fn segment(&self, xq: f64) -> usize {
        let n = self.x.len();
        self.x[1..n - 1].partition_point(|&knot| knot <= xq)
    }
}

/// Solve a tridiagonal system.
///
/// `lower[r]` multiplies unknown `r` in row `r + 1`; `upper[r]` multiplies
/// unknown `r + 1` in row `r`. The entry of `upper` for the last row is unused.
fn thomas(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = upper[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for r in 1..n {
        let denom = diag[r] - lower[r - 1] * c[r - 1];
        c[r] = if r + 1 < n { upper[r] / denom } else { 0.0 };
        d[r] = (rhs[r] - lower[r - 1] * d[r - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for r in (0..n - 1).rev() {
        x[r] = d[r] - c[r] * x[r + 1];
    }
    x
}
