//! Dense row-major matrix.
//!
//! The conservation systems handled here are small and fully populated, so a
//! flat row-major buffer is used instead of a sparse format. Also provides the
//! matrix property report (condition number, determinant, rank).

use crate::error::{FlowfitError, Result};
use crate::solver::svd;
use faer::Mat;

/// Dense matrix stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    pub nrows: usize,
    pub ncols: usize,
    /// `values[i * ncols + j]` holds entry (i, j).
    pub values: Vec<f64>,
}

impl DenseMatrix {
    /// Create an all-zero matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            values: vec![0.0; nrows * ncols],
        }
    }

    /// Create the n×n identity.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Build a matrix entry by entry.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                values.push(f(i, j));
            }
        }
        Self {
            nrows,
            ncols,
            values,
        }
    }

    /// Build a matrix from equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut values = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(FlowfitError::DimensionMismatch(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            nrows,
            ncols,
            values,
        })
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ncols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.ncols + j] = value;
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Copy into nested rows. Used as scratch space by in-place algorithms.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nrows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Matrix-vector multiply: y = A * x
    pub fn matvec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.ncols, "matvec dimension mismatch");
        (0..self.nrows)
            .map(|i| self.row(i).iter().zip(x).map(|(a, xi)| a * xi).sum())
            .collect()
    }

    /// Main diagonal entries.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.nrows.min(self.ncols))
            .map(|i| self.get(i, i))
            .collect()
    }

    /// `|A_ii| >= sum_{j != i} |A_ij|` for every row.
    pub fn is_diagonally_dominant(&self) -> bool {
        self.is_square()
            && (0..self.nrows).all(|i| {
                let off: f64 = self
                    .row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, a)| a.abs())
                    .sum();
                self.get(i, i).abs() >= off
            })
    }

    pub fn to_faer(&self) -> Mat<f64> {
        Mat::<f64>::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }
}

/// Euclidean norm.
pub fn norm2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Fail on the first NaN or infinite entry of `values`.
pub fn ensure_finite(values: &[f64], context: &'static str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(FlowfitError::NonFinite { index, context }),
        None => Ok(()),
    }
}

/// Summary of a system matrix for display alongside the solutions.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixProperties {
    pub nrows: usize,
    pub ncols: usize,
    /// Ratio of largest to smallest singular value; infinite for singular matrices.
    pub condition_number: f64,
    pub determinant: f64,
    pub rank: usize,
}

/// Compute condition number, determinant and numerical rank of `a`.
pub fn properties(a: &DenseMatrix) -> Result<MatrixProperties> {
    if !a.is_square() {
        return Err(FlowfitError::DimensionMismatch(format!(
            "matrix properties need a square matrix, got {}x{}",
            a.nrows, a.ncols
        )));
    }
    if a.nrows == 0 {
        return Err(FlowfitError::InsufficientData {
            required: 1,
            actual: 0,
            context: "matrix properties",
        });
    }
    ensure_finite(&a.values, "matrix")?;

    let factors = svd::thin_svd(a)?;
    let s_max = factors.s.iter().cloned().fold(0.0_f64, f64::max);
    let s_min = factors.s.iter().cloned().fold(f64::INFINITY, f64::min);
    let condition_number = if s_min == 0.0 {
        f64::INFINITY
    } else {
        s_max / s_min
    };
    let rank_cutoff = s_max * a.nrows.max(a.ncols) as f64 * f64::EPSILON;
    let rank = factors.s.iter().filter(|&&s| s > rank_cutoff).count();

    Ok(MatrixProperties {
        nrows: a.nrows,
        ncols: a.ncols,
        condition_number,
        determinant: determinant(a),
        rank,
    })
}

/// Determinant by elimination with partial pivoting; each row swap flips the sign.
fn determinant(a: &DenseMatrix) -> f64 {
    let n = a.nrows;
    let mut m = a.to_rows();
    let mut det = 1.0;

    for k in 0..n {
        let mut max_row = k;
        for i in (k + 1)..n {
            if m[i][k].abs() > m[max_row][k].abs() {
                max_row = i;
            }
        }
        if m[max_row][k] == 0.0 {
            return 0.0;
        }
        if max_row != k {
            m.swap(k, max_row);
            det = -det;
        }

        let pivot = m[k][k];
        det *= pivot;
        for i in (k + 1)..n {
            let factor = m[i][k] / pivot;
            for j in k..n {
                m[i][j] -= factor * m[k][j];
            }
        }
    }

    det
}
