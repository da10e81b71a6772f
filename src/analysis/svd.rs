//! Truncated singular value decomposition of a selected submatrix.
//!
//! The selected projection rows form a `k × n` matrix `M`. Its SVD
//! `M = U · diag(s) · Vᵀ` yields, per component, one vector over the
//! columns (`Vᵀ` row, length `n`) and one over the rows (`U` column,
//! length `k`). Both are emitted as traces.

use log::info;
use nalgebra::DMatrix;

use crate::error::SvdError;
use crate::trace::TraceBatch;

/// Upper bound on QR sweeps before giving up.
const MAX_ITERATIONS: usize = 10_000;

/// Leading components of an SVD, in descending singular-value order.
#[derive(Debug, Clone, PartialEq)]
pub struct SvdResult {
    pub singular_values: Vec<f64>,
    /// Left singular vectors, each of length `k` (one value per input row).
    pub u: Vec<Vec<f64>>,
    /// Right singular vectors, each of length `n` (one value per input column).
    pub v: Vec<Vec<f64>>,
}

/// Decompose `matrix` (rows of equal length) and keep
/// `min(components, k, n)` components.
///
/// `components == 0` is a no-op and returns `Ok(None)`.
pub fn analyze(matrix: &[Vec<f64>], components: usize) -> Result<Option<SvdResult>, SvdError> {
    let k = matrix.len();
    let n = matrix.first().map_or(0, Vec::len);
    if k == 0 || n == 0 {
        return Err(SvdError::EmptyMatrix);
    }
    if let Some((row, r)) = matrix.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(SvdError::DimensionMismatch {
            row,
            expected: n,
            found: r.len(),
        });
    }
    if components == 0 {
        return Ok(None);
    }
    if matrix.iter().flatten().any(|v| !v.is_finite()) {
        return Err(SvdError::NoConvergence);
    }

    let m = DMatrix::from_fn(k, n, |r, c| matrix[r][c]);
    let svd = m
        .try_svd(true, true, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(SvdError::NoConvergence)?;
    let u = svd.u.as_ref().ok_or(SvdError::NoConvergence)?;
    let v_t = svd.v_t.as_ref().ok_or(SvdError::NoConvergence)?;

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));
    order.truncate(components.min(k).min(n));

    let result = SvdResult {
        singular_values: order.iter().map(|&j| svd.singular_values[j]).collect(),
        u: order
            .iter()
            .map(|&j| u.column(j).iter().copied().collect())
            .collect(),
        v: order
            .iter()
            .map(|&j| v_t.row(j).iter().copied().collect())
            .collect(),
    };
    info!(
        "SVD of {k}x{n} matrix: kept {} component(s), s = {:?}",
        result.components(),
        result.singular_values
    );
    Ok(Some(result))
}

impl SvdResult {
    /// Number of components actually kept, after clamping.
    pub fn components(&self) -> usize {
        self.singular_values.len()
    }

    /// Multiply every singular vector by its singular value.
    pub fn scaled(mut self) -> Self {
        for (j, &s) in self.singular_values.iter().enumerate() {
            self.u[j].iter_mut().for_each(|v| *v *= s);
            self.v[j].iter_mut().for_each(|v| *v *= s);
        }
        self
    }

    /// `U · diag(s) · Vᵀ` of the kept components.
    pub fn reconstruct(&self) -> Vec<Vec<f64>> {
        let k = self.u.first().map_or(0, Vec::len);
        let n = self.v.first().map_or(0, Vec::len);
        (0..k)
            .map(|r| {
                (0..n)
                    .map(|c| {
                        (0..self.components())
                            .map(|j| self.u[j][r] * self.singular_values[j] * self.v[j][c])
                            .sum()
                    })
                    .collect()
            })
            .collect()
    }

    /// Names embedding each singular value, e.g. `SVD0 : eig=1.5`.
    pub fn names(&self, prefix: &str) -> Vec<String> {
        self.singular_values
            .iter()
            .map(|s| format!("{prefix} : eig={s}"))
            .collect()
    }

    /// Right singular vectors as traces over the column axis.
    pub fn row_traces(&self, prefix: &str, column_axis: &[f64]) -> TraceBatch {
        TraceBatch {
            names: self.names(prefix),
            xs: vec![column_axis.to_vec(); self.components()],
            ys: self.v.clone(),
        }
    }

    /// Left singular vectors as traces over the row axis.
    pub fn column_traces(&self, prefix: &str, row_axis: &[f64]) -> TraceBatch {
        TraceBatch {
            names: self.names(prefix),
            xs: vec![row_axis.to_vec(); self.components()],
            ys: self.u.clone(),
        }
    }
}
