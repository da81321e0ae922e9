//! Dense periodic scalar fields and their finite-difference stencils.

use precip_core::errors::ErrorInfo;
use precip_core::PrecipError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Row-major `nx × ny` grid of `f64` values with periodic boundaries.
///
/// Cell `(col, row)` lives at `row * nx + col`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Field {
    /// Field of shape `nx × ny` with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// Wraps row-major `data`, checking its length against the shape.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Result<Self, PrecipError> {
        let field = Self { nx, ny, data };
        field.check_shape()?;
        Ok(field)
    }

    /// Builds a field by evaluating `f(col, row)` in row-major order.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for row in 0..ny {
            for col in 0..nx {
                data.push(f(col, row));
            }
        }
        Self { nx, ny, data }
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the field holds no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(col, row)`.
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[self.index(col, row)]
    }

    /// Overwrites the value at `(col, row)`.
    pub fn set(&mut self, col: usize, row: usize, value: f64) {
        let index = self.index(col, row);
        self.data[index] = value;
    }

    /// Row-major view of the values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// True when `other` has the same shape.
    pub fn same_shape(&self, other: &Field) -> bool {
        self.nx == other.nx && self.ny == other.ny
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.nx + col
    }

    pub(crate) fn check_shape(&self) -> Result<(), PrecipError> {
        if self.nx == 0 || self.ny == 0 || self.data.len() != self.nx * self.ny {
            return Err(PrecipError::Config(
                ErrorInfo::new("field-shape", "field data does not match its shape")
                    .with_context("nx", self.nx.to_string())
                    .with_context("ny", self.ny.to_string())
                    .with_context("len", self.data.len().to_string()),
            ));
        }
        Ok(())
    }

    /// Five-point periodic Laplacian divided by `dx²`, written into a new field.
    pub fn laplacian(&self, dx: f64) -> Field {
        let (nx, ny) = (self.nx, self.ny);
        let inv_dx2 = 1.0 / (dx * dx);
        let src = &self.data;
        let mut out = vec![0.0; src.len()];
        out.par_chunks_mut(nx).enumerate().for_each(|(row, out_row)| {
            let up = if row == 0 { ny - 1 } else { row - 1 };
            let down = if row + 1 == ny { 0 } else { row + 1 };
            let here = row * nx;
            for col in 0..nx {
                let left = if col == 0 { nx - 1 } else { col - 1 };
                let right = if col + 1 == nx { 0 } else { col + 1 };
                let centre = src[here + col];
                // Pairwise sum keeps a constant field's Laplacian exactly zero.
                let sum = (src[here + left] + src[here + right])
                    + (src[up * nx + col] + src[down * nx + col]);
                out_row[col] = (sum - 4.0 * centre) * inv_dx2;
            }
        });
        Field { nx, ny, data: out }
    }

    /// Cellwise `f(self, other)` into a new field. Shapes must match.
    pub(crate) fn zip_map(&self, other: &Field, f: impl Fn(f64, f64) -> f64 + Sync) -> Field {
        debug_assert!(self.same_shape(other));
        let data = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Field {
            nx: self.nx,
            ny: self.ny,
            data,
        }
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Smallest value.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Share of cells strictly above `threshold`.
    pub fn fraction_above(&self, threshold: f64) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let count = self.data.iter().filter(|&&value| value > threshold).count();
        count as f64 / self.data.len() as f64
    }

    /// True when any cell is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|value| !value.is_finite())
    }
}
