//! Linear-algebra interface consumed by the solver.
//!
//! The global DG matrices (inverse mass matrix, stiffness matrices) are
//! assembled by an external matrix-builder collaborator and handed to the
//! time integrator as sparse matrices. This module pins down exactly the
//! surface the solver relies on: construction from triplets, transpose,
//! and matrix-vector products against `DVector<f64>` state vectors.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use thiserror::Error;

/// Error type for matrix construction and application.
#[derive(Debug, Error)]
pub enum LinalgError {
    /// Triplet data referenced an index outside the declared shape.
    #[error("triplet ({row}, {col}) out of bounds for a {nrows}x{ncols} matrix")]
    TripletOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    /// Matrix-vector product with mismatched dimensions.
    #[error("dimension mismatch in {op}: matrix is {nrows}x{ncols}, vector has length {len}")]
    DimensionMismatch {
        op: &'static str,
        nrows: usize,
        ncols: usize,
        len: usize,
    },
}

/// Sparse square matrix in compressed-row storage.
///
/// Thin wrapper over [`nalgebra_sparse::CsrMatrix`] exposing the three
/// operations the solver needs. The wrapper keeps the collaborator surface
/// narrow: whatever builds the matrices only has to produce triplets.
#[derive(Clone, Debug)]
pub struct SparseMatrix {
    csr: CsrMatrix<f64>,
}

impl SparseMatrix {
    /// Build a matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate entries are summed, matching the usual finite-element
    /// assembly convention.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self, LinalgError> {
        let mut coo = CooMatrix::new(nrows, ncols);
        for &(row, col, value) in triplets {
            if row >= nrows || col >= ncols {
                return Err(LinalgError::TripletOutOfBounds {
                    row,
                    col,
                    nrows,
                    ncols,
                });
            }
            coo.push(row, col, value);
        }
        Ok(Self {
            csr: CsrMatrix::from(&coo),
        })
    }

    /// Diagonal matrix from its entries.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let mut coo = CooMatrix::new(diag.len(), diag.len());
        for (i, &value) in diag.iter().enumerate() {
            coo.push(i, i, value);
        }
        Self {
            csr: CsrMatrix::from(&coo),
        }
    }

    /// Zero matrix of the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            csr: CsrMatrix::zeros(nrows, ncols),
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.csr.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.csr.ncols()
    }

    /// Number of explicitly stored entries.
    pub fn nnz(&self) -> usize {
        self.csr.nnz()
    }

    /// Owned transpose.
    pub fn transpose(&self) -> Self {
        Self {
            csr: self.csr.transpose(),
        }
    }

    /// Matrix-vector product `y = A * x`.
    pub fn mul_vector(&self, x: &DVector<f64>) -> Result<DVector<f64>, LinalgError> {
        if x.len() != self.csr.ncols() {
            return Err(LinalgError::DimensionMismatch {
                op: "mul_vector",
                nrows: self.csr.nrows(),
                ncols: self.csr.ncols(),
                len: x.len(),
            });
        }
        let mut y = DVector::zeros(self.csr.nrows());
        for (i, row) in self.csr.row_iter().enumerate() {
            let mut acc = 0.0;
            for (&j, &value) in row.col_indices().iter().zip(row.values()) {
                acc += value * x[j];
            }
            y[i] = acc;
        }
        Ok(y)
    }
}

/// The global DG system matrices, built once and immutable for the run.
///
/// `inv_m` is the inverse mass matrix; `sx` and `sy` are the stiffness
/// matrices in x and y. The weak formulation consumes their transposes,
/// which the integrator takes once up front.
#[derive(Clone, Debug)]
pub struct SystemMatrices {
    pub inv_m: SparseMatrix,
    pub sx: SparseMatrix,
    pub sy: SparseMatrix,
}

impl SystemMatrices {
    /// Bundle prebuilt matrices, checking that all three share the square
    /// shape of the global node count.
    pub fn new(
        inv_m: SparseMatrix,
        sx: SparseMatrix,
        sy: SparseMatrix,
        n_nodes: usize,
    ) -> Result<Self, LinalgError> {
        for (matrix, op) in [
            (&inv_m, "invM shape"),
            (&sx, "Sx shape"),
            (&sy, "Sy shape"),
        ] {
            if matrix.nrows() != n_nodes || matrix.ncols() != n_nodes {
                return Err(LinalgError::DimensionMismatch {
                    op,
                    nrows: matrix.nrows(),
                    ncols: matrix.ncols(),
                    len: n_nodes,
                });
            }
        }
        Ok(Self { inv_m, sx, sy })
    }
}
