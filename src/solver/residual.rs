//! The semi-discrete residual F(t, u).
//!
//! One evaluation recomputes the nodal physical fluxes, assembles the
//! surface integral over every mesh edge, folds in the stiffness terms of
//! the configured formulation and applies the inverse mass matrix:
//!
//! ```text
//! weak:    F = invM * (I + Sx^T fx + Sy^T fy)
//! strong:  F = invM * (I - Sx fx - Sy fy)
//! ```
//!
//! Enabled source terms are added into the bracket at the node level before
//! the invM product.

use log::debug;
use nalgebra::DVector;

use crate::config::{Formulation, ProblemSpec};
use crate::equations::MAX_UNKNOWNS;
use crate::flux::assemble_surface_integral;
use crate::linalg::{SparseMatrix, SystemMatrices};
use crate::mesh::NodalMesh2D;

use super::{Field, PartialField, SolverError};

/// The residual operator of one run: the problem description plus the
/// prebuilt global matrices, with the stiffness matrices transposed once up
/// front for the weak formulation.
#[derive(Debug)]
pub struct ResidualOperator<'a> {
    spec: &'a ProblemSpec,
    mesh: &'a NodalMesh2D,
    inv_m: SparseMatrix,
    sx: SparseMatrix,
    sy: SparseMatrix,
}

impl<'a> ResidualOperator<'a> {
    /// Bundle the collaborator matrices with the run description.
    pub fn new(spec: &'a ProblemSpec, mesh: &'a NodalMesh2D, matrices: SystemMatrices) -> Self {
        let SystemMatrices { inv_m, sx, sy } = matrices;
        // The weak form consumes the transposes; take them once here
        // instead of on every evaluation.
        let (sx, sy) = match spec.formulation {
            Formulation::Weak => (sx.transpose(), sy.transpose()),
            Formulation::Strong => (sx, sy),
        };
        debug!(
            "system matrices bound: invM {} nnz, Sx {} nnz, Sy {} nnz",
            inv_m.nnz(),
            sx.nnz(),
            sy.nnz()
        );
        Self {
            spec,
            mesh,
            inv_m,
            sx,
            sy,
        }
    }

    /// Evaluate F(t, u) for the trial state `state`.
    ///
    /// `field` and `partial` are the caller-owned scratch buffers; they are
    /// overwritten on every call.
    pub fn eval(
        &self,
        t: f64,
        state: &[DVector<f64>],
        field: &mut Field,
        partial: &mut PartialField,
    ) -> Result<Vec<DVector<f64>>, SolverError> {
        let spec = self.spec;
        let n_unknowns = spec.n_unknowns;
        let n_nodes = self.mesh.n_nodes();

        // Nodal physical fluxes of the trial state.
        field.load(state, &spec.law);

        // Surface integral over every mesh edge.
        let mut bracket: Vec<DVector<f64>> =
            (0..n_unknowns).map(|_| DVector::zeros(n_nodes)).collect();
        assemble_surface_integral(
            self.mesh,
            &spec.law,
            spec.riemann,
            spec.formulation,
            &spec.boundaries,
            t,
            field,
            partial,
            &mut bracket,
        )?;

        // Stiffness contribution per unknown.
        let sign = match spec.formulation {
            Formulation::Weak => 1.0,
            Formulation::Strong => -1.0,
        };
        for k in 0..n_unknowns {
            let sx_f = self
                .sx
                .mul_vector(&field.fx[k])
                .map_err(|source| SolverError::Linalg {
                    stage: "stiffness product",
                    source,
                })?;
            let sy_f = self
                .sy
                .mul_vector(&field.fy[k])
                .map_err(|source| SolverError::Linalg {
                    stage: "stiffness product",
                    source,
                })?;
            bracket[k].axpy(sign, &sx_f, 1.0);
            bracket[k].axpy(sign, &sy_f, 1.0);
        }

        // Nodal sources enter the bracket before the invM product.
        if let Some(source) = &spec.source {
            let mut u_node = [0.0; MAX_UNKNOWNS];
            let mut s_node = [0.0; MAX_UNKNOWNS];
            for i in 0..n_nodes {
                field.state_at(i, &mut u_node[..n_unknowns]);
                s_node[..n_unknowns].fill(0.0);
                source.evaluate(&spec.law, &u_node[..n_unknowns], &mut s_node[..n_unknowns]);
                for k in 0..n_unknowns {
                    bracket[k][i] += s_node[k];
                }
            }
        }

        // F = invM * bracket
        let mut rhs = Vec::with_capacity(n_unknowns);
        for component in &bracket {
            rhs.push(
                self.inv_m
                    .mul_vector(component)
                    .map_err(|source| SolverError::Linalg {
                        stage: "mass-matrix product",
                        source,
                    })?,
            );
        }
        Ok(rhs)
    }
}
