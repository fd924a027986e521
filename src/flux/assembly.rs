//! Surface-integral assembly over the mesh edges.
//!
//! For every element edge the configured Riemann scheme combines the
//! interior state with the outside state and the result is scattered into
//! the per-unknown surface-integral vector `I`. Boundary and interior edges
//! share the same arithmetic; the case split only selects where the outside
//! state comes from (boundary evaluator vs the element sharing the edge).

use nalgebra::DVector;

use crate::boundary::{BcContext, BoundarySet};
use crate::config::Formulation;
use crate::equations::{PhysicalFlux, MAX_UNKNOWNS};
use crate::solver::{Field, PartialField, SolverError};

use super::schemes::{EdgeData, RiemannScheme};

/// Assemble the surface-integral vector `integral` for the state held in
/// `field` at time `time`.
///
/// The per-node contribution is `w * (delta * f_in.n - phi)` with
/// `w = length/2` (lumped linear edge lifting), `phi` the scheme's normal
/// flux and `delta` = 0 for the weak formulation, 1 for the strong one.
///
/// `integral` must be zeroed by the caller; contributions accumulate.
pub fn assemble_surface_integral(
    mesh: &crate::mesh::NodalMesh2D,
    law: &PhysicalFlux,
    scheme: RiemannScheme,
    formulation: Formulation,
    boundaries: &BoundarySet,
    time: f64,
    field: &Field,
    partial: &mut PartialField,
    integral: &mut [DVector<f64>],
) -> Result<(), SolverError> {
    let n_unknowns = law.n_unknowns();
    let delta = match formulation {
        Formulation::Weak => 0.0,
        Formulation::Strong => 1.0,
    };

    let mut u_in = [0.0; MAX_UNKNOWNS];
    let mut fx_in = [0.0; MAX_UNKNOWNS];
    let mut fy_in = [0.0; MAX_UNKNOWNS];
    let mut u_out = [0.0; MAX_UNKNOWNS];
    let mut fx_out = [0.0; MAX_UNKNOWNS];
    let mut fy_out = [0.0; MAX_UNKNOWNS];
    let mut phi = [0.0; MAX_UNKNOWNS];

    for edge in &mesh.edges {
        let weight = 0.5 * edge.length;

        for (slot, &node) in edge.nodes.iter().enumerate() {
            field.state_at(node, &mut u_in[..n_unknowns]);
            field.flux_at(node, &mut fx_in[..n_unknowns], &mut fy_in[..n_unknowns]);

            match edge.neighbor_nodes {
                Some(remote) => {
                    // Interior edge: the outside state lives in the
                    // neighboring element at the matching node.
                    let j = remote[slot];
                    field.state_at(j, &mut u_out[..n_unknowns]);
                    field.flux_at(j, &mut fx_out[..n_unknowns], &mut fy_out[..n_unknowns]);
                }
                None => {
                    // Boundary edge: evaluate the prescribed state and its
                    // physical flux.
                    let group = edge.group.as_deref().unwrap_or_default();
                    let bc = boundaries.get(group).ok_or_else(|| {
                        SolverError::MissingBoundaryCondition {
                            group: group.to_string(),
                        }
                    })?;
                    let ctx = BcContext {
                        time,
                        position: edge.coords[slot],
                        normal: edge.normal,
                        interior: &u_in[..n_unknowns],
                    };
                    bc.evaluate(&ctx, &mut partial.u_bc[..n_unknowns]);
                    law.flux(
                        &partial.u_bc[..n_unknowns],
                        &mut partial.fx_bc[..n_unknowns],
                        &mut partial.fy_bc[..n_unknowns],
                    );
                    u_out[..n_unknowns].copy_from_slice(&partial.u_bc[..n_unknowns]);
                    fx_out[..n_unknowns].copy_from_slice(&partial.fx_bc[..n_unknowns]);
                    fy_out[..n_unknowns].copy_from_slice(&partial.fy_bc[..n_unknowns]);
                }
            }

            let data = EdgeData {
                normal: edge.normal,
                u_in: &u_in[..n_unknowns],
                fx_in: &fx_in[..n_unknowns],
                fy_in: &fy_in[..n_unknowns],
                u_out: &u_out[..n_unknowns],
                fx_out: &fx_out[..n_unknowns],
                fy_out: &fy_out[..n_unknowns],
            };
            scheme.normal_flux(law, &data, &mut phi[..n_unknowns]);

            let (nx, ny) = edge.normal;
            for k in 0..n_unknowns {
                let f_in_n = fx_in[k] * nx + fy_in[k] * ny;
                partial.g[slot][k] = delta * f_in_n - phi[k];
            }
        }

        // Scatter both edge nodes into the surface-integral vector.
        for (slot, &node) in edge.nodes.iter().enumerate() {
            for k in 0..n_unknowns {
                integral[k][node] += weight * partial.g[slot][k];
            }
        }
    }

    Ok(())
}
