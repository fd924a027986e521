//! Caller-owned scratch buffers reused across all RK stages.
//!
//! `Field` holds the nodal unknowns and their physical fluxes for the trial
//! state a residual evaluation works on; `PartialField` holds the per-edge
//! transients (boundary-evaluated state, boundary flux, numerical-flux
//! accumulation). Both are allocated once per run, reset before each
//! residual evaluation and discarded when the run ends; nothing in here is
//! a hidden static.

use nalgebra::DVector;

use crate::equations::{PhysicalFlux, MAX_UNKNOWNS};

/// Nodal state and flux storage for one residual evaluation.
#[derive(Clone, Debug)]
pub struct Field {
    /// Unknown values at every node, one vector per unknown.
    pub u: Vec<DVector<f64>>,
    /// Physical x-flux per unknown per node.
    pub fx: Vec<DVector<f64>>,
    /// Physical y-flux per unknown per node.
    pub fy: Vec<DVector<f64>>,
}

impl Field {
    /// Allocate zeroed storage for `n_unknowns` unknowns on `n_nodes` nodes.
    pub fn new(n_unknowns: usize, n_nodes: usize) -> Self {
        Self {
            u: (0..n_unknowns).map(|_| DVector::zeros(n_nodes)).collect(),
            fx: (0..n_unknowns).map(|_| DVector::zeros(n_nodes)).collect(),
            fy: (0..n_unknowns).map(|_| DVector::zeros(n_nodes)).collect(),
        }
    }

    /// Number of unknowns.
    pub fn n_unknowns(&self) -> usize {
        self.u.len()
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.u.first().map_or(0, |v| v.len())
    }

    /// Load the trial state and recompute the nodal physical fluxes.
    pub fn load(&mut self, state: &[DVector<f64>], law: &PhysicalFlux) {
        let n_unknowns = self.n_unknowns();
        for (dst, src) in self.u.iter_mut().zip(state) {
            dst.copy_from(src);
        }
        let mut u_node = [0.0; MAX_UNKNOWNS];
        let mut fx_node = [0.0; MAX_UNKNOWNS];
        let mut fy_node = [0.0; MAX_UNKNOWNS];
        for i in 0..self.n_nodes() {
            for k in 0..n_unknowns {
                u_node[k] = self.u[k][i];
            }
            law.flux(
                &u_node[..n_unknowns],
                &mut fx_node[..n_unknowns],
                &mut fy_node[..n_unknowns],
            );
            for k in 0..n_unknowns {
                self.fx[k][i] = fx_node[k];
                self.fy[k][i] = fy_node[k];
            }
        }
    }

    /// Gather the state at node `i` into `out`.
    #[inline]
    pub fn state_at(&self, i: usize, out: &mut [f64]) {
        for (k, value) in out.iter_mut().enumerate() {
            *value = self.u[k][i];
        }
    }

    /// Gather the flux at node `i` into `fx`/`fy`.
    #[inline]
    pub fn flux_at(&self, i: usize, fx: &mut [f64], fy: &mut [f64]) {
        for k in 0..fx.len() {
            fx[k] = self.fx[k][i];
            fy[k] = self.fy[k][i];
        }
    }
}

/// Per-edge transient buffers of the flux assembly.
///
/// Sized for the largest system so one allocation serves every edge.
#[derive(Clone, Debug, Default)]
pub struct PartialField {
    /// Boundary-evaluated state at the current edge node.
    pub u_bc: [f64; MAX_UNKNOWNS],
    /// Physical x-flux of the boundary-evaluated state.
    pub fx_bc: [f64; MAX_UNKNOWNS],
    /// Physical y-flux of the boundary-evaluated state.
    pub fy_bc: [f64; MAX_UNKNOWNS],
    /// Numerical-flux contribution per edge node, scattered into the
    /// surface-integral vector after both nodes are evaluated.
    pub g: [[f64; MAX_UNKNOWNS]; 2],
}

impl PartialField {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_computes_fluxes() {
        let law = PhysicalFlux::Transport { ax: 2.0, ay: 0.5 };
        let mut field = Field::new(1, 3);
        let state = vec![DVector::from_vec(vec![1.0, 2.0, 3.0])];
        field.load(&state, &law);
        assert_eq!(field.fx[0][1], 4.0);
        assert_eq!(field.fy[0][2], 1.5);
    }

    #[test]
    fn test_state_and_flux_gather() {
        let law = PhysicalFlux::ShallowLin { g: 10.0, h0: 2.0 };
        let mut field = Field::new(3, 2);
        let state = vec![
            DVector::from_vec(vec![1.0, 0.0]),
            DVector::from_vec(vec![0.5, 0.0]),
            DVector::from_vec(vec![0.0, 0.0]),
        ];
        field.load(&state, &law);
        let mut u = [0.0; 3];
        let mut fx = [0.0; 3];
        let mut fy = [0.0; 3];
        field.state_at(0, &mut u);
        field.flux_at(0, &mut fx, &mut fy);
        assert_eq!(u, [1.0, 0.5, 0.0]);
        assert_eq!(fx[0], 1.0); // h0 * u
        assert_eq!(fx[1], 10.0); // g * eta
    }
}
