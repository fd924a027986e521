//! Initial/boundary-condition evaluators.
//!
//! Every evaluator is a pure function of the boundary node's position, the
//! current time, the interior state at the adjacent node, the edge normal
//! and a fixed-length coefficient vector, producing the prescribed state on
//! the outside of the edge. The evaluator tagged with the reserved
//! physical-group name `Init_Cond` doubles as the initial-condition
//! generator: it is evaluated at t = 0 for every mesh node with an all-zero
//! interior slice.

use std::collections::HashMap;

/// Reserved physical-group name of the initial condition.
pub const INIT_COND_GROUP: &str = "Init_Cond";

/// Context handed to a boundary evaluator for one edge node.
#[derive(Clone, Copy, Debug)]
pub struct BcContext<'a> {
    /// Current simulation time.
    pub time: f64,
    /// Physical position of the node.
    pub position: (f64, f64),
    /// Outward unit normal of the edge.
    pub normal: (f64, f64),
    /// Interior state at the node (all zeros during initialization).
    pub interior: &'a [f64],
}

/// Shape of a boundary evaluator, independent of the problem type.
///
/// The per-problem vocabulary (`sinusShallow`, `openAcousticLin`, ...) maps
/// onto these shapes through the configuration registry, which also owns
/// the legality table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Prescribe the coefficient vector verbatim.
    Constant,
    /// A*sin(2*pi*nu*t + phi) + B on unknown 0, interior elsewhere.
    Sinus,
    /// Sinusoid plus a spatial ramp a*x + b*y on unknown 0, interior
    /// elsewhere.
    SinusAffine,
    /// a*x + b*y + c on unknown 0, zero elsewhere.
    Affine,
    /// 2D Gaussian pulse on unknown 0, zero elsewhere.
    Gaussian2D,
    /// 1D Gaussian pulse along x on unknown 0, zero elsewhere.
    Gaussian1DX,
    /// 1D Gaussian pulse along y on unknown 0, zero elsewhere.
    Gaussian1DY,
    /// Extrapolate the interior state (non-reflecting outflow).
    Free,
    /// Ramp on unknown 0, interior elsewhere.
    OpenAffine,
    /// Mirror the normal component of (unknowns 1, 2), keep unknown 0.
    Reflect,
}

impl BoundaryKind {
    /// Required coefficient-vector length for `n_unknowns` unknowns.
    pub fn n_coefficients(&self, n_unknowns: usize) -> usize {
        match self {
            BoundaryKind::Constant => n_unknowns,
            BoundaryKind::Sinus => 4,
            BoundaryKind::SinusAffine => 6,
            BoundaryKind::Affine => 3,
            BoundaryKind::Gaussian2D => 6,
            BoundaryKind::Gaussian1DX | BoundaryKind::Gaussian1DY => 4,
            BoundaryKind::Free | BoundaryKind::Reflect => 0,
            BoundaryKind::OpenAffine => 3,
        }
    }
}

/// A resolved boundary condition: evaluator shape plus its coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryCondition {
    pub kind: BoundaryKind,
    pub coeffs: Vec<f64>,
}

impl BoundaryCondition {
    /// Evaluate the prescribed state into `out`.
    ///
    /// `out` and `ctx.interior` must both have the problem's unknown count.
    pub fn evaluate(&self, ctx: &BcContext, out: &mut [f64]) {
        let (x, y) = ctx.position;
        let c = &self.coeffs;
        match self.kind {
            BoundaryKind::Constant => out.copy_from_slice(c),
            BoundaryKind::Sinus => {
                out.copy_from_slice(ctx.interior);
                out[0] = c[0] * (2.0 * std::f64::consts::PI * c[1] * ctx.time + c[2]).sin() + c[3];
            }
            BoundaryKind::SinusAffine => {
                out.copy_from_slice(ctx.interior);
                out[0] = c[0] * (2.0 * std::f64::consts::PI * c[1] * ctx.time + c[2]).sin()
                    + c[3]
                    + c[4] * x
                    + c[5] * y;
            }
            BoundaryKind::Affine => {
                out.fill(0.0);
                out[0] = c[0] * x + c[1] * y + c[2];
            }
            BoundaryKind::Gaussian2D => {
                out.fill(0.0);
                let dx = x - c[1];
                let dy = y - c[3];
                out[0] = c[0] * (-dx * dx / (2.0 * c[2]) - dy * dy / (2.0 * c[4])).exp() + c[5];
            }
            BoundaryKind::Gaussian1DX => {
                out.fill(0.0);
                let dx = x - c[1];
                out[0] = c[0] * (-dx * dx / (2.0 * c[2])).exp() + c[3];
            }
            BoundaryKind::Gaussian1DY => {
                out.fill(0.0);
                let dy = y - c[1];
                out[0] = c[0] * (-dy * dy / (2.0 * c[2])).exp() + c[3];
            }
            BoundaryKind::Free => out.copy_from_slice(ctx.interior),
            BoundaryKind::OpenAffine => {
                out.copy_from_slice(ctx.interior);
                out[0] = c[0] * x + c[1] * y + c[2];
            }
            BoundaryKind::Reflect => {
                // Same arithmetic for momenta (shallow) and velocities
                // (linear systems): mirror the normal component of the
                // vector part, keep the scalar part.
                out.copy_from_slice(ctx.interior);
                let (nx, ny) = ctx.normal;
                let vn = ctx.interior[1] * nx + ctx.interior[2] * ny;
                out[1] = ctx.interior[1] - 2.0 * vn * nx;
                out[2] = ctx.interior[2] - 2.0 * vn * ny;
            }
        }
    }
}

/// The complete boundary-condition table of a run: one entry per
/// physical group, plus the designated initial condition.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundarySet {
    /// Per-physical-group conditions, `Init_Cond` excluded.
    pub by_group: HashMap<String, BoundaryCondition>,
    /// The `Init_Cond` entry.
    pub initial: BoundaryCondition,
}

impl BoundarySet {
    /// The condition registered for `group`, if any.
    pub fn get(&self, group: &str) -> Option<&BoundaryCondition> {
        self.by_group.get(group)
    }
}
