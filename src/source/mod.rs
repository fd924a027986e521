//! Source terms for the nonlinear shallow-water system.
//!
//! Sources model the forcing the hyperbolic flux does not carry: a constant
//! bed gradient, bed friction (linear or quadratic in the velocity) and a
//! constant external forcing. The linear problem types evolve perturbations
//! without net forcing and carry no source by design; selecting one for
//! them is a configuration error.

use crate::equations::PhysicalFlux;

/// Bed friction law of the shallow source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrictionLaw {
    /// Drag proportional to the velocity.
    Linear,
    /// Drag proportional to the velocity times its magnitude.
    Quadratic,
}

/// Nodal source evaluator for the shallow system.
///
/// Coefficients: `[bx, by, cf, fx_ext, fy_ext]`: bed gradient, friction
/// coefficient, external forcing per unit mass. The contribution is
///
/// ```text
/// S = ( 0,
///       -g H bx - cf u phi + H fx_ext,
///       -g H by - cf v phi + H fy_ext )
/// ```
///
/// with `phi` = 1 (linear friction) or |v| (quadratic friction).
#[derive(Clone, Debug, PartialEq)]
pub struct SourceTerm {
    pub friction: FrictionLaw,
    pub coeffs: [f64; 5],
}

impl SourceTerm {
    /// Number of coefficients every shallow source kind takes.
    pub const N_COEFFICIENTS: usize = 5;

    /// Evaluate the source at one node and add it into `out`.
    pub fn evaluate(&self, law: &PhysicalFlux, u: &[f64], out: &mut [f64]) {
        let g = law.gravity().unwrap_or(0.0);
        let [bx, by, cf, fx_ext, fy_ext] = self.coeffs;

        let h = u[0];
        let h_safe = h.max(1e-12);
        let (vx, vy) = (u[1] / h_safe, u[2] / h_safe);
        let phi = match self.friction {
            FrictionLaw::Linear => 1.0,
            FrictionLaw::Quadratic => (vx * vx + vy * vy).sqrt(),
        };

        out[1] += -g * h * bx - cf * vx * phi + h * fx_ext;
        out[2] += -g * h * by - cf * vy * phi + h * fy_ext;
    }

    /// Configuration-facing name.
    pub fn name(&self) -> &'static str {
        match self.friction {
            FrictionLaw::Linear => "sourceShallowCstGradCstFrict",
            FrictionLaw::Quadratic => "sourceShallowCstGradQuadFrict",
        }
    }
}
