//! Edge-normal numerical fluxes: Lax-Friedrichs, Roe, central mean.

use crate::equations::PhysicalFlux;

/// States and physical fluxes on the two sides of an edge node.
///
/// `u_out`/`fx_out`/`fy_out` come either from the neighboring element
/// (interior edge) or from a boundary evaluator (boundary edge); the
/// schemes make no distinction.
#[derive(Clone, Copy, Debug)]
pub struct EdgeData<'a> {
    pub normal: (f64, f64),
    pub u_in: &'a [f64],
    pub fx_in: &'a [f64],
    pub fy_in: &'a [f64],
    pub u_out: &'a [f64],
    pub fx_out: &'a [f64],
    pub fy_out: &'a [f64],
}

/// Numerical-flux scheme selection.
///
/// Legality per problem type is enforced by the configuration registry:
/// Lax-Friedrichs is always legal, `Mean` only for the linear systems,
/// `Roe` only for nonlinear shallow water.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiemannScheme {
    /// Lax-Friedrichs with the edge-local wave-speed bound.
    LaxFriedrichs,
    /// Roe flux-difference splitting (nonlinear shallow water).
    Roe,
    /// Unstabilized central average.
    Mean,
}

impl RiemannScheme {
    /// Configuration-facing name.
    pub fn name(&self) -> &'static str {
        match self {
            RiemannScheme::LaxFriedrichs => "LF",
            RiemannScheme::Roe => "Roe",
            RiemannScheme::Mean => "mean",
        }
    }

    /// Compute the edge-normal numerical flux `phi = F* . n` per unknown.
    pub fn normal_flux(&self, law: &PhysicalFlux, edge: &EdgeData, phi: &mut [f64]) {
        match self {
            RiemannScheme::LaxFriedrichs => {
                let lambda_in = law.normal_wave_speed(edge.u_in, edge.normal);
                let lambda_out = law.normal_wave_speed(edge.u_out, edge.normal);
                let c = lambda_in.max(lambda_out);
                central_average(edge, phi);
                for (k, value) in phi.iter_mut().enumerate() {
                    *value += 0.5 * c * (edge.u_in[k] - edge.u_out[k]);
                }
            }
            RiemannScheme::Mean => central_average(edge, phi),
            RiemannScheme::Roe => {
                let g = law
                    .gravity()
                    .expect("Roe scheme resolved for a non-shallow law");
                roe_shallow(g, edge, phi);
            }
        }
    }
}

/// phi = (f_in + f_out) . n / 2
#[inline]
fn central_average(edge: &EdgeData, phi: &mut [f64]) {
    let (nx, ny) = edge.normal;
    for (k, value) in phi.iter_mut().enumerate() {
        *value = 0.5
            * ((edge.fx_in[k] + edge.fx_out[k]) * nx + (edge.fy_in[k] + edge.fy_out[k]) * ny);
    }
}

/// Roe flux for the shallow-water system.
///
/// Works in the edge-aligned frame: rotate the conserved states, build the
/// Roe-averaged linearization, subtract the characteristic dissipation from
/// the central flux and rotate back. The entropy fix keeps transonic
/// rarefactions from collapsing onto a zero eigenvalue.
fn roe_shallow(g: f64, edge: &EdgeData, phi: &mut [f64]) {
    let (nx, ny) = edge.normal;
    let h_min = 1e-12;

    let h_l = edge.u_in[0];
    let h_r = edge.u_out[0];
    if h_l <= h_min && h_r <= h_min {
        phi.fill(0.0);
        return;
    }

    // Rotated momenta: normal and tangential components.
    let hun_l = edge.u_in[1] * nx + edge.u_in[2] * ny;
    let hut_l = -edge.u_in[1] * ny + edge.u_in[2] * nx;
    let hun_r = edge.u_out[1] * nx + edge.u_out[2] * ny;
    let hut_r = -edge.u_out[1] * ny + edge.u_out[2] * nx;

    let (un_l, ut_l) = if h_l > h_min {
        (hun_l / h_l, hut_l / h_l)
    } else {
        (0.0, 0.0)
    };
    let (un_r, ut_r) = if h_r > h_min {
        (hun_r / h_r, hut_r / h_r)
    } else {
        (0.0, 0.0)
    };

    let c_l = (g * h_l.max(0.0)).sqrt();
    let c_r = (g * h_r.max(0.0)).sqrt();

    // Physical fluxes in the rotated frame: [h un, h un^2 + g h^2/2, h un ut].
    let f_l = [
        h_l * un_l,
        h_l * un_l * un_l + 0.5 * g * h_l * h_l,
        h_l * un_l * ut_l,
    ];
    let f_r = [
        h_r * un_r,
        h_r * un_r * un_r + 0.5 * g * h_r * h_r,
        h_r * un_r * ut_r,
    ];

    // Roe averages: sqrt(H)-weighted velocities, arithmetic mean depth.
    let sqrt_h_l = h_l.max(0.0).sqrt();
    let sqrt_h_r = h_r.max(0.0).sqrt();
    let denom = sqrt_h_l + sqrt_h_r;
    let (un_roe, ut_roe, c_roe) = if denom > 1e-10 {
        let h_roe = 0.5 * (h_l + h_r);
        (
            (sqrt_h_l * un_l + sqrt_h_r * un_r) / denom,
            (sqrt_h_l * ut_l + sqrt_h_r * ut_r) / denom,
            (g * h_roe).sqrt(),
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let lambda_1 = un_roe - c_roe;
    let lambda_2 = un_roe;
    let lambda_3 = un_roe + c_roe;

    // Jumps and wave strengths.
    let delta_h = h_r - h_l;
    let delta_hun = hun_r - hun_l;
    let delta_hut = hut_r - hut_l;
    let (alpha_1, alpha_2, alpha_3) = if c_roe > 1e-10 {
        let inv_2c = 0.5 / c_roe;
        (
            inv_2c * ((un_roe + c_roe) * delta_h - delta_hun),
            delta_hut - ut_roe * delta_h,
            inv_2c * (-(un_roe - c_roe) * delta_h + delta_hun),
        )
    } else {
        (0.5 * delta_h, delta_hut, 0.5 * delta_h)
    };

    // Right eigenvectors r1 = [1, un-c, ut], r2 = [0, 0, 1], r3 = [1, un+c, ut].
    let lambda_1_abs = entropy_fix(lambda_1, un_l - c_l, un_r - c_r);
    let lambda_2_abs = lambda_2.abs();
    let lambda_3_abs = entropy_fix(lambda_3, un_l + c_l, un_r + c_r);

    let d1 = lambda_1_abs * alpha_1;
    let d2 = lambda_2_abs * alpha_2;
    let d3 = lambda_3_abs * alpha_3;

    let phi_h = 0.5 * (f_l[0] + f_r[0]) - 0.5 * (d1 + d3);
    let phi_n = 0.5 * (f_l[1] + f_r[1])
        - 0.5 * (d1 * (un_roe - c_roe) + d3 * (un_roe + c_roe));
    let phi_t = 0.5 * (f_l[2] + f_r[2]) - 0.5 * (d1 * ut_roe + d2 + d3 * ut_roe);

    // Rotate the momentum flux back to physical coordinates.
    phi[0] = phi_h;
    phi[1] = phi_n * nx - phi_t * ny;
    phi[2] = phi_n * ny + phi_t * nx;
}

/// Harten-Hyman entropy fix: widen an eigenvalue that straddles zero.
fn entropy_fix(lambda_roe: f64, lambda_l: f64, lambda_r: f64) -> f64 {
    if lambda_l < 0.0 && lambda_r > 0.0 {
        let delta = (lambda_r - lambda_l).max(1e-12);
        if lambda_roe.abs() < delta {
            return 0.5 * (lambda_roe * lambda_roe / delta + delta);
        }
    }
    lambda_roe.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const G: f64 = 9.81;

    fn physical_normal_flux(law: &PhysicalFlux, u: &[f64], normal: (f64, f64)) -> Vec<f64> {
        let n = law.n_unknowns();
        let mut fx = vec![0.0; n];
        let mut fy = vec![0.0; n];
        law.flux(u, &mut fx, &mut fy);
        (0..n)
            .map(|k| fx[k] * normal.0 + fy[k] * normal.1)
            .collect()
    }

    fn edge_data<'a>(
        normal: (f64, f64),
        u_in: &'a [f64],
        fx_in: &'a [f64],
        fy_in: &'a [f64],
        u_out: &'a [f64],
        fx_out: &'a [f64],
        fy_out: &'a [f64],
    ) -> EdgeData<'a> {
        EdgeData {
            normal,
            u_in,
            fx_in,
            fy_in,
            u_out,
            fx_out,
            fy_out,
        }
    }

    #[test]
    fn test_zero_jump_reduces_to_physical_flux() {
        // Same state on both sides: every scheme must return F(q) . n.
        let law = PhysicalFlux::Shallow { g: G };
        let state = [2.0, 6.0, 2.0];
        let mut fx = [0.0; 3];
        let mut fy = [0.0; 3];
        law.flux(&state, &mut fx, &mut fy);
        let normal = (0.8, 0.6);
        let expected = physical_normal_flux(&law, &state, normal);

        let edge = edge_data(normal, &state, &fx, &fy, &state, &fx, &fy);
        for scheme in [
            RiemannScheme::LaxFriedrichs,
            RiemannScheme::Mean,
            RiemannScheme::Roe,
        ] {
            let mut phi = [0.0; 3];
            scheme.normal_flux(&law, &edge, &mut phi);
            for k in 0..3 {
                assert_relative_eq!(phi[k], expected[k], max_relative = 1e-12, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_lf_adds_upwind_dissipation() {
        let law = PhysicalFlux::Transport { ax: 1.0, ay: 0.0 };
        let u_in = [2.0];
        let u_out = [1.0];
        let fx_in = [2.0];
        let fx_out = [1.0];
        let fy = [0.0];
        let edge = edge_data((1.0, 0.0), &u_in, &fx_in, &fy, &u_out, &fx_out, &fy);

        let mut phi_lf = [0.0];
        let mut phi_mean = [0.0];
        RiemannScheme::LaxFriedrichs.normal_flux(&law, &edge, &mut phi_lf);
        RiemannScheme::Mean.normal_flux(&law, &edge, &mut phi_mean);

        // C = 1, jump = 1: LF = mean + 0.5
        assert_relative_eq!(phi_mean[0], 1.5);
        assert_relative_eq!(phi_lf[0], 2.0);
    }

    #[test]
    fn test_roe_matches_lf_on_still_water() {
        // Lake at rest: both schemes return the pressure flux g h^2 / 2.
        let law = PhysicalFlux::Shallow { g: G };
        let state = [1.5, 0.0, 0.0];
        let mut fx = [0.0; 3];
        let mut fy = [0.0; 3];
        law.flux(&state, &mut fx, &mut fy);
        let edge = edge_data((1.0, 0.0), &state, &fx, &fy, &state, &fx, &fy);

        let mut phi_roe = [0.0; 3];
        let mut phi_lf = [0.0; 3];
        RiemannScheme::Roe.normal_flux(&law, &edge, &mut phi_roe);
        RiemannScheme::LaxFriedrichs.normal_flux(&law, &edge, &mut phi_lf);
        for k in 0..3 {
            assert_relative_eq!(phi_roe[k], phi_lf[k], epsilon = 1e-12);
        }
        assert_relative_eq!(phi_roe[1], 0.5 * G * 1.5 * 1.5, max_relative = 1e-12);
    }

    #[test]
    fn test_roe_conservativity() {
        // F*(q_l, q_r; n) = -F*(q_r, q_l; -n)
        let law = PhysicalFlux::Shallow { g: G };
        let q_l = [2.0, 1.0, 0.3];
        let q_r = [1.0, 0.5, -0.2];
        let mut fx_l = [0.0; 3];
        let mut fy_l = [0.0; 3];
        let mut fx_r = [0.0; 3];
        let mut fy_r = [0.0; 3];
        law.flux(&q_l, &mut fx_l, &mut fy_l);
        law.flux(&q_r, &mut fx_r, &mut fy_r);

        let normal = (0.6, 0.8);
        let forward = edge_data(normal, &q_l, &fx_l, &fy_l, &q_r, &fx_r, &fy_r);
        let backward = edge_data(
            (-normal.0, -normal.1),
            &q_r,
            &fx_r,
            &fy_r,
            &q_l,
            &fx_l,
            &fy_l,
        );

        let mut phi_f = [0.0; 3];
        let mut phi_b = [0.0; 3];
        RiemannScheme::Roe.normal_flux(&law, &forward, &mut phi_f);
        RiemannScheme::Roe.normal_flux(&law, &backward, &mut phi_b);
        for k in 0..3 {
            assert_relative_eq!(phi_f[k], -phi_b[k], max_relative = 1e-10, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_entropy_fix_widens_transonic_eigenvalue() {
        assert_relative_eq!(entropy_fix(2.0, 1.0, 3.0), 2.0);
        assert_relative_eq!(entropy_fix(-2.0, -3.0, -1.0), 2.0);
        // straddling zero: fixed value exceeds |lambda|
        let fixed = entropy_fix(0.1, -1.0, 1.0);
        assert!(fixed > 0.1);
    }

    #[test]
    fn test_scheme_names() {
        assert_eq!(RiemannScheme::LaxFriedrichs.name(), "LF");
        assert_eq!(RiemannScheme::Roe.name(), "Roe");
        assert_eq!(RiemannScheme::Mean.name(), "mean");
    }
}
