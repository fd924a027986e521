//! Residual evaluation and explicit time integration.

mod field;
mod integrator;
mod residual;

pub use field::{Field, PartialField};
pub use integrator::{rk_step, RunPhase, RunReport, TimeIntegrator};
pub use residual::ResidualOperator;

use thiserror::Error;

use crate::linalg::LinalgError;
use crate::output::OutputError;

/// Divergence bound on the solution maximum.
pub const DIVERGENCE_LIMIT: f64 = 1e5;

/// Runtime failures of the solver core.
///
/// Configuration problems never reach this type; they are caught at load
/// time. The divergence check is the only failure the core originates
/// itself; the remaining variants propagate collaborator errors with the
/// stage that was executing.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(
        "solution diverged at step {step} (t = {time:.6}): max(u) = {max:.3e} exceeds {limit:.0e}"
    )]
    Diverged {
        step: usize,
        time: f64,
        max: f64,
        limit: f64,
    },

    #[error("no boundary condition registered for physical group \"{group}\"")]
    MissingBoundaryCondition { group: String },

    #[error("linear-algebra failure during {stage}: {source}")]
    Linalg {
        stage: &'static str,
        #[source]
        source: LinalgError,
    },

    #[error("output failure during {stage}: {source}")]
    Output {
        stage: &'static str,
        #[source]
        source: OutputError,
    },
}
