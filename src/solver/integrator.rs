//! Explicit time integration of the semi-discrete system.
//!
//! The integrator owns the global state vector, drives the residual
//! operator through the selected Runge-Kutta scheme, checks the divergence
//! invariant after every full step and hands snapshots to the output
//! collaborator on the configured cadence.

use log::{debug, info};
use nalgebra::DVector;

use crate::boundary::BcContext;
use crate::config::{ProblemSpec, TimeScheme};
use crate::equations::MAX_UNKNOWNS;
use crate::linalg::SystemMatrices;
use crate::mesh::NodalMesh2D;
use crate::output::{write_snapshot, ResultSink};

use super::residual::ResidualOperator;
use super::{Field, PartialField, SolverError, DIVERGENCE_LIMIT};

// =============================================================================
// RK stepping
// =============================================================================

/// Add `a * x` into `y`, component by component.
fn axpy_all(y: &mut [DVector<f64>], a: f64, x: &[DVector<f64>]) {
    for (yk, xk) in y.iter_mut().zip(x) {
        yk.axpy(a, xk, 1.0);
    }
}

/// Scale every component of `y` by `c`.
fn scale_all(y: &mut [DVector<f64>], c: f64) {
    for yk in y.iter_mut() {
        *yk *= c;
    }
}

/// Advance `u` by one step of `scheme`.
///
/// `f` is the residual F(t, u); every stage receives the trial state and
/// the time offset of that stage:
/// - RK1: F(t, u)
/// - RK2 (midpoint): F(t, u), then F(t + dt/2, predictor)
/// - RK3 (SSP, Shu-Osher): F(t, u), F(t + dt, u1), F(t + dt/2, u2)
/// - RK4 (classical): F(t, u), F(t + dt/2, .), F(t + dt/2, .), F(t + dt, .)
pub fn rk_step<F>(
    scheme: TimeScheme,
    t: f64,
    dt: f64,
    u: &mut Vec<DVector<f64>>,
    f: &mut F,
) -> Result<(), SolverError>
where
    F: FnMut(f64, &[DVector<f64>]) -> Result<Vec<DVector<f64>>, SolverError>,
{
    match scheme {
        TimeScheme::Rk1 => {
            let k1 = f(t, u)?;
            axpy_all(u, dt, &k1);
        }
        TimeScheme::Rk2 => {
            let k1 = f(t, u)?;
            let mut mid = u.clone();
            axpy_all(&mut mid, 0.5 * dt, &k1);
            let k2 = f(t + 0.5 * dt, &mid)?;
            axpy_all(u, dt, &k2);
        }
        TimeScheme::Rk3 => {
            // u1 = u + dt F(t, u)
            let k = f(t, u)?;
            let mut u1 = u.clone();
            axpy_all(&mut u1, dt, &k);

            // u2 = 3/4 u + 1/4 u1 + 1/4 dt F(t + dt, u1)
            let k = f(t + dt, &u1)?;
            let mut u2 = u.clone();
            scale_all(&mut u2, 0.75);
            axpy_all(&mut u2, 0.25, &u1);
            axpy_all(&mut u2, 0.25 * dt, &k);

            // u = 1/3 u + 2/3 u2 + 2/3 dt F(t + dt/2, u2)
            let k = f(t + 0.5 * dt, &u2)?;
            scale_all(u, 1.0 / 3.0);
            axpy_all(u, 2.0 / 3.0, &u2);
            axpy_all(u, 2.0 / 3.0 * dt, &k);
        }
        TimeScheme::Rk4 => {
            let k1 = f(t, u)?;
            let mut trial = u.clone();
            axpy_all(&mut trial, 0.5 * dt, &k1);
            let k2 = f(t + 0.5 * dt, &trial)?;

            trial.clone_from(u);
            axpy_all(&mut trial, 0.5 * dt, &k2);
            let k3 = f(t + 0.5 * dt, &trial)?;

            trial.clone_from(u);
            axpy_all(&mut trial, dt, &k3);
            let k4 = f(t + dt, &trial)?;

            axpy_all(u, dt / 6.0, &k1);
            axpy_all(u, dt / 3.0, &k2);
            axpy_all(u, dt / 3.0, &k3);
            axpy_all(u, dt / 6.0, &k4);
        }
    }
    Ok(())
}

// =============================================================================
// Run state machine
// =============================================================================

/// Lifecycle of one integration run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Initialized,
    Stepping,
    Converged,
    Diverged,
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Number of full time steps taken.
    pub n_steps: usize,
    /// Physical time reached.
    pub final_time: f64,
    /// Snapshots handed to the output collaborator (step 0 included).
    pub n_snapshots: usize,
}

/// The time integrator: owns the global state and the scratch buffers for
/// the duration of one run.
#[derive(Debug)]
pub struct TimeIntegrator<'a> {
    spec: &'a ProblemSpec,
    mesh: &'a NodalMesh2D,
    residual: ResidualOperator<'a>,
    field: Field,
    partial: PartialField,
    u: Vec<DVector<f64>>,
    time: f64,
    phase: RunPhase,
}

impl<'a> TimeIntegrator<'a> {
    /// Bind a validated problem description to a mesh and the prebuilt
    /// global matrices.
    ///
    /// Fails if some physical group referenced by the mesh has no boundary
    /// condition.
    pub fn new(
        spec: &'a ProblemSpec,
        mesh: &'a NodalMesh2D,
        matrices: SystemMatrices,
    ) -> Result<Self, SolverError> {
        for group in mesh.boundary_groups() {
            if spec.boundaries.get(group).is_none() {
                return Err(SolverError::MissingBoundaryCondition {
                    group: group.to_string(),
                });
            }
        }

        let n_nodes = mesh.n_nodes();
        Ok(Self {
            spec,
            mesh,
            residual: ResidualOperator::new(spec, mesh, matrices),
            field: Field::new(spec.n_unknowns, n_nodes),
            partial: PartialField::new(),
            u: (0..spec.n_unknowns)
                .map(|_| DVector::zeros(n_nodes))
                .collect(),
            time: 0.0,
            phase: RunPhase::Idle,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Physical time reached so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The current solution, one vector per unknown.
    pub fn solution(&self) -> &[DVector<f64>] {
        &self.u
    }

    /// Seed the state from the `Init_Cond` evaluator at t = 0, register the
    /// output views and emit the step-0 snapshot.
    pub fn initialize(&mut self, sink: &mut dyn ResultSink) -> Result<(), SolverError> {
        let n_unknowns = self.spec.n_unknowns;
        let zeros = [0.0; MAX_UNKNOWNS];
        let mut seeded = [0.0; MAX_UNKNOWNS];

        for (i, &position) in self.mesh.coords.iter().enumerate() {
            let ctx = BcContext {
                time: 0.0,
                position,
                normal: (0.0, 0.0),
                interior: &zeros[..n_unknowns],
            };
            self.spec
                .boundaries
                .initial
                .evaluate(&ctx, &mut seeded[..n_unknowns]);
            for k in 0..n_unknowns {
                self.u[k][i] = seeded[k];
            }
        }

        for quantity in &self.spec.outputs {
            sink.add_view(quantity)
                .map_err(|source| SolverError::Output {
                    stage: "view registration",
                    source,
                })?;
        }
        self.emit_snapshot(0, sink)?;
        self.phase = RunPhase::Initialized;
        Ok(())
    }

    /// Run the configured number of steps, emitting snapshots on the write
    /// cadence, and ask the sink to persist after the last one.
    pub fn run(&mut self, sink: &mut dyn ResultSink) -> Result<RunReport, SolverError> {
        if self.phase == RunPhase::Idle {
            self.initialize(sink)?;
        }

        let dt = self.spec.time_step;
        let n_steps = (self.spec.sim_time / dt).floor() as usize;
        let write_every = ((self.spec.write_interval / dt).floor() as usize).max(1);
        let mut n_snapshots = 1;
        let mut current_decade = 0;

        info!(
            "integrating {} steps of {} (dt = {}, write every {} steps)",
            n_steps,
            self.spec.time_scheme.as_str(),
            dt,
            write_every
        );
        self.phase = RunPhase::Stepping;

        for step in 1..=n_steps {
            let ratio = 100 * (step - 1) / n_steps;
            if ratio >= current_decade {
                debug!("integrating: {ratio}% of the time steps done");
                current_decade = ratio + 1;
            }

            // Split borrows: the RHS closure uses the residual operator and
            // the scratch buffers, the stepper mutates the state.
            let TimeIntegrator {
                residual,
                field,
                partial,
                u,
                spec,
                time,
                ..
            } = self;
            let mut rhs =
                |t: f64, state: &[DVector<f64>]| residual.eval(t, state, field, partial);
            rk_step(spec.time_scheme, *time, dt, u, &mut rhs)?;
            self.time += dt;

            self.check_divergence(step)?;

            if step % write_every == 0 {
                self.emit_snapshot(step, sink)?;
                n_snapshots += 1;
            }
        }

        // Hand over the final state even when the cadence just missed it,
        // then ask for persistence.
        if n_steps % write_every != 0 {
            self.emit_snapshot(n_steps, sink)?;
            n_snapshots += 1;
        }
        sink.write().map_err(|source| SolverError::Output {
            stage: "final write",
            source,
        })?;

        self.phase = RunPhase::Converged;
        info!("integration finished at t = {}", self.time);
        Ok(RunReport {
            n_steps,
            final_time: self.time,
            n_snapshots,
        })
    }

    /// Enforce the bounded-magnitude invariant max(u) <= 1e5.
    fn check_divergence(&mut self, step: usize) -> Result<(), SolverError> {
        let mut max = f64::NEG_INFINITY;
        for component in &self.u {
            for &value in component.iter() {
                if !value.is_finite() {
                    max = f64::INFINITY;
                    break;
                }
                if value > max {
                    max = value;
                }
            }
        }
        if max > DIVERGENCE_LIMIT {
            self.phase = RunPhase::Diverged;
            return Err(SolverError::Diverged {
                step,
                time: self.time,
                max,
                limit: DIVERGENCE_LIMIT,
            });
        }
        Ok(())
    }

    fn emit_snapshot(&mut self, step: usize, sink: &mut dyn ResultSink) -> Result<(), SolverError> {
        write_snapshot(
            self.spec.problem,
            &self.spec.outputs,
            self.mesh,
            &self.u,
            step,
            self.time,
            sink,
        )
        .map_err(|source| SolverError::Output {
            stage: "snapshot",
            source,
        })
    }
}
