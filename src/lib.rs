//! # dghyp
//!
//! A Discontinuous Galerkin solver for 2D hyperbolic conservation laws on
//! unstructured nodal meshes.
//!
//! The crate provides the physics-dispatch and numerical-integration engine:
//! - Physical-flux laws (scalar transport, shallow water, linearized
//!   shallow water, linearized acoustics)
//! - Initial/boundary-condition evaluators with per-problem legality
//! - Numerical fluxes (Lax-Friedrichs, Roe, central mean)
//! - Per-edge flux assembly into the surface-integral vector
//! - Explicit time integration (RK1/RK2/SSP-RK3/RK4) in weak or strong form
//! - Configuration loading with registry-based strategy resolution
//!
//! Mesh ingestion, global matrix assembly and on-disk serialization are
//! collaborator concerns consumed through the interfaces in [`mesh`],
//! [`linalg`] and [`output`].

pub mod boundary;
pub mod config;
pub mod equations;
pub mod flux;
pub mod linalg;
pub mod mesh;
pub mod output;
pub mod solver;
pub mod source;

// Re-export the main types for convenience.
pub use boundary::{BcContext, BoundaryCondition, BoundaryKind, BoundarySet, INIT_COND_GROUP};
pub use config::{
    BasisKind, ConfigError, Formulation, ProblemSpec, ProblemType, TimeScheme,
};
pub use equations::{PhysicalFlux, MAX_UNKNOWNS};
pub use flux::{assemble_surface_integral, RiemannScheme};
pub use linalg::{LinalgError, SparseMatrix, SystemMatrices};
pub use mesh::{EdgeSide, Element2D, NodalMesh2D};
pub use output::{MemorySink, OutputError, ResultSink, Snapshot, View};
pub use solver::{
    rk_step, Field, PartialField, ResidualOperator, RunPhase, RunReport, SolverError,
    TimeIntegrator, DIVERGENCE_LIMIT,
};
pub use source::{FrictionLaw, SourceTerm};
