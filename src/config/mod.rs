//! Run configuration: parsing, validation and strategy resolution.
//!
//! The parameter file is a two-section JSON tree (`general` + `physics`).
//! Loading resolves every named option to one concrete strategy (flux law,
//! Riemann scheme, boundary evaluators, source term, output quantities)
//! through the registry in [`registry`], and validates every coefficient
//! vector length. Any failure aborts the load before anything is committed;
//! the returned [`ProblemSpec`] is immutable for the rest of the run.

pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::boundary::{BoundaryCondition, BoundarySet, INIT_COND_GROUP};
use crate::equations::PhysicalFlux;
use crate::flux::RiemannScheme;
use crate::source::SourceTerm;

// =============================================================================
// Enumerations
// =============================================================================

/// The supported conservation-law systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemType {
    Transport,
    Shallow,
    ShallowLin,
    AcousticLin,
}

impl ProblemType {
    /// Configuration-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Transport => "transport",
            ProblemType::Shallow => "shallow",
            ProblemType::ShallowLin => "shallowLin",
            ProblemType::AcousticLin => "acousticLin",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "transport" => Some(ProblemType::Transport),
            "shallow" => Some(ProblemType::Shallow),
            "shallowLin" => Some(ProblemType::ShallowLin),
            "acousticLin" => Some(ProblemType::AcousticLin),
            _ => None,
        }
    }

    /// Number of evolved unknowns.
    pub fn n_unknowns(&self) -> usize {
        match self {
            ProblemType::Transport => 1,
            _ => 3,
        }
    }

    /// Mandated flux-coefficient count.
    pub fn n_flux_coefficients(&self) -> usize {
        match self {
            ProblemType::Shallow => 1,
            ProblemType::ShallowLin | ProblemType::Transport => 2,
            ProblemType::AcousticLin => 4,
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weak or strong DG formulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formulation {
    Weak,
    Strong,
}

impl Formulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formulation::Weak => "weak",
            Formulation::Strong => "strong",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "weak" => Some(Formulation::Weak),
            "strong" => Some(Formulation::Strong),
            _ => None,
        }
    }
}

/// Explicit time-integration scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeScheme {
    /// Explicit Euler.
    Rk1,
    /// Midpoint predictor-corrector.
    Rk2,
    /// Strong-stability-preserving RK3 (Shu-Osher form).
    Rk3,
    /// Classical four-stage RK4.
    Rk4,
}

impl TimeScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScheme::Rk1 => "RK1",
            TimeScheme::Rk2 => "RK2",
            TimeScheme::Rk3 => "RK3",
            TimeScheme::Rk4 => "RK4",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "RK1" => Some(TimeScheme::Rk1),
            "RK2" => Some(TimeScheme::Rk2),
            "RK3" => Some(TimeScheme::Rk3),
            "RK4" => Some(TimeScheme::Rk4),
            _ => None,
        }
    }

    /// Formal order of accuracy.
    pub fn order(&self) -> usize {
        match self {
            TimeScheme::Rk1 => 1,
            TimeScheme::Rk2 => 2,
            TimeScheme::Rk3 => 3,
            TimeScheme::Rk4 => 4,
        }
    }

    /// Number of residual evaluations per step.
    pub fn n_stages(&self) -> usize {
        self.order()
    }
}

/// Nodal basis family announced to the matrix-builder collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasisKind {
    Lagrange,
    Isoparametric,
}

impl BasisKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "Lagrange" => Some(BasisKind::Lagrange),
            "Isoparametric" => Some(BasisKind::Isoparametric),
            _ => None,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration-load failure. All variants are detected before any
/// time-stepping state is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read parameter file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter file {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected {field} \"{value}\" in parameter file {file}")]
    UnknownValue {
        field: &'static str,
        value: String,
        file: String,
    },

    #[error(
        "Unhandled {kind} \"{value}\" for problem type {problem} in parameter file {file}"
    )]
    IllegalOption {
        kind: &'static str,
        value: String,
        problem: ProblemType,
        file: String,
    },

    #[error("Unexpected number of flux coefficients ({got}) for problem type {problem}")]
    FluxCoefficientCount { got: usize, problem: ProblemType },

    #[error(
        "Unexpected number of source term coefficients ({got}) for source \"{kind}\" (expected {expected})"
    )]
    SourceCoefficientCount {
        kind: String,
        expected: usize,
        got: usize,
    },

    #[error(
        "Unexpected number of coefficients ({got}) for boundary condition \"{kind}\" on physical group {group} (expected {expected})"
    )]
    BoundaryCoefficientCount {
        group: String,
        kind: String,
        expected: usize,
        got: usize,
    },

    #[error("no initial condition: parameter file {file} has no \"Init_Cond\" entry")]
    MissingInitialCondition { file: String },

    #[error("physical group {group} appears more than once in parameter file {file}")]
    DuplicateGroup { group: String, file: String },
}

// =============================================================================
// Raw file layout
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawConfig {
    general: RawGeneral,
    physics: RawPhysics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeneral {
    space_integration_type: String,
    basis_function_type: String,
    time_integration_type: String,
    solver_type: String,
    simulation_time: f64,
    time_step: f64,
    time_to_write: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPhysics {
    problem_type: String,
    what_to_write: Vec<String>,
    numerical_flux: String,
    flux_coefficients: Vec<f64>,
    source_terms: String,
    #[serde(default)]
    source_coefficients: Vec<f64>,
    initial_boundary_conditions: Vec<RawBoundaryCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoundaryCondition {
    physical_group: String,
    #[serde(rename = "type")]
    kind: String,
    coefficients: Vec<f64>,
}

// =============================================================================
// ProblemSpec
// =============================================================================

/// The fully resolved, immutable run description.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemSpec {
    pub problem: ProblemType,
    pub n_unknowns: usize,
    pub formulation: Formulation,
    pub time_scheme: TimeScheme,
    /// Spatial quadrature selector, e.g. "Gauss5" (consumed by the
    /// matrix-builder collaborators).
    pub space_integration: String,
    pub basis: BasisKind,
    pub sim_time: f64,
    pub time_step: f64,
    pub write_interval: f64,
    /// Resolved physical-flux law carrying the flux coefficients.
    pub law: PhysicalFlux,
    pub riemann: RiemannScheme,
    pub source: Option<SourceTerm>,
    pub boundaries: BoundarySet,
    /// Validated output selectors, in file order.
    pub outputs: Vec<String>,
}

impl ProblemSpec {
    /// Load and validate a parameter file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            file: file.clone(),
            source,
        })?;
        Self::from_json(&text, &file)
    }

    /// Validate an in-memory parameter tree. `file` only labels error
    /// messages.
    pub fn from_json(text: &str, file: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            file: file.to_string(),
            source,
        })?;
        let spec = Self::resolve(raw, file)?;

        info!(
            "loaded {}: {} / {} / {} form / {} flux / source {}",
            file,
            spec.problem,
            spec.time_scheme.as_str(),
            spec.formulation.as_str(),
            spec.riemann.name(),
            spec.source.as_ref().map_or("no", |s| s.name()),
        );
        info!(
            "simulation time {} s, step {} s, write every {} s",
            spec.sim_time, spec.time_step, spec.write_interval
        );

        Ok(spec)
    }

    fn resolve(raw: RawConfig, file: &str) -> Result<Self, ConfigError> {
        let general = raw.general;

        // -- general section ---------------------------------------------
        let space = general.space_integration_type;
        let digits = space.strip_prefix("Gauss");
        if !digits.is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())) {
            return Err(ConfigError::UnknownValue {
                field: "space integration type",
                value: space,
                file: file.to_string(),
            });
        }

        let basis = BasisKind::parse(&general.basis_function_type).ok_or_else(|| {
            ConfigError::UnknownValue {
                field: "basis function type",
                value: general.basis_function_type.clone(),
                file: file.to_string(),
            }
        })?;

        let time_scheme = TimeScheme::parse(&general.time_integration_type).ok_or_else(|| {
            ConfigError::UnknownValue {
                field: "time integration type",
                value: general.time_integration_type.clone(),
                file: file.to_string(),
            }
        })?;

        let formulation = Formulation::parse(&general.solver_type).ok_or_else(|| {
            ConfigError::UnknownValue {
                field: "solver type",
                value: general.solver_type.clone(),
                file: file.to_string(),
            }
        })?;

        // -- physics section ---------------------------------------------
        let physics = raw.physics;
        let problem = ProblemType::parse(&physics.problem_type).ok_or_else(|| {
            ConfigError::UnknownValue {
                field: "problem type",
                value: physics.problem_type.clone(),
                file: file.to_string(),
            }
        })?;

        let mut outputs = Vec::with_capacity(physics.what_to_write.len());
        for quantity in physics.what_to_write {
            if !registry::output_table(problem).contains(&quantity.as_str()) {
                return Err(ConfigError::IllegalOption {
                    kind: "output quantity",
                    value: quantity,
                    problem,
                    file: file.to_string(),
                });
            }
            outputs.push(quantity);
        }

        let riemann = registry::lookup(
            registry::numerical_flux_table(problem),
            &physics.numerical_flux,
        )
        .ok_or_else(|| ConfigError::IllegalOption {
            kind: "numerical flux",
            value: physics.numerical_flux.clone(),
            problem,
            file: file.to_string(),
        })?;

        let law = resolve_law(problem, &physics.flux_coefficients)?;

        let source = resolve_source(
            problem,
            &physics.source_terms,
            &physics.source_coefficients,
            file,
        )?;

        let boundaries = resolve_boundaries(
            problem,
            physics.initial_boundary_conditions,
            file,
        )?;

        Ok(ProblemSpec {
            problem,
            n_unknowns: problem.n_unknowns(),
            formulation,
            time_scheme,
            space_integration: space,
            basis,
            sim_time: general.simulation_time,
            time_step: general.time_step,
            write_interval: general.time_to_write,
            law,
            riemann,
            source,
            boundaries,
            outputs,
        })
    }
}

/// Build the flux law from the per-problem coefficient vector.
fn resolve_law(problem: ProblemType, coeffs: &[f64]) -> Result<PhysicalFlux, ConfigError> {
    if coeffs.len() != problem.n_flux_coefficients() {
        return Err(ConfigError::FluxCoefficientCount {
            got: coeffs.len(),
            problem,
        });
    }
    Ok(match problem {
        ProblemType::Transport => PhysicalFlux::Transport {
            ax: coeffs[0],
            ay: coeffs[1],
        },
        ProblemType::Shallow => PhysicalFlux::Shallow { g: coeffs[0] },
        ProblemType::ShallowLin => PhysicalFlux::ShallowLin {
            g: coeffs[0],
            h0: coeffs[1],
        },
        ProblemType::AcousticLin => PhysicalFlux::AcousticLin {
            rho: coeffs[0],
            c0: coeffs[1],
            u0: coeffs[2],
            v0: coeffs[3],
        },
    })
}

fn resolve_source(
    problem: ProblemType,
    kind: &str,
    coeffs: &[f64],
    file: &str,
) -> Result<Option<SourceTerm>, ConfigError> {
    if kind == "no" {
        return Ok(None);
    }
    let friction = registry::lookup(registry::source_table(problem), kind).ok_or_else(|| {
        ConfigError::IllegalOption {
            kind: "source term",
            value: kind.to_string(),
            problem,
            file: file.to_string(),
        }
    })?;
    if coeffs.len() != SourceTerm::N_COEFFICIENTS {
        return Err(ConfigError::SourceCoefficientCount {
            kind: kind.to_string(),
            expected: SourceTerm::N_COEFFICIENTS,
            got: coeffs.len(),
        });
    }
    let mut fixed = [0.0; SourceTerm::N_COEFFICIENTS];
    fixed.copy_from_slice(coeffs);
    Ok(Some(SourceTerm {
        friction,
        coeffs: fixed,
    }))
}

fn resolve_boundaries(
    problem: ProblemType,
    raw: Vec<RawBoundaryCondition>,
    file: &str,
) -> Result<BoundarySet, ConfigError> {
    let mut by_group: HashMap<String, BoundaryCondition> = HashMap::new();
    let mut initial: Option<BoundaryCondition> = None;
    let mut n_bcs = 0usize;

    for entry in raw {
        let kind = registry::lookup(registry::boundary_table(problem), &entry.kind).ok_or_else(
            || ConfigError::IllegalOption {
                kind: "boundary condition type",
                value: entry.kind.clone(),
                problem,
                file: file.to_string(),
            },
        )?;

        let expected = kind.n_coefficients(problem.n_unknowns());
        if entry.coefficients.len() != expected {
            return Err(ConfigError::BoundaryCoefficientCount {
                group: entry.physical_group,
                kind: entry.kind,
                expected,
                got: entry.coefficients.len(),
            });
        }

        let condition = BoundaryCondition {
            kind,
            coeffs: entry.coefficients,
        };

        if entry.physical_group == INIT_COND_GROUP {
            if initial.is_some() {
                return Err(ConfigError::DuplicateGroup {
                    group: entry.physical_group,
                    file: file.to_string(),
                });
            }
            initial = Some(condition);
        } else {
            if by_group.insert(entry.physical_group.clone(), condition).is_some() {
                return Err(ConfigError::DuplicateGroup {
                    group: entry.physical_group,
                    file: file.to_string(),
                });
            }
            n_bcs += 1;
        }
    }

    let initial = initial.ok_or_else(|| ConfigError::MissingInitialCondition {
        file: file.to_string(),
    })?;

    info!(
        "initial condition present and {} boundary conditions present in file {}",
        n_bcs, file
    );

    Ok(BoundarySet { by_group, initial })
}
