//! Option registry: the legality tables of the configuration space.
//!
//! Every named option (boundary-condition type, numerical flux, source
//! term, output quantity) resolves through a per-problem-type table to a
//! typed value. A name outside the table for the given problem type is a
//! configuration error, never a fallback; lookup failure is the single
//! validation error path.

use crate::boundary::BoundaryKind;
use crate::flux::RiemannScheme;
use crate::source::FrictionLaw;

use super::ProblemType;

/// Boundary-condition vocabulary of a problem type.
pub fn boundary_table(problem: ProblemType) -> &'static [(&'static str, BoundaryKind)] {
    match problem {
        ProblemType::Transport => &[
            ("constant", BoundaryKind::Constant),
            ("sinusTransport", BoundaryKind::Sinus),
            ("gaussianTransport", BoundaryKind::Gaussian1DX),
            ("gaussian2DTransport", BoundaryKind::Gaussian2D),
            ("freeTransport", BoundaryKind::Free),
        ],
        ProblemType::Shallow => &[
            ("constant", BoundaryKind::Constant),
            ("affineShallow", BoundaryKind::Affine),
            ("sinusShallow", BoundaryKind::Sinus),
            ("sinusAffShallow", BoundaryKind::SinusAffine),
            ("reflectShallow", BoundaryKind::Reflect),
            ("gaussian2DShallow", BoundaryKind::Gaussian2D),
            ("gaussian1DShallowX", BoundaryKind::Gaussian1DX),
            ("gaussian1DShallowY", BoundaryKind::Gaussian1DY),
            ("openShallow", BoundaryKind::Free),
            ("openAffShallow", BoundaryKind::OpenAffine),
        ],
        ProblemType::ShallowLin => &[
            ("constant", BoundaryKind::Constant),
            ("sinusShallowLin", BoundaryKind::Sinus),
            ("reflectShallowLin", BoundaryKind::Reflect),
            ("gaussian2DShallowLin", BoundaryKind::Gaussian2D),
            ("gaussian1DShallowXLin", BoundaryKind::Gaussian1DX),
            ("gaussian1DShallowYLin", BoundaryKind::Gaussian1DY),
            ("openShallowLin", BoundaryKind::Free),
        ],
        ProblemType::AcousticLin => &[
            ("constant", BoundaryKind::Constant),
            ("sinusAcousticLin", BoundaryKind::Sinus),
            ("reflectAcousticLin", BoundaryKind::Reflect),
            ("gaussian2DAcousticLin", BoundaryKind::Gaussian2D),
            ("gaussian1DAcousticLinX", BoundaryKind::Gaussian1DX),
            ("gaussian1DAcousticLinY", BoundaryKind::Gaussian1DY),
            ("openAcousticLin", BoundaryKind::Free),
        ],
    }
}

/// Numerical-flux vocabulary of a problem type.
///
/// Lax-Friedrichs is always legal; the central mean needs a system whose
/// well-posedness survives without upwinding; Roe exists for the nonlinear
/// shallow-water characteristic structure only.
pub fn numerical_flux_table(problem: ProblemType) -> &'static [(&'static str, RiemannScheme)] {
    match problem {
        ProblemType::Transport => &[
            ("LF", RiemannScheme::LaxFriedrichs),
            ("mean", RiemannScheme::Mean),
        ],
        ProblemType::Shallow => &[
            ("LF", RiemannScheme::LaxFriedrichs),
            ("Roe", RiemannScheme::Roe),
        ],
        ProblemType::ShallowLin => &[
            ("LF", RiemannScheme::LaxFriedrichs),
            ("mean", RiemannScheme::Mean),
        ],
        ProblemType::AcousticLin => &[
            ("LF", RiemannScheme::LaxFriedrichs),
            ("mean", RiemannScheme::Mean),
        ],
    }
}

/// Source-term vocabulary of a problem type (`"no"` is always accepted and
/// handled by the loader before this table is consulted).
pub fn source_table(problem: ProblemType) -> &'static [(&'static str, FrictionLaw)] {
    match problem {
        ProblemType::Shallow => &[
            ("sourceShallowCstGradCstFrict", FrictionLaw::Linear),
            ("sourceShallowCstGradQuadFrict", FrictionLaw::Quadratic),
        ],
        _ => &[],
    }
}

/// Output-quantity vocabulary of a problem type.
pub fn output_table(problem: ProblemType) -> &'static [&'static str] {
    match problem {
        ProblemType::Transport => &["u"],
        ProblemType::Shallow | ProblemType::ShallowLin => &["H", "u", "v", "sKE", "vField"],
        ProblemType::AcousticLin => &["p'", "u'", "v'", "sKE'", "vField'"],
    }
}

/// Look up `name` in a `(name, value)` table.
pub fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, value)| value)
}
