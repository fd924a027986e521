//! Mesh and geometry interface consumed by the solver.

mod mesh2d;

pub use mesh2d::{EdgeSide, Element2D, NodalMesh2D};
