//! Numerical-flux (Riemann) schemes.
//!
//! A scheme combines the physical flux of the interior state and of the
//! outside state (neighbor element or boundary evaluator) into a single
//! edge-normal flux, using an edge-local stabilization parameter where the
//! scheme calls for one.
//!
//! All schemes are consistent: when both sides carry the same state the
//! stabilization term vanishes and the result is the physical normal flux.

mod assembly;
mod schemes;

pub use assembly::assemble_surface_integral;
pub use schemes::{EdgeData, RiemannScheme};
