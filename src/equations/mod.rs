//! Physical-flux laws, one per problem type.

mod physical_flux;

pub use physical_flux::{PhysicalFlux, MAX_UNKNOWNS};
