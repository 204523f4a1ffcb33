//! pf-fluids: fluid description and flow-state summaries for pipeflow.
//!
//! Provides:
//! - `Fluid`: liquid/gas sum type with tagged-quantity properties
//! - `FluidContext`: resolved fluid + mass flow for one calculation
//! - `PipeState`: inlet/outlet thermodynamic state summary

pub mod error;
pub mod fluid;
pub mod state;

pub use error::{FluidError, FluidResult};
pub use fluid::Fluid;
pub use state::{FluidContext, PipeState};
