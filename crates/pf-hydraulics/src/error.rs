//! Error types for hydraulic calculations.

use thiserror::Error;

/// Errors that can occur during hydraulic calculations.
///
/// None of these are fatal to a network traversal: the segment calculator
/// catches them at its boundary and degrades to undefined results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    #[error("Insufficient input: {what}")]
    InsufficientInput { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("No fitting loss data for {kind}")]
    UnknownFitting { kind: &'static str },
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;

impl From<pf_fluids::FluidError> for HydraulicsError {
    fn from(e: pf_fluids::FluidError) -> Self {
        match e {
            pf_fluids::FluidError::NonPhysical { what } => HydraulicsError::NonPhysical { what },
            pf_fluids::FluidError::InsufficientInput { what } => {
                HydraulicsError::InsufficientInput { what }
            }
        }
    }
}
