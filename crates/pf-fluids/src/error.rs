//! Error types for fluid property evaluation.

use thiserror::Error;

/// Errors raised while resolving fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Insufficient fluid data: {what}")]
    InsufficientInput { what: &'static str },
}

pub type FluidResult<T> = Result<T, FluidError>;
