//! pf-hydraulics: pure hydraulic physics for pipeflow.
//!
//! Provides:
//! - friction: Reynolds number, Darcy friction factor, flow regime
//! - fittings: K-factor lookup seam, swage normalization, loss summation
//! - valve: control-valve Cv sizing (bidirectional)
//! - orifice: sharp-edged plate loss coefficient
//! - gas: compressible pipe-flow solvers (isothermal, adiabatic/Fanno)
//!
//! Everything here is stateless and synchronous; iterative solvers are
//! bounded so termination is guaranteed.

pub mod error;
pub mod fittings;
pub mod friction;
pub mod gas;
pub mod orifice;
pub mod valve;

pub use error::{HydraulicsError, HydraulicsResult};
pub use fittings::{
    CraneFittingModel, Fitting, FittingAggregation, FittingContext, FittingKind, FittingLossModel,
    normalize_swages,
};
pub use friction::{FlowRegime, flow_area, friction_factor, mean_velocity, reynolds_number};
pub use gas::{
    AdiabaticPipeFlow, CompressibleSolver, GasEndState, GasSolution, GasSolveInput,
    IsothermalPipeFlow,
};
pub use orifice::{orifice_k, orifice_pressure_drop};
pub use valve::{cv_from_pressure_drop, pressure_drop_from_cv};
