//! pf-network: network model, segment hydraulics and pressure propagation.
//!
//! The two library entry points the rest of the system builds on:
//!
//! - [`recalculate_segment`]: pure function from a segment plus its fluid
//!   context to a new segment with derived results populated (or cleared).
//! - [`propagate_pressure`]: breadth-first traversal from a source node,
//!   pushing boundary conditions through each outgoing segment and writing
//!   computed pressures/temperatures into downstream nodes, collecting
//!   warnings instead of failing.

pub mod error;
pub mod model;
pub mod propagate;
pub mod recalc;
pub mod results;
pub mod validate;

pub use error::{NetworkError, NetworkResult};
pub use model::{
    Boundary, Direction, GasFlowModel, Geometry, Network, Node, OrificeInput, Segment, SegmentKind,
    ValveInput,
};
pub use propagate::{PropagationOutcome, propagate_pressure};
pub use recalc::{HydraulicModels, recalculate_segment};
pub use results::{DropBreakdown, PressureDropResults, ResultSummary};
pub use validate::validate_network;
