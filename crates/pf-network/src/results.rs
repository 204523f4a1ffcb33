//! Derived calculation results.
//!
//! Fields that cannot be determined from the available inputs are `None`,
//! never silently zero; a zero means the value is genuinely zero (for
//! example pipe-length K of a zero-length segment). All pressure-like
//! values are canonical absolute pascals.

use serde::{Deserialize, Serialize};

use pf_fluids::PipeState;
use pf_hydraulics::FlowRegime;

/// Pressure drop contributions of one segment, Pa.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DropBreakdown {
    /// Friction plus fitting losses; `None` when the hydraulic context was
    /// insufficient to compute them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_and_fitting: Option<f64>,
    /// Hydrostatic drop rho g dz (negative for downhill runs).
    pub elevation: f64,
    /// Drop across a control valve.
    pub control_valve: f64,
    /// Drop across an orifice plate.
    pub orifice: f64,
    /// User-specified drop, added verbatim.
    pub user_specified: f64,
    /// Sum of the defined contributions.
    pub total: f64,
    /// Friction-and-fitting drop per equivalent length, Pa/m.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_unit_length: Option<f64>,
}

/// Full derived result set of a segment calculation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PressureDropResults {
    /// f L/D; zero for a zero-length segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_length_k: Option<f64>,
    /// Sum over the normalized fitting list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitting_k: Option<f64>,
    pub user_k: f64,
    pub safety_factor: f64,
    /// (pipe_length_k + fitting_k + user_k) * safety_factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reynolds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<FlowRegime>,
    pub drops: DropBreakdown,
    /// Choked-flow outlet pressure reported by the gas model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_critical_pressure: Option<f64>,
    /// Flow coefficient recomputed from an imposed valve drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_valve_cv: Option<f64>,
    /// Orifice plate loss coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orifice_k: Option<f64>,
}

/// Inlet/outlet thermodynamic state summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub inlet: PipeState,
    pub outlet: PipeState,
}
