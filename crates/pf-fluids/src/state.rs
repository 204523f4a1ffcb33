//! Flow context and pipe-state summaries.

use serde::{Deserialize, Serialize};

use pf_core::quantity::MassRateQty;
use pf_core::units::constants::EROSIONAL_C_SI;

use crate::error::{FluidError, FluidResult};
use crate::fluid::Fluid;

/// Resolved fluid and flow rate for one segment calculation.
///
/// The boundary pressure/temperature ride on the segment itself (pushed
/// there by propagation); this carries what the node-side editor resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidContext {
    pub fluid: Fluid,
    pub mass_flow: MassRateQty,
}

impl FluidContext {
    pub fn new(fluid: Fluid, mass_flow: MassRateQty) -> Self {
        Self { fluid, mass_flow }
    }

    /// Mass flow in kg/s; must be strictly positive to be usable.
    pub fn mass_flow_si(&self) -> FluidResult<f64> {
        let mdot = self.mass_flow.si();
        if mdot > 0.0 {
            Ok(mdot)
        } else {
            Err(FluidError::InsufficientInput { what: "mass flow" })
        }
    }
}

/// Thermodynamic state summary at a segment end. All values canonical SI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeState {
    /// Absolute pressure, Pa.
    pub pressure: f64,
    /// Temperature, K.
    pub temperature: f64,
    /// Density, kg/m^3.
    pub density: f64,
    /// Bulk velocity, m/s.
    pub velocity: f64,
    /// Erosional velocity threshold (API RP 14E), m/s.
    pub erosional_velocity: f64,
    /// Mach number; gas only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mach: Option<f64>,
    /// Speed of sound, m/s; gas only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_of_sound: Option<f64>,
    /// Flow momentum rho * v^2, Pa.
    pub momentum: f64,
}

impl PipeState {
    /// Assemble a state summary from pressure, temperature, density and
    /// velocity; derives the erosional threshold and momentum.
    pub fn from_flow(
        pressure: f64,
        temperature: f64,
        density: f64,
        velocity: f64,
        mach: Option<f64>,
        speed_of_sound: Option<f64>,
    ) -> Self {
        let erosional_velocity = if density > 0.0 {
            EROSIONAL_C_SI / density.sqrt()
        } else {
            0.0
        };
        Self {
            pressure,
            temperature,
            density,
            velocity,
            erosional_velocity,
            mach,
            speed_of_sound,
            momentum: density * velocity * velocity,
        }
    }
}
