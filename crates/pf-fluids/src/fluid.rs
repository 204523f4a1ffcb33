//! Fluid description as a sum type.
//!
//! A node's fluid is either a liquid (density + viscosity) or a gas
//! (molar mass, compressibility factor, heat-capacity ratio, viscosity).
//! Liquid-only fields cannot appear on a gas by construction.

use serde::{Deserialize, Serialize};

use pf_core::quantity::{DensityQty, MolarMassQty, ViscosityQty};
use pf_core::units::constants::R_UNIVERSAL;

use crate::error::{FluidError, FluidResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Fluid {
    Liquid {
        density: DensityQty,
        viscosity: ViscosityQty,
    },
    Gas {
        molar_mass: MolarMassQty,
        z_factor: f64,
        heat_capacity_ratio: f64,
        viscosity: ViscosityQty,
    },
}

impl Fluid {
    pub fn is_gas(&self) -> bool {
        matches!(self, Fluid::Gas { .. })
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self, Fluid::Liquid { .. })
    }

    /// Dynamic viscosity in Pa s.
    pub fn viscosity_si(&self) -> FluidResult<f64> {
        let mu = match self {
            Fluid::Liquid { viscosity, .. } => viscosity.si(),
            Fluid::Gas { viscosity, .. } => viscosity.si(),
        };
        if mu > 0.0 {
            Ok(mu)
        } else {
            Err(FluidError::InsufficientInput { what: "viscosity" })
        }
    }

    /// Density in kg/m^3 at the given absolute pressure (Pa) and
    /// temperature (K). Liquids are incompressible; gases use P M / (Z R T).
    pub fn density_at(&self, pressure_pa: f64, temperature_k: f64) -> FluidResult<f64> {
        match self {
            Fluid::Liquid { density, .. } => {
                let rho = density.si();
                if rho > 0.0 {
                    Ok(rho)
                } else {
                    Err(FluidError::InsufficientInput { what: "density" })
                }
            }
            Fluid::Gas {
                molar_mass,
                z_factor,
                ..
            } => {
                let m = molar_mass.si();
                if m <= 0.0 {
                    return Err(FluidError::InsufficientInput { what: "molar mass" });
                }
                if *z_factor <= 0.0 {
                    return Err(FluidError::InsufficientInput { what: "Z factor" });
                }
                if pressure_pa <= 0.0 {
                    return Err(FluidError::NonPhysical { what: "pressure" });
                }
                if temperature_k <= 0.0 {
                    return Err(FluidError::NonPhysical { what: "temperature" });
                }
                Ok(pressure_pa * m / (z_factor * R_UNIVERSAL * temperature_k))
            }
        }
    }

    /// Speed of sound in m/s at the given temperature (gas only):
    /// a = sqrt(gamma Z R T / M).
    pub fn speed_of_sound(&self, temperature_k: f64) -> FluidResult<f64> {
        match self {
            Fluid::Liquid { .. } => Err(FluidError::NonPhysical {
                what: "speed of sound requested for a liquid",
            }),
            Fluid::Gas {
                molar_mass,
                z_factor,
                heat_capacity_ratio,
                ..
            } => {
                let m = molar_mass.si();
                if m <= 0.0 || *z_factor <= 0.0 || *heat_capacity_ratio <= 1.0 {
                    return Err(FluidError::InsufficientInput {
                        what: "gas properties",
                    });
                }
                if temperature_k <= 0.0 {
                    return Err(FluidError::NonPhysical { what: "temperature" });
                }
                Ok((heat_capacity_ratio * z_factor * R_UNIVERSAL * temperature_k / m).sqrt())
            }
        }
    }
}
