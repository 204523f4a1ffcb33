//! Compressible pipe-flow boundary-value solvers.
//!
//! Given the inlet state, mass flow and total flow resistance of a pipe
//! run, these solve for the outlet state. Two models:
//!
//! - `IsothermalPipeFlow`: constant temperature; momentum balance
//!   P1^2 - P2^2 = G^2 c^2 (R + 2 ln(P1/P2)) with c^2 = Z R_u T / M,
//!   solved by bisection on the outlet pressure.
//! - `AdiabaticPipeFlow`: Fanno flow; resistance balances the Fanno
//!   function between inlet and outlet Mach numbers, solved by bisection
//!   on the outlet Mach number.
//!
//! Both fail with `NonPhysical` when no subsonic solution exists (the
//! imposed mass flow exceeds the choked capacity of the run).

use pf_core::units::constants::R_UNIVERSAL;

use crate::error::{HydraulicsError, HydraulicsResult};
use crate::friction::flow_area;

const BISECTION_MAX_ITER: usize = 200;
const BISECTION_REL_TOL: f64 = 1e-10;

/// Inlet conditions and geometry for one compressible solve.
///
/// The caller resolves flow direction before building this: `pressure`
/// and `temperature` are always the hydraulic inlet values.
#[derive(Debug, Clone, Copy)]
pub struct GasSolveInput {
    /// Inlet absolute pressure, Pa.
    pub inlet_pressure: f64,
    /// Inlet temperature, K.
    pub inlet_temperature: f64,
    /// Mass flow, kg/s.
    pub mass_flow: f64,
    /// Inner diameter, m.
    pub diameter: f64,
    /// Pipe length, m.
    pub length: f64,
    /// Darcy friction factor.
    pub friction_factor: f64,
    /// Fitting + user K, added to f L/D.
    pub total_k: f64,
    /// Molar mass, kg/mol.
    pub molar_mass: f64,
    /// Compressibility factor.
    pub z_factor: f64,
    /// Heat-capacity ratio gamma.
    pub heat_capacity_ratio: f64,
}

impl GasSolveInput {
    fn validate(&self) -> HydraulicsResult<()> {
        if self.inlet_pressure <= 0.0 {
            return Err(HydraulicsError::InsufficientInput {
                what: "inlet pressure",
            });
        }
        if self.inlet_temperature <= 0.0 {
            return Err(HydraulicsError::InsufficientInput {
                what: "inlet temperature",
            });
        }
        if self.mass_flow <= 0.0 {
            return Err(HydraulicsError::InsufficientInput { what: "mass flow" });
        }
        if self.diameter <= 0.0 {
            return Err(HydraulicsError::InsufficientInput { what: "diameter" });
        }
        if self.molar_mass <= 0.0 || self.z_factor <= 0.0 {
            return Err(HydraulicsError::InsufficientInput {
                what: "gas properties",
            });
        }
        if self.heat_capacity_ratio <= 1.0 {
            return Err(HydraulicsError::NonPhysical {
                what: "heat-capacity ratio",
            });
        }
        if self.length < 0.0 || self.friction_factor < 0.0 || self.total_k < 0.0 {
            return Err(HydraulicsError::NonPhysical {
                what: "flow resistance",
            });
        }
        Ok(())
    }

    /// Total resistance f L/D + K.
    fn resistance(&self) -> f64 {
        let pipe = if self.length > 0.0 {
            self.friction_factor * self.length / self.diameter
        } else {
            0.0
        };
        pipe + self.total_k
    }

    /// Mass flux G = mdot / A, kg/(m^2 s).
    fn mass_flux(&self) -> f64 {
        self.mass_flow / flow_area(self.diameter)
    }

    /// Specific gas constant Z R_u / M, J/(kg K).
    fn gas_constant(&self) -> f64 {
        self.z_factor * R_UNIVERSAL / self.molar_mass
    }
}

/// Gas state at one end of the run, canonical SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasEndState {
    pub pressure: f64,
    pub temperature: f64,
    pub density: f64,
    pub velocity: f64,
    pub mach: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSolution {
    pub inlet: GasEndState,
    pub outlet: GasEndState,
    /// Outlet pressure at which the run chokes, when the model defines one.
    pub critical_pressure: Option<f64>,
}

/// Boundary-value solver seam; implementations must be bounded and
/// synchronous.
pub trait CompressibleSolver {
    fn solve(&self, input: &GasSolveInput) -> HydraulicsResult<GasSolution>;
}

fn end_state(p: f64, t: f64, g: f64, rg: f64, gamma: f64) -> GasEndState {
    let density = p / (rg * t);
    let velocity = g / density;
    let a = (gamma * rg * t).sqrt();
    GasEndState {
        pressure: p,
        temperature: t,
        density,
        velocity,
        mach: velocity / a,
    }
}

/// Isothermal compressible flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsothermalPipeFlow;

impl CompressibleSolver for IsothermalPipeFlow {
    fn solve(&self, input: &GasSolveInput) -> HydraulicsResult<GasSolution> {
        input.validate()?;

        let g = input.mass_flux();
        let rg = input.gas_constant();
        let t = input.inlet_temperature;
        let gamma = input.heat_capacity_ratio;
        let p1 = input.inlet_pressure;
        let c2 = rg * t; // isothermal wave speed squared
        let resistance = input.resistance();

        let inlet = end_state(p1, t, g, rg, gamma);

        // Choking at v = sqrt(c^2): density G/c, pressure G c.
        let p_crit = g * c2.sqrt();
        if p_crit >= p1 {
            return Err(HydraulicsError::NonPhysical {
                what: "inlet velocity at or above the isothermal wave speed",
            });
        }

        if resistance == 0.0 {
            return Ok(GasSolution {
                inlet,
                outlet: inlet,
                critical_pressure: Some(p_crit),
            });
        }

        // residual(p2) = P1^2 - P2^2 - G^2 c^2 (R + 2 ln(P1/P2)).
        let residual =
            |p2: f64| p1 * p1 - p2 * p2 - g * g * c2 * (resistance + 2.0 * (p1 / p2).ln());

        if residual(p_crit) < 0.0 {
            // Even at the choke limit the run cannot pass this flow.
            return Err(HydraulicsError::NonPhysical {
                what: "mass flow exceeds isothermal choked capacity",
            });
        }

        let p2 = bisect(residual, p_crit, p1, p1 * BISECTION_REL_TOL)?;
        let outlet = end_state(p2, t, g, rg, gamma);

        Ok(GasSolution {
            inlet,
            outlet,
            critical_pressure: Some(p_crit),
        })
    }
}

/// Adiabatic (Fanno) compressible flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdiabaticPipeFlow;

impl AdiabaticPipeFlow {
    /// Fanno function: resistance remaining to the sonic point at Mach m.
    fn fanno(m: f64, gamma: f64) -> f64 {
        let m2 = m * m;
        (1.0 - m2) / (gamma * m2)
            + (gamma + 1.0) / (2.0 * gamma)
                * ((gamma + 1.0) * m2 / (2.0 + (gamma - 1.0) * m2)).ln()
    }
}

impl CompressibleSolver for AdiabaticPipeFlow {
    fn solve(&self, input: &GasSolveInput) -> HydraulicsResult<GasSolution> {
        input.validate()?;

        let g = input.mass_flux();
        let rg = input.gas_constant();
        let gamma = input.heat_capacity_ratio;
        let t1 = input.inlet_temperature;
        let p1 = input.inlet_pressure;
        let resistance = input.resistance();

        let inlet = end_state(p1, t1, g, rg, gamma);
        let m1 = inlet.mach;
        if m1 >= 1.0 {
            return Err(HydraulicsError::NonPhysical {
                what: "supersonic inlet",
            });
        }

        // Fanno pressure at the sonic point, from P/P* at the inlet.
        let p_star = p1 * m1 * ((2.0 + (gamma - 1.0) * m1 * m1) / (gamma + 1.0)).sqrt();

        if resistance == 0.0 {
            return Ok(GasSolution {
                inlet,
                outlet: inlet,
                critical_pressure: Some(p_star),
            });
        }

        let available = Self::fanno(m1, gamma);
        if resistance > available {
            return Err(HydraulicsError::NonPhysical {
                what: "flow resistance exceeds the Fanno choking limit",
            });
        }

        // fanno(m1) - fanno(m2) = resistance, m2 in (m1, 1].
        // Oriented so the residual is positive at the lower bound.
        let residual = |m2: f64| Self::fanno(m2, gamma) + resistance - available;
        let m2 = bisect(residual, m1, 1.0, 1e-12)?;

        let ratio = (2.0 + (gamma - 1.0) * m1 * m1) / (2.0 + (gamma - 1.0) * m2 * m2);
        let t2 = t1 * ratio;
        let p2 = p1 * (m1 / m2) * ratio.sqrt();
        let outlet = end_state(p2, t2, g, rg, gamma);

        Ok(GasSolution {
            inlet,
            outlet,
            critical_pressure: Some(p_star),
        })
    }
}

/// Bisection on a residual with residual(lo) and residual(hi) of opposite
/// sign (residual(hi) <= 0 <= residual(lo) here). Bounded iteration count.
fn bisect<F: Fn(f64) -> f64>(residual: F, lo: f64, hi: f64, tol: f64) -> HydraulicsResult<f64> {
    let mut lo = lo;
    let mut hi = hi;
    for _ in 0..BISECTION_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let r = residual(mid);
        if !r.is_finite() {
            return Err(HydraulicsError::ConvergenceFailed {
                what: "non-finite residual in compressible solve",
            });
        }
        if (hi - lo).abs() < tol {
            return Ok(mid);
        }
        if r > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methane_input() -> GasSolveInput {
        GasSolveInput {
            inlet_pressure: 500_000.0,
            inlet_temperature: 288.15,
            mass_flow: 0.5,
            diameter: 0.1,
            length: 200.0,
            friction_factor: 0.018,
            total_k: 2.0,
            molar_mass: 0.016_04,
            z_factor: 0.98,
            heat_capacity_ratio: 1.31,
        }
    }

    #[test]
    fn isothermal_pressure_falls_downstream() {
        let sol = IsothermalPipeFlow.solve(&methane_input()).unwrap();
        assert!(sol.outlet.pressure < sol.inlet.pressure);
        assert!(sol.outlet.velocity > sol.inlet.velocity);
        assert_eq!(sol.outlet.temperature, sol.inlet.temperature);
        assert!(sol.critical_pressure.unwrap() < sol.outlet.pressure);
    }

    #[test]
    fn isothermal_satisfies_momentum_balance() {
        let input = methane_input();
        let sol = IsothermalPipeFlow.solve(&input).unwrap();
        let g = input.mass_flow / flow_area(input.diameter);
        let c2 = input.z_factor * R_UNIVERSAL / input.molar_mass * input.inlet_temperature;
        let r = input.friction_factor * input.length / input.diameter + input.total_k;
        let p1 = sol.inlet.pressure;
        let p2 = sol.outlet.pressure;
        let lhs = p1 * p1 - p2 * p2;
        let rhs = g * g * c2 * (r + 2.0 * (p1 / p2).ln());
        assert!((lhs - rhs).abs() < 1e-6 * lhs, "lhs {lhs} rhs {rhs}");
    }

    #[test]
    fn isothermal_zero_resistance_is_identity() {
        let input = GasSolveInput {
            length: 0.0,
            total_k: 0.0,
            ..methane_input()
        };
        let sol = IsothermalPipeFlow.solve(&input).unwrap();
        assert_eq!(sol.inlet, sol.outlet);
    }

    #[test]
    fn isothermal_rejects_excess_flow() {
        let input = GasSolveInput {
            mass_flow: 500.0,
            ..methane_input()
        };
        assert!(matches!(
            IsothermalPipeFlow.solve(&input),
            Err(HydraulicsError::NonPhysical { .. })
        ));
    }

    #[test]
    fn adiabatic_mach_rises_and_temperature_falls() {
        let sol = AdiabaticPipeFlow.solve(&methane_input()).unwrap();
        assert!(sol.outlet.mach > sol.inlet.mach);
        assert!(sol.outlet.mach < 1.0);
        assert!(sol.outlet.temperature < sol.inlet.temperature);
        assert!(sol.outlet.pressure < sol.inlet.pressure);
    }

    #[test]
    fn adiabatic_resistance_matches_fanno_difference() {
        let input = methane_input();
        let sol = AdiabaticPipeFlow.solve(&input).unwrap();
        let gamma = input.heat_capacity_ratio;
        let r = input.friction_factor * input.length / input.diameter + input.total_k;
        let diff =
            AdiabaticPipeFlow::fanno(sol.inlet.mach, gamma) - AdiabaticPipeFlow::fanno(sol.outlet.mach, gamma);
        assert!((diff - r).abs() < 1e-6 * r, "diff {diff} r {r}");
    }

    #[test]
    fn adiabatic_chokes_on_long_pipe() {
        let input = GasSolveInput {
            length: 1e7,
            ..methane_input()
        };
        assert!(matches!(
            AdiabaticPipeFlow.solve(&input),
            Err(HydraulicsError::NonPhysical { .. })
        ));
    }

    #[test]
    fn both_models_agree_for_small_drops() {
        // Short, low-resistance run: models should be close.
        let input = GasSolveInput {
            length: 5.0,
            total_k: 0.0,
            ..methane_input()
        };
        let iso = IsothermalPipeFlow.solve(&input).unwrap();
        let adi = AdiabaticPipeFlow.solve(&input).unwrap();
        let dp_iso = iso.inlet.pressure - iso.outlet.pressure;
        let dp_adi = adi.inlet.pressure - adi.outlet.pressure;
        assert!(
            (dp_iso - dp_adi).abs() < 0.05 * dp_iso.max(dp_adi),
            "iso {dp_iso} adi {dp_adi}"
        );
    }

    #[test]
    fn rejects_missing_inputs() {
        let input = GasSolveInput {
            mass_flow: 0.0,
            ..methane_input()
        };
        assert!(matches!(
            IsothermalPipeFlow.solve(&input),
            Err(HydraulicsError::InsufficientInput { .. })
        ));
    }
}
