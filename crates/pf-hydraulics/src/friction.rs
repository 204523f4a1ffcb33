//! Darcy friction factor and flow-regime classification.

use serde::{Deserialize, Serialize};

use crate::error::{HydraulicsError, HydraulicsResult};

/// Reynolds number below which flow is treated as laminar.
pub const LAMINAR_LIMIT: f64 = 2300.0;

const COLEBROOK_TOL: f64 = 1e-10;
const COLEBROOK_MAX_ITER: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

/// Pipe cross-section area for an inner diameter, m^2.
#[inline]
pub fn flow_area(diameter: f64) -> f64 {
    std::f64::consts::PI * diameter * diameter / 4.0
}

/// Bulk velocity from mass flow, density and diameter, m/s.
pub fn mean_velocity(mdot: f64, rho: f64, diameter: f64) -> HydraulicsResult<f64> {
    if mdot <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "mass flow" });
    }
    if rho <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "density" });
    }
    if diameter <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "diameter" });
    }
    Ok(mdot / (rho * flow_area(diameter)))
}

/// Reynolds number rho v D / mu.
pub fn reynolds_number(rho: f64, velocity: f64, diameter: f64, mu: f64) -> HydraulicsResult<f64> {
    if rho <= 0.0 || velocity <= 0.0 || diameter <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "Reynolds inputs",
        });
    }
    if mu <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "viscosity" });
    }
    Ok(rho * velocity * diameter / mu)
}

/// Darcy friction factor and regime for a Reynolds number and relative
/// roughness (absolute roughness / diameter).
///
/// Laminar (Re <= 2300): f = 64/Re. Turbulent: Colebrook-White solved by
/// fixed-point iteration on 1/sqrt(f), seeded with Swamee-Jain. The
/// iteration is bounded; failure to converge is an error, not a hang.
pub fn friction_factor(reynolds: f64, rel_roughness: f64) -> HydraulicsResult<(f64, FlowRegime)> {
    if reynolds <= 0.0 || !reynolds.is_finite() {
        return Err(HydraulicsError::InsufficientInput {
            what: "Reynolds number",
        });
    }
    if rel_roughness < 0.0 || !rel_roughness.is_finite() {
        return Err(HydraulicsError::NonPhysical {
            what: "relative roughness",
        });
    }

    if reynolds <= LAMINAR_LIMIT {
        return Ok((64.0 / reynolds, FlowRegime::Laminar));
    }

    let f = colebrook(reynolds, rel_roughness)?;
    Ok((f, FlowRegime::Turbulent))
}

/// Colebrook-White: 1/sqrt(f) = -2 log10(rr/3.7 + 2.51/(Re sqrt(f))).
fn colebrook(reynolds: f64, rel_roughness: f64) -> HydraulicsResult<f64> {
    // Swamee-Jain explicit approximation as the initial guess.
    let a = rel_roughness / 3.7;
    let f0 = 0.25 / (a + 5.74 / reynolds.powf(0.9)).log10().powi(2);
    let mut x = 1.0 / f0.sqrt();

    for _ in 0..COLEBROOK_MAX_ITER {
        let x_next = -2.0 * (a + 2.51 * x / reynolds).log10();
        if !x_next.is_finite() || x_next <= 0.0 {
            return Err(HydraulicsError::ConvergenceFailed {
                what: "Colebrook iteration left the physical range",
            });
        }
        if (x_next - x).abs() < COLEBROOK_TOL {
            return Ok(1.0 / (x_next * x_next));
        }
        x = x_next;
    }

    Err(HydraulicsError::ConvergenceFailed {
        what: "Colebrook iteration did not converge",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laminar_is_exactly_64_over_re() {
        let (f, regime) = friction_factor(1000.0, 0.001).unwrap();
        assert_eq!(f, 0.064);
        assert_eq!(regime, FlowRegime::Laminar);

        let (f, regime) = friction_factor(2300.0, 0.0).unwrap();
        assert!((f - 64.0 / 2300.0).abs() < 1e-15);
        assert_eq!(regime, FlowRegime::Laminar);
    }

    #[test]
    fn turbulent_smooth_pipe_reference() {
        // Smooth pipe at Re = 1e5: Colebrook gives f ~ 0.0180.
        let (f, regime) = friction_factor(1e5, 0.0).unwrap();
        assert_eq!(regime, FlowRegime::Turbulent);
        assert!((f - 0.0180).abs() < 5e-4, "f = {f}");
    }

    #[test]
    fn turbulent_rough_pipe_reference() {
        // Re = 1e6, rr = 1e-3: Moody chart reads f ~ 0.0199.
        let (f, _) = friction_factor(1e6, 1e-3).unwrap();
        assert!((f - 0.0199).abs() < 5e-4, "f = {f}");
    }

    #[test]
    fn satisfies_colebrook_residual() {
        let re = 5e4;
        let rr = 2e-4;
        let (f, _) = friction_factor(re, rr).unwrap();
        let lhs = 1.0 / f.sqrt();
        let rhs = -2.0 * (rr / 3.7 + 2.51 / (re * f.sqrt())).log10();
        assert!((lhs - rhs).abs() < 1e-8);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(friction_factor(0.0, 0.0).is_err());
        assert!(friction_factor(-1.0, 0.0).is_err());
        assert!(friction_factor(1e5, -0.1).is_err());
        assert!(friction_factor(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn velocity_and_reynolds_helpers() {
        // 2 kg/s of water through DN50.
        let v = mean_velocity(2.0, 998.0, 0.05).unwrap();
        assert!((v - 2.0 / (998.0 * flow_area(0.05))).abs() < 1e-12);
        let re = reynolds_number(998.0, v, 0.05, 1e-3).unwrap();
        assert!(re > 1e4);
        assert!(mean_velocity(0.0, 998.0, 0.05).is_err());
        assert!(reynolds_number(998.0, 1.0, 0.05, 0.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn turbulent_factor_positive(
            re in 2301.0_f64..1e8,
            rr in 0.0_f64..0.05,
        ) {
            let (f, regime) = friction_factor(re, rr).unwrap();
            prop_assert!(f > 0.0);
            prop_assert_eq!(regime, FlowRegime::Turbulent);
        }

        #[test]
        fn laminar_factor_exact(re in 1.0_f64..=2300.0) {
            let (f, regime) = friction_factor(re, 0.01).unwrap();
            prop_assert_eq!(f, 64.0 / re);
            prop_assert_eq!(regime, FlowRegime::Laminar);
        }
    }
}
