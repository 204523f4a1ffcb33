//! Control-valve liquid sizing: flow coefficient Cv vs pressure drop.
//!
//! Standard US sizing form: Cv = Q[gpm] / sqrt(dP[psi] / SG), with
//! SG = rho / 1000 (water reference). Both directions are provided so the
//! driven field can be recomputed from the driving one.

use pf_core::units::constants::{GPM_PER_M3PS, PA_PER_PSI, WATER_DENSITY};

use crate::error::{HydraulicsError, HydraulicsResult};

/// Flow coefficient from an imposed pressure drop.
///
/// `q_m3ps` volumetric flow (m^3/s), `dp_pa` pressure drop (Pa),
/// `rho` density (kg/m^3).
pub fn cv_from_pressure_drop(q_m3ps: f64, dp_pa: f64, rho: f64) -> HydraulicsResult<f64> {
    let sg = specific_gravity(rho)?;
    if q_m3ps <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "volumetric flow",
        });
    }
    if dp_pa <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "valve pressure drop",
        });
    }
    let q_gpm = q_m3ps * GPM_PER_M3PS;
    let dp_psi = dp_pa / PA_PER_PSI;
    Ok(q_gpm / (dp_psi / sg).sqrt())
}

/// Pressure drop (Pa) from a known flow coefficient.
pub fn pressure_drop_from_cv(q_m3ps: f64, cv: f64, rho: f64) -> HydraulicsResult<f64> {
    let sg = specific_gravity(rho)?;
    if q_m3ps <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "volumetric flow",
        });
    }
    if cv <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "flow coefficient",
        });
    }
    let q_gpm = q_m3ps * GPM_PER_M3PS;
    let dp_psi = (q_gpm / cv).powi(2) * sg;
    Ok(dp_psi * PA_PER_PSI)
}

fn specific_gravity(rho: f64) -> HydraulicsResult<f64> {
    if rho <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "density" });
    }
    Ok(rho / WATER_DENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_reference_case() {
        // 1 gpm of water across 1 psi: Cv = 1 by definition.
        let q = 1.0 / GPM_PER_M3PS;
        let dp = PA_PER_PSI;
        let cv = cv_from_pressure_drop(q, dp, 1000.0).unwrap();
        assert!((cv - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cv_dp_round_trip() {
        let q = 0.01; // m^3/s
        let rho = 850.0;
        let cv = 42.0;
        let dp = pressure_drop_from_cv(q, cv, rho).unwrap();
        let cv_back = cv_from_pressure_drop(q, dp, rho).unwrap();
        assert!((cv_back - cv).abs() < 1e-9 * cv);
    }

    #[test]
    fn denser_fluid_drops_more() {
        let q = 0.005;
        let dp_light = pressure_drop_from_cv(q, 20.0, 700.0).unwrap();
        let dp_heavy = pressure_drop_from_cv(q, 20.0, 1100.0).unwrap();
        assert!(dp_heavy > dp_light);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(cv_from_pressure_drop(0.0, 1e4, 1000.0).is_err());
        assert!(cv_from_pressure_drop(0.01, 0.0, 1000.0).is_err());
        assert!(pressure_drop_from_cv(0.01, 0.0, 1000.0).is_err());
        assert!(pressure_drop_from_cv(0.01, 10.0, -5.0).is_err());
    }
}
