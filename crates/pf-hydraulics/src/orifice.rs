//! Sharp-edged orifice plate loss coefficient.

use crate::error::{HydraulicsError, HydraulicsResult};

/// K-factor of a sharp-edged plate, referred to pipe velocity.
///
/// geometric factor = (1 - b^2)(1/b^4 - 1); flow factor depends on the
/// Reynolds regime:
///   Re <= 2500:  2.72 + b^2 (120/Re - 1)
///   Re >  2500:  2.72 - 4000 b^2 / Re
pub fn orifice_k(beta: f64, reynolds: f64) -> HydraulicsResult<f64> {
    if !(beta > 0.0 && beta < 1.0) {
        return Err(HydraulicsError::NonPhysical { what: "beta ratio" });
    }
    if reynolds <= 0.0 {
        return Err(HydraulicsError::InsufficientInput {
            what: "Reynolds number",
        });
    }
    let b2 = beta * beta;
    let geom = (1.0 - b2) * (1.0 / (b2 * b2) - 1.0);
    let flow = if reynolds <= 2500.0 {
        2.72 + b2 * (120.0 / reynolds - 1.0)
    } else {
        2.72 - 4000.0 * b2 / reynolds
    };
    Ok(flow * geom)
}

/// Pressure drop K * 1/2 rho v^2 across the plate, Pa.
pub fn orifice_pressure_drop(k: f64, rho: f64, velocity: f64) -> HydraulicsResult<f64> {
    if rho <= 0.0 {
        return Err(HydraulicsError::InsufficientInput { what: "density" });
    }
    Ok(k * 0.5 * rho * velocity * velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_case_beta_half() {
        // beta = 0.5, Re = 10^4: geom = 0.75 * 15, flow = 2.72 - 0.1 = 2.62.
        let k = orifice_k(0.5, 10_000.0).unwrap();
        assert!((k - 29.475).abs() < 1e-9, "k = {k}");
    }

    #[test]
    fn low_reynolds_branch() {
        let k = orifice_k(0.5, 2000.0).unwrap();
        let flow = 2.72 + 0.25 * (120.0 / 2000.0 - 1.0);
        assert!((k - flow * 11.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_beta() {
        assert!(orifice_k(0.0, 1e4).is_err());
        assert!(orifice_k(1.0, 1e4).is_err());
        assert!(orifice_k(-0.5, 1e4).is_err());
        assert!(orifice_k(0.5, 0.0).is_err());
    }

    #[test]
    fn pressure_drop_scales_with_dynamic_pressure() {
        let k = orifice_k(0.6, 5e4).unwrap();
        let dp = orifice_pressure_drop(k, 998.0, 2.0).unwrap();
        assert!((dp - k * 0.5 * 998.0 * 4.0).abs() < 1e-9);
        assert!(orifice_pressure_drop(k, 0.0, 2.0).is_err());
    }
}
