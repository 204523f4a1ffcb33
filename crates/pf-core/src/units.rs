// pf-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, Length as UomLength, MassDensity as UomMassDensity,
    MassRate as UomMassRate, MolarMass as UomMolarMass, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Canonical quantity types (SI, f64). The tagged-unit conversions in
// `quantity` route through these, so every conversion factor is uom's.
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type MolarMass = UomMolarMass;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

pub mod constants {
    /// Standard gravity, m/s^2.
    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant, J/(mol K).
    pub const R_UNIVERSAL: f64 = 8.314_462_618;

    /// Pascals per psi.
    pub const PA_PER_PSI: f64 = 6_894.757_293_168;

    /// US gallons per minute per cubic meter per second.
    pub const GPM_PER_M3PS: f64 = 15_850.323_141;

    /// Density of the water reference used for specific gravity, kg/m^3.
    pub const WATER_DENSITY: f64 = 1000.0;

    /// API RP 14E erosional velocity constant for SI inputs
    /// (v_e = C / sqrt(rho), rho in kg/m^3, v_e in m/s).
    pub const EROSIONAL_C_SI: f64 = 122.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn si_storage_is_canonical() {
        use uom::si::length::meter;
        use uom::si::pressure::pascal;
        assert_eq!(Pressure::new::<pascal>(101_325.0).value, 101_325.0);
        assert_eq!(Length::new::<meter>(2.0).value, 2.0);
    }
}
