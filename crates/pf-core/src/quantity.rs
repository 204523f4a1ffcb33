//! Tagged boundary quantities.
//!
//! Values entering the engine from a network description carry an explicit
//! unit tag. Units are closed enums, so every conversion is total: there is
//! no "unknown unit" that could silently pass through unconverted. The
//! conversions themselves delegate to uom's unit definitions, so every
//! factor (psi, centipoise, lb/h, ...) is the SI reference value. Physics
//! code converts to SI once at the boundary and works in canonical units.

use serde::{Deserialize, Serialize};

use crate::units::{Density, DynVisc, Length, MassRate, MolarMass, Pressure, Temperature};

/// Conversion between a tagged unit and its canonical SI representation.
pub trait UnitOf: Copy {
    fn to_si(self, value: f64) -> f64;
    fn from_si(self, si: f64) -> f64;
}

/// A value paired with its unit tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Qty<U> {
    pub value: f64,
    pub unit: U,
}

impl<U: UnitOf> Qty<U> {
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }

    /// Canonical SI value.
    pub fn si(&self) -> f64 {
        self.unit.to_si(self.value)
    }

    /// Build a quantity from an SI value, expressed in `unit`.
    pub fn from_si(si: f64, unit: U) -> Self {
        Self {
            value: unit.from_si(si),
            unit,
        }
    }

    /// Re-express this quantity in another unit of the same dimension.
    pub fn convert_to(&self, unit: U) -> Self {
        Self::from_si(self.si(), unit)
    }
}

pub type PressureQty = Qty<PressureUnit>;
pub type TemperatureQty = Qty<TemperatureUnit>;
pub type LengthQty = Qty<LengthUnit>;
pub type DensityQty = Qty<DensityUnit>;
pub type ViscosityQty = Qty<ViscosityUnit>;
pub type MassRateQty = Qty<MassRateUnit>;
pub type MolarMassQty = Qty<MolarMassUnit>;

/// Pressure units. Canonical: absolute pascal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    #[default]
    Pascal,
    Kilopascal,
    Megapascal,
    Bar,
    Psi,
    Atmosphere,
}

impl UnitOf for PressureUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::pressure::{
            atmosphere, bar, kilopascal, megapascal, pascal, pound_force_per_square_inch,
        };
        match self {
            PressureUnit::Pascal => Pressure::new::<pascal>(value),
            PressureUnit::Kilopascal => Pressure::new::<kilopascal>(value),
            PressureUnit::Megapascal => Pressure::new::<megapascal>(value),
            PressureUnit::Bar => Pressure::new::<bar>(value),
            PressureUnit::Psi => Pressure::new::<pound_force_per_square_inch>(value),
            PressureUnit::Atmosphere => Pressure::new::<atmosphere>(value),
        }
        .get::<pascal>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::pressure::{
            atmosphere, bar, kilopascal, megapascal, pascal, pound_force_per_square_inch,
        };
        let q = Pressure::new::<pascal>(si);
        match self {
            PressureUnit::Pascal => q.get::<pascal>(),
            PressureUnit::Kilopascal => q.get::<kilopascal>(),
            PressureUnit::Megapascal => q.get::<megapascal>(),
            PressureUnit::Bar => q.get::<bar>(),
            PressureUnit::Psi => q.get::<pound_force_per_square_inch>(),
            PressureUnit::Atmosphere => q.get::<atmosphere>(),
        }
    }
}

/// Temperature units. Canonical: kelvin. Celsius/Fahrenheit are affine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl UnitOf for TemperatureUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            TemperatureUnit::Kelvin => Temperature::new::<kelvin>(value),
            TemperatureUnit::Celsius => Temperature::new::<degree_celsius>(value),
            TemperatureUnit::Fahrenheit => Temperature::new::<degree_fahrenheit>(value),
        }
        .get::<kelvin>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        let q = Temperature::new::<kelvin>(si);
        match self {
            TemperatureUnit::Kelvin => q.get::<kelvin>(),
            TemperatureUnit::Celsius => q.get::<degree_celsius>(),
            TemperatureUnit::Fahrenheit => q.get::<degree_fahrenheit>(),
        }
    }
}

/// Length units. Canonical: meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Meter,
    Millimeter,
    Kilometer,
    Inch,
    Foot,
}

impl UnitOf for LengthUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::length::{foot, inch, kilometer, meter, millimeter};
        match self {
            LengthUnit::Meter => Length::new::<meter>(value),
            LengthUnit::Millimeter => Length::new::<millimeter>(value),
            LengthUnit::Kilometer => Length::new::<kilometer>(value),
            LengthUnit::Inch => Length::new::<inch>(value),
            LengthUnit::Foot => Length::new::<foot>(value),
        }
        .get::<meter>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::length::{foot, inch, kilometer, meter, millimeter};
        let q = Length::new::<meter>(si);
        match self {
            LengthUnit::Meter => q.get::<meter>(),
            LengthUnit::Millimeter => q.get::<millimeter>(),
            LengthUnit::Kilometer => q.get::<kilometer>(),
            LengthUnit::Inch => q.get::<inch>(),
            LengthUnit::Foot => q.get::<foot>(),
        }
    }
}

/// Density units. Canonical: kg/m^3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityUnit {
    #[default]
    KilogramPerCubicMeter,
    GramPerCubicCentimeter,
    PoundPerCubicFoot,
}

impl UnitOf for DensityUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::mass_density::{
            gram_per_cubic_centimeter, kilogram_per_cubic_meter, pound_per_cubic_foot,
        };
        match self {
            DensityUnit::KilogramPerCubicMeter => Density::new::<kilogram_per_cubic_meter>(value),
            DensityUnit::GramPerCubicCentimeter => {
                Density::new::<gram_per_cubic_centimeter>(value)
            }
            DensityUnit::PoundPerCubicFoot => Density::new::<pound_per_cubic_foot>(value),
        }
        .get::<kilogram_per_cubic_meter>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::mass_density::{
            gram_per_cubic_centimeter, kilogram_per_cubic_meter, pound_per_cubic_foot,
        };
        let q = Density::new::<kilogram_per_cubic_meter>(si);
        match self {
            DensityUnit::KilogramPerCubicMeter => q.get::<kilogram_per_cubic_meter>(),
            DensityUnit::GramPerCubicCentimeter => q.get::<gram_per_cubic_centimeter>(),
            DensityUnit::PoundPerCubicFoot => q.get::<pound_per_cubic_foot>(),
        }
    }
}

/// Dynamic viscosity units. Canonical: Pa s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViscosityUnit {
    #[default]
    PascalSecond,
    Centipoise,
}

impl UnitOf for ViscosityUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::dynamic_viscosity::{centipoise, pascal_second};
        match self {
            ViscosityUnit::PascalSecond => DynVisc::new::<pascal_second>(value),
            ViscosityUnit::Centipoise => DynVisc::new::<centipoise>(value),
        }
        .get::<pascal_second>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::dynamic_viscosity::{centipoise, pascal_second};
        let q = DynVisc::new::<pascal_second>(si);
        match self {
            ViscosityUnit::PascalSecond => q.get::<pascal_second>(),
            ViscosityUnit::Centipoise => q.get::<centipoise>(),
        }
    }
}

/// Mass flow units. Canonical: kg/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassRateUnit {
    #[default]
    KilogramPerSecond,
    KilogramPerHour,
    PoundPerHour,
}

impl UnitOf for MassRateUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::mass_rate::{kilogram_per_hour, kilogram_per_second, pound_per_hour};
        match self {
            MassRateUnit::KilogramPerSecond => MassRate::new::<kilogram_per_second>(value),
            MassRateUnit::KilogramPerHour => MassRate::new::<kilogram_per_hour>(value),
            MassRateUnit::PoundPerHour => MassRate::new::<pound_per_hour>(value),
        }
        .get::<kilogram_per_second>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::mass_rate::{kilogram_per_hour, kilogram_per_second, pound_per_hour};
        let q = MassRate::new::<kilogram_per_second>(si);
        match self {
            MassRateUnit::KilogramPerSecond => q.get::<kilogram_per_second>(),
            MassRateUnit::KilogramPerHour => q.get::<kilogram_per_hour>(),
            MassRateUnit::PoundPerHour => q.get::<pound_per_hour>(),
        }
    }
}

/// Molar mass units. Canonical: kg/mol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MolarMassUnit {
    #[default]
    KilogramPerMole,
    GramPerMole,
}

impl UnitOf for MolarMassUnit {
    fn to_si(self, value: f64) -> f64 {
        use uom::si::molar_mass::{gram_per_mole, kilogram_per_mole};
        match self {
            MolarMassUnit::KilogramPerMole => MolarMass::new::<kilogram_per_mole>(value),
            MolarMassUnit::GramPerMole => MolarMass::new::<gram_per_mole>(value),
        }
        .get::<kilogram_per_mole>()
    }

    fn from_si(self, si: f64) -> f64 {
        use uom::si::molar_mass::{gram_per_mole, kilogram_per_mole};
        let q = MolarMass::new::<kilogram_per_mole>(si);
        match self {
            MolarMassUnit::KilogramPerMole => q.get::<kilogram_per_mole>(),
            MolarMassUnit::GramPerMole => q.get::<gram_per_mole>(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn length_conversion_round_trips(v in -1e6_f64..1e6) {
            for unit in [
                LengthUnit::Meter,
                LengthUnit::Millimeter,
                LengthUnit::Kilometer,
                LengthUnit::Inch,
                LengthUnit::Foot,
            ] {
                let q = LengthQty::new(v, unit);
                let back = q.convert_to(LengthUnit::Meter).convert_to(unit);
                prop_assert!((back.value - v).abs() <= 1e-9 * v.abs().max(1.0));
            }
        }
    }
}
