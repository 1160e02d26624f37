//! # Unit Types
//!
//! Dimensioned quantities for the joint analysis boundary. Inputs arrive as
//! a value tagged with a [`Unit`]; the core checks the [`Dimension`] once at
//! construction and works in SI base units (m, N, N·m, Pa, K) from then on.
//!
//! ## Design Philosophy
//!
//! - A quantity is a plain `{ value, unit }` pair so JSON stays readable
//! - Dimension checks happen at the boundary, never inside formulas
//! - Temperatures convert affinely (°C, °F) to absolute kelvin
//!
//! ## Example
//!
//! ```rust
//! use joint_core::units::{Dimension, Quantity, Unit};
//!
//! let thickness = Quantity::inches(0.5);
//! assert!((thickness.si_value() - 0.0127).abs() < 1e-12);
//!
//! let torque = Quantity::new(50.0, Unit::FootPound);
//! assert_eq!(torque.dimension(), Dimension::Moment);
//! assert!(torque.require("preload_torque", Dimension::Force).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CalcError, CalcResult};

const INCH_M: f64 = 0.0254;
const FOOT_M: f64 = 0.3048;
const LBF_N: f64 = 4.448_221_615_260_5;
const PSI_PA: f64 = LBF_N / (INCH_M * INCH_M);
const POUND_KG: f64 = 0.453_592_37;

// ============================================================================
// Dimensions
// ============================================================================

/// Physical dimension of a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Length,
    Force,
    /// Force × length (moments and torques)
    Moment,
    /// Force / area (stresses and moduli)
    Stress,
    Temperature,
    /// 1 / temperature
    ThermalExpansion,
    Density,
}

impl Dimension {
    /// SI base unit symbol for this dimension
    pub fn si_symbol(&self) -> &'static str {
        match self {
            Dimension::Length => "m",
            Dimension::Force => "N",
            Dimension::Moment => "N*m",
            Dimension::Stress => "Pa",
            Dimension::Temperature => "K",
            Dimension::ThermalExpansion => "1/K",
            Dimension::Density => "kg/m^3",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Force => "force",
            Dimension::Moment => "moment",
            Dimension::Stress => "stress",
            Dimension::Temperature => "temperature",
            Dimension::ThermalExpansion => "thermal expansion",
            Dimension::Density => "density",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Units
// ============================================================================

/// Supported units, serialized by their symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "ft")]
    Foot,

    #[serde(rename = "N")]
    Newton,
    #[serde(rename = "kN")]
    Kilonewton,
    #[serde(rename = "lbf")]
    PoundForce,
    #[serde(rename = "kip")]
    Kip,

    #[serde(rename = "N*m")]
    NewtonMeter,
    #[serde(rename = "ft*lbf")]
    FootPound,
    #[serde(rename = "in*lbf")]
    InchPound,

    #[serde(rename = "Pa")]
    Pascal,
    #[serde(rename = "MPa")]
    Megapascal,
    #[serde(rename = "GPa")]
    Gigapascal,
    #[serde(rename = "psi")]
    Psi,
    #[serde(rename = "ksi")]
    Ksi,

    #[serde(rename = "K")]
    Kelvin,
    #[serde(rename = "degC")]
    Celsius,
    #[serde(rename = "degF")]
    Fahrenheit,
    #[serde(rename = "degR")]
    Rankine,

    #[serde(rename = "1/K")]
    PerKelvin,
    #[serde(rename = "1/degF")]
    PerFahrenheit,

    #[serde(rename = "kg/m^3")]
    KilogramPerCubicMeter,
    #[serde(rename = "lb/in^3")]
    PoundPerCubicInch,
}

impl Unit {
    /// Dimension measured by this unit
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Millimeter | Unit::Meter | Unit::Inch | Unit::Foot => Dimension::Length,
            Unit::Newton | Unit::Kilonewton | Unit::PoundForce | Unit::Kip => Dimension::Force,
            Unit::NewtonMeter | Unit::FootPound | Unit::InchPound => Dimension::Moment,
            Unit::Pascal | Unit::Megapascal | Unit::Gigapascal | Unit::Psi | Unit::Ksi => {
                Dimension::Stress
            }
            Unit::Kelvin | Unit::Celsius | Unit::Fahrenheit | Unit::Rankine => {
                Dimension::Temperature
            }
            Unit::PerKelvin | Unit::PerFahrenheit => Dimension::ThermalExpansion,
            Unit::KilogramPerCubicMeter | Unit::PoundPerCubicInch => Dimension::Density,
        }
    }

    /// Symbol used in JSON and display
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Foot => "ft",
            Unit::Newton => "N",
            Unit::Kilonewton => "kN",
            Unit::PoundForce => "lbf",
            Unit::Kip => "kip",
            Unit::NewtonMeter => "N*m",
            Unit::FootPound => "ft*lbf",
            Unit::InchPound => "in*lbf",
            Unit::Pascal => "Pa",
            Unit::Megapascal => "MPa",
            Unit::Gigapascal => "GPa",
            Unit::Psi => "psi",
            Unit::Ksi => "ksi",
            Unit::Kelvin => "K",
            Unit::Celsius => "degC",
            Unit::Fahrenheit => "degF",
            Unit::Rankine => "degR",
            Unit::PerKelvin => "1/K",
            Unit::PerFahrenheit => "1/degF",
            Unit::KilogramPerCubicMeter => "kg/m^3",
            Unit::PoundPerCubicInch => "lb/in^3",
        }
    }

    /// (scale, offset) such that `si = value * scale + offset`
    fn to_si_affine(self) -> (f64, f64) {
        match self {
            Unit::Millimeter => (1e-3, 0.0),
            Unit::Meter => (1.0, 0.0),
            Unit::Inch => (INCH_M, 0.0),
            Unit::Foot => (FOOT_M, 0.0),
            Unit::Newton => (1.0, 0.0),
            Unit::Kilonewton => (1e3, 0.0),
            Unit::PoundForce => (LBF_N, 0.0),
            Unit::Kip => (1e3 * LBF_N, 0.0),
            Unit::NewtonMeter => (1.0, 0.0),
            Unit::FootPound => (LBF_N * FOOT_M, 0.0),
            Unit::InchPound => (LBF_N * INCH_M, 0.0),
            Unit::Pascal => (1.0, 0.0),
            Unit::Megapascal => (1e6, 0.0),
            Unit::Gigapascal => (1e9, 0.0),
            Unit::Psi => (PSI_PA, 0.0),
            Unit::Ksi => (1e3 * PSI_PA, 0.0),
            Unit::Kelvin => (1.0, 0.0),
            Unit::Celsius => (1.0, 273.15),
            Unit::Fahrenheit => (5.0 / 9.0, 459.67 * 5.0 / 9.0),
            Unit::Rankine => (5.0 / 9.0, 0.0),
            Unit::PerKelvin => (1.0, 0.0),
            Unit::PerFahrenheit => (1.8, 0.0),
            Unit::KilogramPerCubicMeter => (1.0, 0.0),
            Unit::PoundPerCubicInch => (POUND_KG / (INCH_M * INCH_M * INCH_M), 0.0),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// A scalar tagged with its unit.
///
/// ## JSON Example
///
/// ```json
/// { "value": 0.5, "unit": "in" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// Build a quantity from an SI base magnitude of `unit`'s dimension
    pub fn from_si(si_value: f64, unit: Unit) -> Self {
        let (scale, offset) = unit.to_si_affine();
        Quantity::new((si_value - offset) / scale, unit)
    }

    pub fn millimeters(value: f64) -> Self {
        Quantity::new(value, Unit::Millimeter)
    }

    pub fn inches(value: f64) -> Self {
        Quantity::new(value, Unit::Inch)
    }

    pub fn newtons(value: f64) -> Self {
        Quantity::new(value, Unit::Newton)
    }

    pub fn pounds_force(value: f64) -> Self {
        Quantity::new(value, Unit::PoundForce)
    }

    pub fn newton_meters(value: f64) -> Self {
        Quantity::new(value, Unit::NewtonMeter)
    }

    pub fn foot_pounds(value: f64) -> Self {
        Quantity::new(value, Unit::FootPound)
    }

    pub fn megapascals(value: f64) -> Self {
        Quantity::new(value, Unit::Megapascal)
    }

    pub fn gigapascals(value: f64) -> Self {
        Quantity::new(value, Unit::Gigapascal)
    }

    pub fn kelvin(value: f64) -> Self {
        Quantity::new(value, Unit::Kelvin)
    }

    pub fn per_kelvin(value: f64) -> Self {
        Quantity::new(value, Unit::PerKelvin)
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Magnitude in SI base units (absolute kelvin for temperatures)
    pub fn si_value(&self) -> f64 {
        let (scale, offset) = self.unit.to_si_affine();
        self.value * scale + offset
    }

    /// Convert to another unit of the same dimension
    pub fn convert_to(&self, unit: Unit) -> CalcResult<Quantity> {
        if unit.dimension() != self.dimension() {
            return Err(CalcError::dimension_mismatch(
                self.to_string(),
                unit.dimension().to_string(),
                self.dimension().to_string(),
            ));
        }
        Ok(Quantity::from_si(self.si_value(), unit))
    }

    /// Check the dimension at the boundary and return the SI magnitude
    pub fn require(&self, field: &str, dimension: Dimension) -> CalcResult<f64> {
        if self.dimension() != dimension {
            return Err(CalcError::dimension_mismatch(
                field,
                dimension.to_string(),
                format!("{} ({})", self.dimension(), self.unit),
            ));
        }
        if !self.value.is_finite() {
            return Err(CalcError::invalid_input(field, self.to_string(), "Value must be finite"));
        }
        Ok(self.si_value())
    }

    /// Like [`Quantity::require`], additionally rejecting values ≤ 0
    pub fn require_positive(&self, field: &str, dimension: Dimension) -> CalcResult<f64> {
        let si = self.require(field, dimension)?;
        if si <= 0.0 {
            return Err(CalcError::invalid_input(field, self.to_string(), "Value must be positive"));
        }
        Ok(si)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ============================================================================
// Unit System
// ============================================================================

/// Output unit system for reported quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Preferred unit for forces (preloads)
    pub fn force_unit(&self) -> Unit {
        match self {
            UnitSystem::Metric => Unit::Newton,
            UnitSystem::Imperial => Unit::PoundForce,
        }
    }

    /// Preferred unit for lengths
    pub fn length_unit(&self) -> Unit {
        match self {
            UnitSystem::Metric => Unit::Millimeter,
            UnitSystem::Imperial => Unit::Inch,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}
