//! # Materials
//!
//! Validated material records for fasteners and clamped parts.
//!
//! A [`Material`] is constructed once from dimensioned [`MaterialProperties`]
//! and is read-only afterwards. Standard records are available from
//! [`standard`] as factory functions, so every caller gets its own copy.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::materials::{Material, MaterialProperties};
//! use joint_core::units::{Quantity, Unit};
//!
//! let steel = Material::new(MaterialProperties {
//!     name: "Alloy Steel".to_string(),
//!     yield_strength: Quantity::megapascals(800.0),
//!     ultimate_strength: Quantity::megapascals(1000.0),
//!     elastic_modulus: Quantity::gigapascals(210.0),
//!     thermal_expansion: Quantity::per_kelvin(13.0e-6),
//!     density: Quantity::new(7850.0, Unit::KilogramPerCubicMeter),
//!     poisson_ratio: 0.29,
//! })
//! .unwrap();
//!
//! assert!((steel.ultimate_shear_strength_pa() - 577.0e6).abs() < 1.0);
//! ```

pub mod standard;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, Quantity};

/// Shear-to-tensile allowable ratio from the von Mises criterion (1/√3)
pub const VON_MISES_SHEAR_RATIO: f64 = 0.577;

/// Raw, dimensioned material properties.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Generic Aluminum (6061-T6)",
///   "yield_strength": { "value": 276.0, "unit": "MPa" },
///   "ultimate_strength": { "value": 310.0, "unit": "MPa" },
///   "elastic_modulus": { "value": 69.0, "unit": "GPa" },
///   "thermal_expansion": { "value": 2.31e-5, "unit": "1/K" },
///   "density": { "value": 2700.0, "unit": "kg/m^3" },
///   "poisson_ratio": 0.33
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub name: String,
    pub yield_strength: Quantity,
    pub ultimate_strength: Quantity,
    pub elastic_modulus: Quantity,
    pub thermal_expansion: Quantity,
    pub density: Quantity,
    pub poisson_ratio: f64,
}

/// A validated material record.
///
/// Properties keep the units they were given; `*_pa`, `*_per_k` and
/// `*_kg_m3` accessors return SI magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialProperties", into = "MaterialProperties")]
pub struct Material {
    props: MaterialProperties,
}

impl Material {
    /// Validate and build a material.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if a property carries the wrong dimension
    /// - `InvalidInput` for non-positive values, yield ≥ ultimate, or a
    ///   Poisson ratio outside (0, 0.5)
    pub fn new(props: MaterialProperties) -> CalcResult<Self> {
        if props.name.trim().is_empty() {
            return Err(CalcError::invalid_input("name", &props.name, "Material name must not be empty"));
        }
        let yield_pa = props.yield_strength.require_positive("yield_strength", Dimension::Stress)?;
        let ultimate_pa = props
            .ultimate_strength
            .require_positive("ultimate_strength", Dimension::Stress)?;
        props
            .elastic_modulus
            .require_positive("elastic_modulus", Dimension::Stress)?;
        props
            .thermal_expansion
            .require_positive("thermal_expansion", Dimension::ThermalExpansion)?;
        props.density.require_positive("density", Dimension::Density)?;

        if yield_pa >= ultimate_pa {
            return Err(CalcError::invalid_input(
                "yield_strength",
                props.yield_strength.to_string(),
                format!("Yield strength must be less than ultimate strength ({})", props.ultimate_strength),
            ));
        }
        if !(props.poisson_ratio > 0.0 && props.poisson_ratio < 0.5) {
            return Err(CalcError::invalid_input(
                "poisson_ratio",
                props.poisson_ratio.to_string(),
                "Poisson's ratio must be between 0 and 0.5",
            ));
        }
        Ok(Material { props })
    }

    /// Name identifying this material
    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn properties(&self) -> &MaterialProperties {
        &self.props
    }

    pub fn yield_strength(&self) -> Quantity {
        self.props.yield_strength
    }

    pub fn ultimate_strength(&self) -> Quantity {
        self.props.ultimate_strength
    }

    pub fn elastic_modulus(&self) -> Quantity {
        self.props.elastic_modulus
    }

    pub fn thermal_expansion(&self) -> Quantity {
        self.props.thermal_expansion
    }

    pub fn density(&self) -> Quantity {
        self.props.density
    }

    pub fn poisson_ratio(&self) -> f64 {
        self.props.poisson_ratio
    }

    pub fn yield_strength_pa(&self) -> f64 {
        self.props.yield_strength.si_value()
    }

    pub fn ultimate_strength_pa(&self) -> f64 {
        self.props.ultimate_strength.si_value()
    }

    /// Ultimate shear allowable, 0.577 × ultimate
    pub fn ultimate_shear_strength_pa(&self) -> f64 {
        VON_MISES_SHEAR_RATIO * self.ultimate_strength_pa()
    }

    /// Shear yield allowable, 0.577 × yield
    pub fn shear_yield_strength_pa(&self) -> f64 {
        VON_MISES_SHEAR_RATIO * self.yield_strength_pa()
    }

    pub fn elastic_modulus_pa(&self) -> f64 {
        self.props.elastic_modulus.si_value()
    }

    pub fn thermal_expansion_per_k(&self) -> f64 {
        self.props.thermal_expansion.si_value()
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.props.density.si_value()
    }
}

impl TryFrom<MaterialProperties> for Material {
    type Error = CalcError;

    fn try_from(props: MaterialProperties) -> Result<Self, Self::Error> {
        Material::new(props)
    }
}

impl From<Material> for MaterialProperties {
    fn from(material: Material) -> Self {
        material.props
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.props.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    fn aluminum_props() -> MaterialProperties {
        MaterialProperties {
            name: "6061-T6".to_string(),
            yield_strength: Quantity::megapascals(276.0),
            ultimate_strength: Quantity::megapascals(310.0),
            elastic_modulus: Quantity::gigapascals(69.0),
            thermal_expansion: Quantity::per_kelvin(23.1e-6),
            density: Quantity::new(2700.0, Unit::KilogramPerCubicMeter),
            poisson_ratio: 0.33,
        }
    }

    #[test]
    fn test_valid_material() {
        let mat = Material::new(aluminum_props()).unwrap();
        assert_eq!(mat.name(), "6061-T6");
        assert!((mat.elastic_modulus_pa() - 69.0e9).abs() < 1.0);
        assert!((mat.shear_yield_strength_pa() - 0.577 * 276.0e6).abs() < 1.0);
    }

    #[test]
    fn test_yield_must_be_below_ultimate() {
        let mut props = aluminum_props();
        props.yield_strength = Quantity::megapascals(310.0);
        assert!(Material::new(props).is_err());
    }

    #[test]
    fn test_wrong_dimension() {
        let mut props = aluminum_props();
        props.elastic_modulus = Quantity::inches(69.0);
        let err = Material::new(props).unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
    }

    #[test]
    fn test_invalid_poisson_ratio() {
        let mut props = aluminum_props();
        props.poisson_ratio = 0.5;
        assert!(Material::new(props).is_err());
    }

    #[test]
    fn test_non_positive_property() {
        let mut props = aluminum_props();
        props.thermal_expansion = Quantity::per_kelvin(0.0);
        assert!(Material::new(props).is_err());
    }

    #[test]
    fn test_deserialization_validates() {
        let json = serde_json::to_string(&aluminum_props()).unwrap();
        let mat: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(mat.name(), "6061-T6");

        let mut bad = aluminum_props();
        bad.density = Quantity::new(-1.0, Unit::KilogramPerCubicMeter);
        let json = serde_json::to_string(&bad).unwrap();
        assert!(serde_json::from_str::<Material>(&json).is_err());
    }
}
