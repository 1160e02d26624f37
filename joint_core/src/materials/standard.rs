//! Standard material records.
//!
//! Each function returns a fresh [`Material`]; nothing here is shared
//! between callers.

use super::{Material, MaterialProperties};
use crate::units::{Quantity, Unit};

// Records below are checked against `Material::new` in the tests.
fn build(props: MaterialProperties) -> Material {
    Material { props }
}

/// Generic structural steel (ASTM A36 properties)
pub fn generic_steel() -> Material {
    build(MaterialProperties {
        name: "Generic Structural Steel".to_string(),
        yield_strength: Quantity::megapascals(250.0),
        ultimate_strength: Quantity::megapascals(400.0),
        elastic_modulus: Quantity::gigapascals(200.0),
        thermal_expansion: Quantity::per_kelvin(1.17e-5),
        density: Quantity::new(7850.0, Unit::KilogramPerCubicMeter),
        poisson_ratio: 0.29,
    })
}

/// Generic aluminum (6061-T6 properties)
pub fn generic_aluminum() -> Material {
    build(MaterialProperties {
        name: "Generic Aluminum (6061-T6)".to_string(),
        yield_strength: Quantity::megapascals(276.0),
        ultimate_strength: Quantity::megapascals(310.0),
        elastic_modulus: Quantity::gigapascals(69.0),
        thermal_expansion: Quantity::per_kelvin(2.31e-5),
        density: Quantity::new(2700.0, Unit::KilogramPerCubicMeter),
        poisson_ratio: 0.33,
    })
}

/// High strength alloy steel for fasteners
pub fn high_strength_steel() -> Material {
    build(MaterialProperties {
        name: "High Strength Steel".to_string(),
        yield_strength: Quantity::megapascals(800.0),
        ultimate_strength: Quantity::megapascals(1000.0),
        elastic_modulus: Quantity::gigapascals(210.0),
        thermal_expansion: Quantity::per_kelvin(13.0e-6),
        density: Quantity::new(7850.0, Unit::KilogramPerCubicMeter),
        poisson_ratio: 0.29,
    })
}
