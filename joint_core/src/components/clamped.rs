//! Washers and plates.

use serde::Serialize;

use super::{positive_length, Clamped, Component, ComponentId};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Material;
use crate::units::Quantity;

/// A flat washer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Washer {
    id: ComponentId,
    inner_diameter: Quantity,
    outer_diameter: Quantity,
    thickness: Quantity,
    material: Material,
}

impl Washer {
    pub fn new(
        inner_diameter: Quantity,
        outer_diameter: Quantity,
        thickness: Quantity,
        material: Material,
    ) -> CalcResult<Self> {
        let inner_m = positive_length("inner_diameter", &inner_diameter)?;
        let outer_m = positive_length("outer_diameter", &outer_diameter)?;
        positive_length("thickness", &thickness)?;
        if inner_m >= outer_m {
            return Err(CalcError::invalid_input(
                "outer_diameter",
                outer_diameter.to_string(),
                format!("Outer diameter must be greater than inner diameter ({})", inner_diameter),
            ));
        }
        Ok(Washer {
            id: ComponentId::new(),
            inner_diameter,
            outer_diameter,
            thickness,
            material,
        })
    }

    pub fn inner_diameter(&self) -> Quantity {
        self.inner_diameter
    }

    pub fn outer_diameter(&self) -> Quantity {
        self.outer_diameter
    }
}

impl Component for Washer {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl Clamped for Washer {
    fn thickness(&self) -> Quantity {
        self.thickness
    }
}

/// A clamped plate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plate {
    id: ComponentId,
    thickness: Quantity,
    material: Material,
}

impl Plate {
    pub fn new(thickness: Quantity, material: Material) -> CalcResult<Self> {
        positive_length("thickness", &thickness)?;
        Ok(Plate {
            id: ComponentId::new(),
            thickness,
            material,
        })
    }
}

impl Component for Plate {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl Clamped for Plate {
    fn thickness(&self) -> Quantity {
        self.thickness
    }
}
