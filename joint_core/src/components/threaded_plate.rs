//! Threaded plates (blind or through tapped holes).

use serde::{Deserialize, Serialize};

use super::{positive_length, Clamped, Component, ComponentId, Threaded};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Material;
use crate::threads::ThreadSpec;
use crate::units::{Dimension, Quantity};

/// Dimensioned inputs for a [`ThreadedPlate`].
///
/// The hole location is informational; it defaults to the plate origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadedPlateSpec {
    pub thread: ThreadSpec,
    pub thickness: Quantity,
    pub threaded_length: Quantity,
    pub clearance_hole_diameter: Quantity,
    #[serde(default)]
    pub thread_location: Option<[Quantity; 2]>,
}

/// A plate with a tapped hole that the fastener threads into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadedPlate {
    id: ComponentId,
    #[serde(flatten)]
    spec: ThreadedPlateSpec,
    material: Material,
}

impl ThreadedPlate {
    /// Build a threaded plate.
    ///
    /// # Errors
    ///
    /// - non-positive thickness, threaded length or clearance hole
    /// - threaded length exceeding plate thickness
    /// - clearance hole not larger than the thread pitch diameter
    /// - hole location not given as lengths
    pub fn new(spec: ThreadedPlateSpec, material: Material) -> CalcResult<Self> {
        let thickness_m = positive_length("thickness", &spec.thickness)?;
        let threaded_m = positive_length("threaded_length", &spec.threaded_length)?;
        let clearance_m = positive_length("clearance_hole_diameter", &spec.clearance_hole_diameter)?;

        if threaded_m > thickness_m {
            return Err(CalcError::invalid_input(
                "threaded_length",
                spec.threaded_length.to_string(),
                format!("Threaded length cannot exceed plate thickness ({})", spec.thickness),
            ));
        }
        if clearance_m <= spec.thread.pitch_diameter_m() {
            return Err(CalcError::invalid_input(
                "clearance_hole_diameter",
                spec.clearance_hole_diameter.to_string(),
                format!("Clearance hole diameter must be greater than the pitch diameter of {}", spec.thread),
            ));
        }
        if let Some([x, y]) = &spec.thread_location {
            x.require("thread_location_x", Dimension::Length)?;
            y.require("thread_location_y", Dimension::Length)?;
        }

        Ok(ThreadedPlate {
            id: ComponentId::new(),
            spec,
            material,
        })
    }

    pub fn clearance_hole_diameter(&self) -> Quantity {
        self.spec.clearance_hole_diameter
    }

    /// Hole location (x, y), defaulting to the origin
    pub fn thread_location(&self) -> [Quantity; 2] {
        self.spec
            .thread_location
            .unwrap_or([Quantity::millimeters(0.0), Quantity::millimeters(0.0)])
    }
}

impl Component for ThreadedPlate {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl Clamped for ThreadedPlate {
    fn thickness(&self) -> Quantity {
        self.spec.thickness
    }
}

impl Threaded for ThreadedPlate {
    fn thread_spec(&self) -> &ThreadSpec {
        &self.spec.thread
    }

    fn threaded_length(&self) -> Quantity {
        self.spec.threaded_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::standard::generic_aluminum;

    fn tapped_plate() -> ThreadedPlateSpec {
        ThreadedPlateSpec {
            thread: "1/2-13 UNC".parse().unwrap(),
            thickness: Quantity::inches(0.5),
            threaded_length: Quantity::inches(0.4),
            clearance_hole_diameter: Quantity::inches(0.53125),
            thread_location: None,
        }
    }

    #[test]
    fn test_valid_plate() {
        let plate = ThreadedPlate::new(tapped_plate(), generic_aluminum()).unwrap();
        assert_eq!(plate.thickness(), Quantity::inches(0.5));
        assert_eq!(plate.threaded_length(), Quantity::inches(0.4));
        assert_eq!(plate.thread_location()[0].value, 0.0);
    }

    #[test]
    fn test_threaded_length_within_thickness() {
        let mut spec = tapped_plate();
        spec.threaded_length = Quantity::inches(0.6);
        assert!(ThreadedPlate::new(spec, generic_aluminum()).is_err());
    }

    #[test]
    fn test_clearance_hole() {
        let mut spec = tapped_plate();
        spec.clearance_hole_diameter = Quantity::inches(0.4);
        assert!(ThreadedPlate::new(spec, generic_aluminum()).is_err());
    }

    #[test]
    fn test_location_must_be_lengths() {
        let mut spec = tapped_plate();
        spec.thread_location = Some([Quantity::inches(1.0), Quantity::newtons(1.0)]);
        assert!(ThreadedPlate::new(spec, generic_aluminum()).is_err());
    }
}
