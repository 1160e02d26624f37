//! Nuts.

use serde::Serialize;

use super::{positive_length, Component, ComponentId, Threaded};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Material;
use crate::threads::ThreadSpec;
use crate::units::Quantity;

/// A validated hex nut. Its threaded length is its full height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nut {
    id: ComponentId,
    thread: ThreadSpec,
    width_across_flats: Quantity,
    height: Quantity,
    material: Material,
}

impl Nut {
    pub fn new(
        thread: ThreadSpec,
        width_across_flats: Quantity,
        height: Quantity,
        material: Material,
    ) -> CalcResult<Self> {
        let waf_m = positive_length("width_across_flats", &width_across_flats)?;
        positive_length("height", &height)?;
        if waf_m <= thread.pitch_diameter_m() {
            return Err(CalcError::invalid_input(
                "width_across_flats",
                width_across_flats.to_string(),
                format!("Width across flats must be greater than the pitch diameter of {}", thread),
            ));
        }
        Ok(Nut {
            id: ComponentId::new(),
            thread,
            width_across_flats,
            height,
            material,
        })
    }

    pub fn width_across_flats(&self) -> Quantity {
        self.width_across_flats
    }

    pub fn height(&self) -> Quantity {
        self.height
    }
}

impl Component for Nut {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl Threaded for Nut {
    fn thread_spec(&self) -> &ThreadSpec {
        &self.thread
    }

    fn threaded_length(&self) -> Quantity {
        self.height
    }
}
