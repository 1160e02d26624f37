//! Fasteners (bolts and screws).

use serde::{Deserialize, Serialize};

use super::{positive_length, Component, ComponentId, Threaded};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Material;
use crate::threads::ThreadSpec;
use crate::units::Quantity;

/// Head seating style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadStyle {
    /// Hex or socket head bearing on the top surface
    #[default]
    Protruding,
    /// Countersunk head seated flush
    Flat,
}

/// Dimensioned inputs for a [`Fastener`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "thread": "1/2-13 UNC",
///   "length": { "value": 2.5, "unit": "in" },
///   "threaded_length": { "value": 1.5, "unit": "in" },
///   "head_diameter": { "value": 0.75, "unit": "in" },
///   "head_height": { "value": 0.375, "unit": "in" },
///   "head_style": "protruding",
///   "tool_size": "3/4"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerSpec {
    pub thread: ThreadSpec,
    pub length: Quantity,
    pub threaded_length: Quantity,
    pub head_diameter: Quantity,
    pub head_height: Quantity,
    #[serde(default)]
    pub head_style: HeadStyle,
    #[serde(default)]
    pub tool_size: Option<String>,
}

/// A validated fastener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fastener {
    id: ComponentId,
    #[serde(flatten)]
    spec: FastenerSpec,
    material: Material,
}

impl Fastener {
    /// Build a fastener.
    ///
    /// # Errors
    ///
    /// - non-positive length, threaded length, head diameter or head height
    /// - total length not greater than threaded length
    /// - head diameter not greater than the thread pitch diameter
    pub fn new(spec: FastenerSpec, material: Material) -> CalcResult<Self> {
        let length_m = positive_length("length", &spec.length)?;
        let threaded_m = positive_length("threaded_length", &spec.threaded_length)?;
        let head_diameter_m = positive_length("head_diameter", &spec.head_diameter)?;
        positive_length("head_height", &spec.head_height)?;

        if length_m <= threaded_m {
            return Err(CalcError::invalid_input(
                "length",
                spec.length.to_string(),
                format!("Total length must be greater than threaded length ({})", spec.threaded_length),
            ));
        }
        if head_diameter_m <= spec.thread.pitch_diameter_m() {
            return Err(CalcError::invalid_input(
                "head_diameter",
                spec.head_diameter.to_string(),
                format!("Head diameter must be greater than the pitch diameter of {}", spec.thread),
            ));
        }

        Ok(Fastener {
            id: ComponentId::new(),
            spec,
            material,
        })
    }

    pub fn spec(&self) -> &FastenerSpec {
        &self.spec
    }

    pub fn length(&self) -> Quantity {
        self.spec.length
    }

    pub fn head_diameter(&self) -> Quantity {
        self.spec.head_diameter
    }

    pub fn head_height(&self) -> Quantity {
        self.spec.head_height
    }

    pub fn head_style(&self) -> HeadStyle {
        self.spec.head_style
    }

    pub fn is_flat_head(&self) -> bool {
        self.spec.head_style == HeadStyle::Flat
    }

    pub fn tool_size(&self) -> Option<&str> {
        self.spec.tool_size.as_deref()
    }

    /// Nominal (major) diameter in meters
    pub fn nominal_diameter_m(&self) -> f64 {
        self.spec.thread.nominal_diameter_m()
    }

    /// Gross shank area π/4·D² in m²
    pub fn nominal_area_m2(&self) -> f64 {
        let d = self.nominal_diameter_m();
        std::f64::consts::FRAC_PI_4 * d * d
    }
}

impl Component for Fastener {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl Threaded for Fastener {
    fn thread_spec(&self) -> &ThreadSpec {
        &self.spec.thread
    }

    fn threaded_length(&self) -> Quantity {
        self.spec.threaded_length
    }
}
