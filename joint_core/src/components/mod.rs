//! # Joint Components
//!
//! Fasteners, nuts, washers, plates and threaded plates. Each component is
//! validated when it is built and is immutable afterwards.
//!
//! ## Capabilities
//!
//! Components are not arranged in a class hierarchy. Instead they expose
//! independent capabilities:
//!
//! - [`Component`] - identity and material (every component)
//! - [`Clamped`] - a thickness in the clamped stack (washer, plate, threaded plate)
//! - [`Threaded`] - a thread specification and threaded length (fastener, nut, threaded plate)
//!
//! The junction stores clamped parts as [`ClampedComponent`] and the mating
//! part as [`ThreadedMember`], and only talks to them through these traits.
//!
//! ## Identity
//!
//! Every component gets a fresh [`ComponentId`] when built. Clones keep the
//! id, so adding a clone of a part already in a stack is a duplicate.

pub mod clamped;
pub mod fastener;
pub mod nut;
pub mod threaded_plate;

pub use clamped::{Plate, Washer};
pub use fastener::{Fastener, FastenerSpec, HeadStyle};
pub use nut::Nut;
pub use threaded_plate::{ThreadedPlate, ThreadedPlateSpec};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::materials::Material;
use crate::threads::ThreadSpec;
use crate::units::{Dimension, Quantity};

/// Unique identity of a component instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(Uuid);

impl ComponentId {
    pub fn new() -> Self {
        ComponentId(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared by every component
pub trait Component {
    fn id(&self) -> ComponentId;
    fn material(&self) -> &Material;
}

/// Parts that contribute a thickness to the clamped stack
pub trait Clamped: Component {
    fn thickness(&self) -> Quantity;

    /// Thickness in meters
    fn thickness_m(&self) -> f64 {
        self.thickness().si_value()
    }
}

/// Parts that carry a thread
pub trait Threaded: Component {
    fn thread_spec(&self) -> &ThreadSpec;
    fn threaded_length(&self) -> Quantity;

    /// Threaded length in meters
    fn threaded_length_m(&self) -> f64 {
        self.threaded_length().si_value()
    }
}

/// Require a strictly positive length, returning meters
pub(crate) fn positive_length(field: &str, q: &Quantity) -> CalcResult<f64> {
    q.require_positive(field, Dimension::Length)
}

// ============================================================================
// Clamped stack entries
// ============================================================================

/// A component in the clamped stack
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ClampedComponent {
    Washer(Washer),
    Plate(Plate),
}

impl ClampedComponent {
    fn as_clamped(&self) -> &dyn Clamped {
        match self {
            ClampedComponent::Washer(w) => w,
            ClampedComponent::Plate(p) => p,
        }
    }

    /// Component kind as a string
    pub fn kind(&self) -> &'static str {
        match self {
            ClampedComponent::Washer(_) => "Washer",
            ClampedComponent::Plate(_) => "Plate",
        }
    }
}

impl Component for ClampedComponent {
    fn id(&self) -> ComponentId {
        self.as_clamped().id()
    }

    fn material(&self) -> &Material {
        self.as_clamped().material()
    }
}

impl Clamped for ClampedComponent {
    fn thickness(&self) -> Quantity {
        self.as_clamped().thickness()
    }
}

impl From<Washer> for ClampedComponent {
    fn from(washer: Washer) -> Self {
        ClampedComponent::Washer(washer)
    }
}

impl From<Plate> for ClampedComponent {
    fn from(plate: Plate) -> Self {
        ClampedComponent::Plate(plate)
    }
}

// ============================================================================
// Threaded members
// ============================================================================

/// The part the fastener threads into
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ThreadedMember {
    Nut(Nut),
    ThreadedPlate(ThreadedPlate),
}

impl ThreadedMember {
    fn as_threaded(&self) -> &dyn Threaded {
        match self {
            ThreadedMember::Nut(n) => n,
            ThreadedMember::ThreadedPlate(p) => p,
        }
    }

    /// True for a blind tapped hole rather than a nut
    pub fn is_threaded_plate(&self) -> bool {
        matches!(self, ThreadedMember::ThreadedPlate(_))
    }

    /// Thickness of this member that the fastener must reach through:
    /// nut height, or the tapped depth of a threaded plate.
    pub fn engaged_thickness(&self) -> Quantity {
        match self {
            ThreadedMember::Nut(n) => n.height(),
            ThreadedMember::ThreadedPlate(p) => p.threaded_length(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ThreadedMember::Nut(_) => "Nut",
            ThreadedMember::ThreadedPlate(_) => "ThreadedPlate",
        }
    }
}

impl Component for ThreadedMember {
    fn id(&self) -> ComponentId {
        self.as_threaded().id()
    }

    fn material(&self) -> &Material {
        self.as_threaded().material()
    }
}

impl Threaded for ThreadedMember {
    fn thread_spec(&self) -> &ThreadSpec {
        self.as_threaded().thread_spec()
    }

    fn threaded_length(&self) -> Quantity {
        self.as_threaded().threaded_length()
    }
}

impl From<Nut> for ThreadedMember {
    fn from(nut: Nut) -> Self {
        ThreadedMember::Nut(nut)
    }
}

impl From<ThreadedPlate> for ThreadedMember {
    fn from(plate: ThreadedPlate) -> Self {
        ThreadedMember::ThreadedPlate(plate)
    }
}
