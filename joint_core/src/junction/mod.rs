//! # Junction
//!
//! A complete bolted joint: one fastener, an ordered stack of clamped
//! components (head side first) and one threaded member.
//!
//! ## Assembly Rules
//!
//! A junction is validated when built and after every mutation:
//!
//! 1. At least one clamped component
//! 2. No component instance appears twice in the stack
//! 3. Fastener and member threads are compatible
//! 4. Thread engagement ≥ 0.5 × nominal diameter
//! 5. Fastener length > stack-up thickness
//!
//! Mutations build a candidate junction, validate it, and only then replace
//! `self`. A rejected mutation leaves the junction untouched.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::components::{Fastener, FastenerSpec, HeadStyle, Nut, Plate};
//! use joint_core::junction::{JointConfiguration, Junction};
//! use joint_core::materials::standard::{generic_aluminum, generic_steel};
//! use joint_core::units::Quantity;
//!
//! let thread: joint_core::threads::ThreadSpec = "1/2-13 UNC".parse().unwrap();
//! let bolt = Fastener::new(
//!     FastenerSpec {
//!         thread: thread.clone(),
//!         length: Quantity::inches(2.5),
//!         threaded_length: Quantity::inches(1.5),
//!         head_diameter: Quantity::inches(0.75),
//!         head_height: Quantity::inches(0.375),
//!         head_style: HeadStyle::Protruding,
//!         tool_size: None,
//!     },
//!     generic_steel(),
//! )
//! .unwrap();
//! let nut = Nut::new(thread, Quantity::inches(0.75), Quantity::inches(0.375), generic_steel()).unwrap();
//! let plates = vec![
//!     Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
//!     Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
//! ];
//!
//! let junction = Junction::new(bolt, plates, nut.into()).unwrap();
//! assert_eq!(junction.configuration_type(), JointConfiguration::ThroughBolt);
//! assert!((junction.stack_up_thickness().value - 1.375).abs() < 1e-9);
//! ```

pub mod configuration;
pub mod stiffness;

pub use configuration::JointConfiguration;
pub use stiffness::{EffectiveSection, JointGeometry, Layer, StiffnessModel};

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::components::{Clamped, ClampedComponent, Component, Fastener, Threaded, ThreadedMember};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Quantity, Unit};

/// Lengths within this many meters compare as equal in assembly checks
const LENGTH_TOLERANCE_M: f64 = 1e-9;

/// Minimum thread engagement as a fraction of nominal diameter
pub const MIN_ENGAGEMENT_RATIO: f64 = 0.5;

/// A validated bolted joint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Junction {
    fastener: Fastener,
    clamped_components: Vec<ClampedComponent>,
    threaded_member: ThreadedMember,
    configuration: JointConfiguration,
}

impl Junction {
    pub fn new(
        fastener: Fastener,
        clamped_components: Vec<ClampedComponent>,
        threaded_member: ThreadedMember,
    ) -> CalcResult<Self> {
        let configuration = Self::classify_parts(&fastener, &threaded_member);
        let junction = Junction {
            fastener,
            clamped_components,
            threaded_member,
            configuration,
        };
        junction.validate()?;
        debug!(
            configuration = %junction.configuration,
            components = junction.clamped_components.len(),
            "junction assembled"
        );
        Ok(junction)
    }

    fn classify_parts(fastener: &Fastener, member: &ThreadedMember) -> JointConfiguration {
        JointConfiguration::classify(fastener.is_flat_head(), member.is_threaded_plate())
    }

    /// Re-derive the configuration from the current parts
    pub fn classify(&self) -> JointConfiguration {
        Self::classify_parts(&self.fastener, &self.threaded_member)
    }

    fn validate(&self) -> CalcResult<()> {
        if self.clamped_components.is_empty() {
            return Err(CalcError::EmptyStack);
        }

        let mut seen = HashSet::new();
        for component in &self.clamped_components {
            if !seen.insert(component.id()) {
                return Err(CalcError::DuplicateComponent {
                    id: component.id().to_string(),
                });
            }
        }

        let bolt_thread = self.fastener.thread_spec();
        let member_thread = self.threaded_member.thread_spec();
        if !bolt_thread.is_compatible(member_thread) {
            return Err(CalcError::IncompatibleThreads {
                fastener: bolt_thread.to_string(),
                member: member_thread.to_string(),
            });
        }

        let engagement_m = self.thread_engagement_m();
        let required_m = MIN_ENGAGEMENT_RATIO * self.fastener.nominal_diameter_m();
        if engagement_m + LENGTH_TOLERANCE_M < required_m {
            let unit = self.fastener.threaded_length().unit;
            return Err(CalcError::InsufficientEngagement {
                engagement: Quantity::from_si(engagement_m, unit).to_string(),
                required: Quantity::from_si(required_m, unit).to_string(),
            });
        }

        let length_m = self.fastener.length().si_value();
        let stack_up_m = self.stack_up_thickness_m();
        if length_m <= stack_up_m + LENGTH_TOLERANCE_M {
            return Err(CalcError::InsufficientFastenerLength {
                length: self.fastener.length().to_string(),
                required: self.stack_up_thickness().to_string(),
            });
        }

        Ok(())
    }

    /// Validate a candidate and swap it in
    fn commit(&mut self, mut candidate: Junction) -> CalcResult<()> {
        candidate.configuration = candidate.classify();
        candidate.validate()?;
        if candidate.configuration != self.configuration {
            debug!(from = %self.configuration, to = %candidate.configuration, "junction reclassified");
        }
        *self = candidate;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn fastener(&self) -> &Fastener {
        &self.fastener
    }

    pub fn clamped_components(&self) -> &[ClampedComponent] {
        &self.clamped_components
    }

    pub fn threaded_member(&self) -> &ThreadedMember {
        &self.threaded_member
    }

    pub fn configuration_type(&self) -> JointConfiguration {
        self.configuration
    }

    /// Unit of the first clamped component, used for reported lengths
    fn report_unit(&self) -> Unit {
        self.clamped_components
            .first()
            .map(|c| c.thickness().unit)
            .unwrap_or(Unit::Millimeter)
    }

    pub fn grip_length_m(&self) -> f64 {
        self.clamped_components.iter().map(|c| c.thickness_m()).sum()
    }

    /// Total clamped thickness, excluding the threaded member
    pub fn grip_length(&self) -> Quantity {
        Quantity::from_si(self.grip_length_m(), self.report_unit())
    }

    pub fn stack_up_thickness_m(&self) -> f64 {
        self.grip_length_m() + self.threaded_member.engaged_thickness().si_value()
    }

    /// Grip length plus the engaged thickness of the threaded member
    pub fn stack_up_thickness(&self) -> Quantity {
        Quantity::from_si(self.stack_up_thickness_m(), self.report_unit())
    }

    pub fn thread_engagement_m(&self) -> f64 {
        self.fastener
            .threaded_length_m()
            .min(self.threaded_member.threaded_length_m())
    }

    /// Overlapping threaded length of fastener and member
    pub fn thread_engagement(&self) -> Quantity {
        Quantity::from_si(self.thread_engagement_m(), self.fastener.threaded_length().unit)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    pub fn add_clamped_component(&mut self, component: impl Into<ClampedComponent>) -> CalcResult<()> {
        let mut candidate = self.clone();
        candidate.clamped_components.push(component.into());
        self.commit(candidate)
    }

    pub fn insert_clamped_component(
        &mut self,
        index: usize,
        component: impl Into<ClampedComponent>,
    ) -> CalcResult<()> {
        let len = self.clamped_components.len();
        if index > len {
            return Err(CalcError::IndexOutOfRange { index, len });
        }
        let mut candidate = self.clone();
        candidate.clamped_components.insert(index, component.into());
        self.commit(candidate)
    }

    /// Remove and return the component at `index`
    pub fn remove_clamped_component(&mut self, index: usize) -> CalcResult<ClampedComponent> {
        let len = self.clamped_components.len();
        if index >= len {
            return Err(CalcError::IndexOutOfRange { index, len });
        }
        let mut candidate = self.clone();
        let removed = candidate.clamped_components.remove(index);
        self.commit(candidate)?;
        Ok(removed)
    }

    pub fn set_clamped_components(&mut self, components: Vec<ClampedComponent>) -> CalcResult<()> {
        let mut candidate = self.clone();
        candidate.clamped_components = components;
        self.commit(candidate)
    }

    pub fn set_fastener(&mut self, fastener: Fastener) -> CalcResult<()> {
        let mut candidate = self.clone();
        candidate.fastener = fastener;
        self.commit(candidate)
    }

    pub fn set_threaded_member(&mut self, member: impl Into<ThreadedMember>) -> CalcResult<()> {
        let mut candidate = self.clone();
        candidate.threaded_member = member.into();
        self.commit(candidate)
    }

    // ------------------------------------------------------------------------
    // Stiffness
    // ------------------------------------------------------------------------

    /// SI snapshot of the geometry the stiffness model reads
    pub fn geometry(&self) -> JointGeometry {
        JointGeometry {
            layers: self
                .clamped_components
                .iter()
                .map(|c| Layer {
                    thickness_m: c.thickness_m(),
                    modulus_pa: c.material().elastic_modulus_pa(),
                })
                .collect(),
            diameter_m: self.fastener.nominal_diameter_m(),
            bolt_modulus_pa: self.fastener.material().elastic_modulus_pa(),
            head_height_m: self.fastener.head_height().si_value(),
            head_diameter_m: self.fastener.head_diameter().si_value(),
            member_threaded_length_m: self.threaded_member.threaded_length_m(),
        }
    }

    pub fn stiffness_model(&self) -> &'static StiffnessModel {
        StiffnessModel::for_configuration(self.configuration)
    }

    /// Effective length, diameter and joint modulus
    pub fn effective_section(&self) -> CalcResult<EffectiveSection> {
        self.stiffness_model().effective_section(&self.geometry())
    }

    /// Bolt stiffness K_b in N/m
    pub fn calculate_bolt_stiffness(&self) -> CalcResult<f64> {
        let k_b = self.stiffness_model().bolt_stiffness(&self.geometry())?;
        debug!(configuration = %self.configuration, k_b, "bolt stiffness");
        Ok(k_b)
    }

    /// Joint stiffness K_j in N/m
    pub fn calculate_joint_stiffness(&self) -> CalcResult<f64> {
        let k_j = self.stiffness_model().joint_stiffness(&self.geometry())?;
        debug!(configuration = %self.configuration, k_j, "joint stiffness");
        Ok(k_j)
    }

    /// Stiffness factor Φ in (0, 1)
    pub fn calculate_stiffness_factor(&self) -> CalcResult<f64> {
        self.stiffness_model().stiffness_factor(&self.geometry())
    }

    /// Loading plane factor n in (0, 1]
    pub fn calculate_loading_plane_factor(&self) -> CalcResult<f64> {
        self.stiffness_model().loading_plane_factor(&self.geometry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{FastenerSpec, HeadStyle, Nut, Plate, ThreadedPlate, ThreadedPlateSpec, Washer};
    use crate::materials::standard::{generic_aluminum, generic_steel};
    use crate::threads::ThreadSpec;
    use approx::assert_relative_eq;

    fn thread() -> ThreadSpec {
        "1/2-13 UNC".parse().unwrap()
    }

    fn bolt(length_in: f64, head_style: HeadStyle) -> Fastener {
        Fastener::new(
            FastenerSpec {
                thread: thread(),
                length: Quantity::inches(length_in),
                threaded_length: Quantity::inches(1.0),
                head_diameter: Quantity::inches(0.875),
                head_height: Quantity::inches(0.25),
                head_style,
                tool_size: None,
            },
            generic_steel(),
        )
        .unwrap()
    }

    fn nut() -> Nut {
        Nut::new(thread(), Quantity::inches(0.75), Quantity::inches(0.375), generic_steel()).unwrap()
    }

    fn plate(t_in: f64) -> ClampedComponent {
        Plate::new(Quantity::inches(t_in), generic_aluminum()).unwrap().into()
    }

    fn tapped(threaded_in: f64) -> ThreadedPlate {
        ThreadedPlate::new(
            ThreadedPlateSpec {
                thread: thread(),
                thickness: Quantity::inches(1.0),
                threaded_length: Quantity::inches(threaded_in),
                clearance_hole_diameter: Quantity::inches(0.53),
                thread_location: None,
            },
            generic_aluminum(),
        )
        .unwrap()
    }

    fn through_bolt() -> Junction {
        Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5), plate(0.5)], nut().into()).unwrap()
    }

    #[test]
    fn test_lengths() {
        let j = through_bolt();
        assert_eq!(j.grip_length().unit, Unit::Inch);
        assert_relative_eq!(j.grip_length().value, 1.0, epsilon = 1e-9);
        assert_relative_eq!(j.stack_up_thickness().value, 1.375, epsilon = 1e-9);
        assert_relative_eq!(j.thread_engagement().value, 0.375, epsilon = 1e-9);
    }

    #[test]
    fn test_lengths_follow_first_component_unit() {
        let first: ClampedComponent = Plate::new(Quantity::millimeters(10.0), generic_aluminum()).unwrap().into();
        let j = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![first, plate(0.5)], nut().into()).unwrap();
        assert_eq!(j.grip_length().unit, Unit::Millimeter);
        assert_relative_eq!(j.grip_length().value, 22.7, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_stack_rejected() {
        let err = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![], nut().into()).unwrap_err();
        assert_eq!(err, CalcError::EmptyStack);
    }

    #[test]
    fn test_duplicate_rejected() {
        let p = plate(0.5);
        let err = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![p.clone(), p], nut().into()).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_COMPONENT");
    }

    #[test]
    fn test_incompatible_threads() {
        let fine = Nut::new(
            "1/2-20 UNF".parse().unwrap(),
            Quantity::inches(0.75),
            Quantity::inches(0.375),
            generic_steel(),
        )
        .unwrap();
        let err = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5)], fine.into()).unwrap_err();
        assert_eq!(err.error_code(), "INCOMPATIBLE_THREADS");
    }

    #[test]
    fn test_short_engagement() {
        let thin_nut = Nut::new(thread(), Quantity::inches(0.75), Quantity::inches(0.2), generic_steel()).unwrap();
        let err = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5)], thin_nut.into()).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_ENGAGEMENT");
    }

    #[test]
    fn test_fastener_length_strict() {
        let err =
            Junction::new(bolt(1.375, HeadStyle::Protruding), vec![plate(0.5), plate(0.5)], nut().into()).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_FASTENER_LENGTH");
        assert!(Junction::new(bolt(1.4, HeadStyle::Protruding), vec![plate(0.5), plate(0.5)], nut().into()).is_ok());
    }

    #[test]
    fn test_classification() {
        assert_eq!(through_bolt().configuration_type(), JointConfiguration::ThroughBolt);

        let j = Junction::new(bolt(2.5, HeadStyle::Flat), vec![plate(0.5), plate(0.5)], nut().into()).unwrap();
        assert_eq!(j.configuration_type(), JointConfiguration::FlatHeadThrough);

        let j = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5), plate(0.5)], tapped(0.5).into())
            .unwrap();
        assert_eq!(j.configuration_type(), JointConfiguration::ThreadedEnd);
        assert_eq!(j.classify(), j.classify());
    }

    #[test]
    fn test_reclassify_on_replacement() {
        let mut j = through_bolt();
        j.set_fastener(bolt(2.5, HeadStyle::Flat)).unwrap();
        assert_eq!(j.configuration_type(), JointConfiguration::FlatHeadThrough);
        j.set_threaded_member(tapped(0.5)).unwrap();
        assert_eq!(j.configuration_type(), JointConfiguration::FlatHeadThreaded);
        j.set_threaded_member(nut()).unwrap();
        assert_eq!(j.configuration_type(), JointConfiguration::FlatHeadThrough);
    }

    #[test]
    fn test_failed_mutation_rolls_back() {
        let mut j = through_bolt();
        let before = j.clone();

        // shorter than the 1.375" stack-up
        assert!(j.set_fastener(bolt(1.3, HeadStyle::Flat)).is_err());
        assert_eq!(j, before);

        let existing = j.clamped_components()[0].clone();
        assert!(j.add_clamped_component(existing).is_err());
        assert_eq!(j, before);

        assert!(j.add_clamped_component(plate(1.5)).is_err());
        assert_eq!(j, before);
        assert_eq!(j.configuration_type(), JointConfiguration::ThroughBolt);
    }

    #[test]
    fn test_add_insert_remove() {
        let mut j = through_bolt();
        let washer = Washer::new(
            Quantity::inches(0.53),
            Quantity::inches(1.0),
            Quantity::inches(0.1),
            generic_steel(),
        )
        .unwrap();
        j.insert_clamped_component(0, washer.clone()).unwrap();
        assert_eq!(j.clamped_components()[0].id(), washer.id());
        assert_relative_eq!(j.grip_length().value, 1.1, epsilon = 1e-9);

        j.add_clamped_component(plate(0.25)).unwrap();
        assert_eq!(j.clamped_components().len(), 4);

        let removed = j.remove_clamped_component(0).unwrap();
        assert_eq!(removed.kind(), "Washer");
        assert_relative_eq!(j.grip_length_m(), 1.25 * 0.0254, epsilon = 1e-12);

        assert_eq!(
            j.remove_clamped_component(9).unwrap_err(),
            CalcError::IndexOutOfRange { index: 9, len: 3 }
        );
        assert!(j.insert_clamped_component(5, plate(0.1)).is_err());
    }

    #[test]
    fn test_cannot_remove_last_component() {
        let mut j = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5)], nut().into()).unwrap();
        assert_eq!(j.remove_clamped_component(0).unwrap_err(), CalcError::EmptyStack);
        assert_eq!(j.clamped_components().len(), 1);
    }

    #[test]
    fn test_set_clamped_components_round_trip() {
        let mut j = through_bolt();
        let original = j.clamped_components().to_vec();
        let grip = j.grip_length_m();
        let stack = j.stack_up_thickness_m();

        j.set_clamped_components(vec![plate(0.75)]).unwrap();
        j.set_clamped_components(original).unwrap();
        assert_relative_eq!(j.grip_length_m(), grip, epsilon = 1e-12);
        assert_relative_eq!(j.stack_up_thickness_m(), stack, epsilon = 1e-12);
    }

    #[test]
    fn test_stiffness_through_bolt() {
        let j = through_bolt();
        assert_relative_eq!(j.calculate_joint_stiffness().unwrap(), 3.7271e8, max_relative = 1e-3);
        assert_relative_eq!(j.calculate_bolt_stiffness().unwrap(), 9.9746e8, max_relative = 1e-3);
        assert_relative_eq!(j.calculate_stiffness_factor().unwrap(), 0.72798, max_relative = 1e-3);
        assert_eq!(j.calculate_loading_plane_factor().unwrap(), 1.0);
    }

    #[test]
    fn test_threaded_end_uses_member_threaded_length() {
        let j = Junction::new(bolt(2.5, HeadStyle::Protruding), vec![plate(0.5), plate(0.5)], tapped(0.4).into())
            .unwrap();
        assert_relative_eq!(j.stack_up_thickness().value, 1.4, epsilon = 1e-9);
        assert_relative_eq!(j.effective_section().unwrap().length_m, 0.8 * 0.0254, epsilon = 1e-12);
        assert_relative_eq!(j.calculate_loading_plane_factor().unwrap(), 0.8, epsilon = 1e-12);
    }
}
