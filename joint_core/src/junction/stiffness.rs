//! # Bolt and Joint Stiffness
//!
//! Pressure-cone stiffness model of NASA-TM-106943, one formula family per
//! [`JointConfiguration`].
//!
//! ## Effective Section
//!
//! | Configuration        | Length `L`                  | Joint modulus `E_j`     |
//! |----------------------|-----------------------------|-------------------------|
//! | `THROUGH_BOLT`       | Σt                          | L / (2π·Σ(t/E))         |
//! | `FLAT_HEAD_THROUGH`  | Σt − h_h/2                  | L / √Σ(t/E)             |
//! | `THREADED_END`       | Σt, last layer − l_t/2      | L / Σ(t/E), adjusted    |
//! | `FLAT_HEAD_THREADED` | first − h_h/2, last − l_t/2 | L / Σ(t/E), adjusted    |
//!
//! `h_h` is the head height and `l_t` the threaded length of the member.
//!
//! ## Joint Stiffness
//!
//! ```text
//! THROUGH_BOLT        K_j = π·E_j·D / (2·|ln((L+0.5D)/(L+2.5D))|)
//! FLAT_HEAD_THROUGH   K_j = π·E_j·D / |ln(((L+d_w−D)(d_w+D)(L+0.5D)) / ((L+d_w+D)(d_w−D)(L+2.5D)))|
//! THREADED_END        K_j = π·E_j·D / |ln((2L+0.5D)/(2L+2.5D))|
//! FLAT_HEAD_THREADED  K_j = π·E_j·D / |ln(((L+d_w−D)(d_w+D)) / ((L+d_w+D)(d_w−D)))|
//! ```
//!
//! with `d_w = (head diameter + D)/2`. A log argument that is not strictly
//! positive, or a ratio of 1, is an invalid geometry rather than NaN or ∞.
//!
//! ## Stiffness and Loading Plane Factors
//!
//! ```text
//! K_b = (π/4·D²)·E_b / L
//! Φ   = K_b / (K_b + K_j)
//! n   = (grip − offsets) / grip
//! ```
//!
//! The loading plane offsets mirror the effective length adjustments but
//! are always taken relative to the unadjusted grip.
//!
//! All values are SI: m, Pa, N/m.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};

use super::configuration::JointConfiguration;
use crate::errors::{CalcError, CalcResult};

/// Smallest |ln(arg)| accepted before the cone ratio counts as degenerate
const MIN_LOG_MAGNITUDE: f64 = 1e-12;

/// One clamped layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub thickness_m: f64,
    pub modulus_pa: f64,
}

/// Everything the stiffness formulas read from a junction, in SI units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointGeometry {
    /// Clamped stack, head side first
    pub layers: Vec<Layer>,
    /// Fastener nominal diameter
    pub diameter_m: f64,
    pub bolt_modulus_pa: f64,
    pub head_height_m: f64,
    pub head_diameter_m: f64,
    /// Threaded length of the mating member
    pub member_threaded_length_m: f64,
}

impl JointGeometry {
    pub fn grip_length_m(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness_m).sum()
    }
}

/// Effective length, diameter and joint modulus for one configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSection {
    pub length_m: f64,
    pub diameter_m: f64,
    pub modulus_pa: f64,
}

type SectionFn = fn(&JointGeometry) -> CalcResult<EffectiveSection>;
type ConeFn = fn(&JointGeometry, &EffectiveSection) -> CalcResult<f64>;
type OffsetFn = fn(&JointGeometry) -> f64;

/// Formula family for one joint configuration
pub struct StiffnessModel {
    pub configuration: JointConfiguration,
    section: SectionFn,
    cone: ConeFn,
    plane_offset: OffsetFn,
}

static THROUGH_BOLT: StiffnessModel = StiffnessModel {
    configuration: JointConfiguration::ThroughBolt,
    section: through_bolt_section,
    cone: through_bolt_cone,
    plane_offset: no_offset,
};

static FLAT_HEAD_THROUGH: StiffnessModel = StiffnessModel {
    configuration: JointConfiguration::FlatHeadThrough,
    section: flat_head_through_section,
    cone: flat_head_through_cone,
    plane_offset: head_offset,
};

static THREADED_END: StiffnessModel = StiffnessModel {
    configuration: JointConfiguration::ThreadedEnd,
    section: threaded_end_section,
    cone: threaded_end_cone,
    plane_offset: far_offset,
};

static FLAT_HEAD_THREADED: StiffnessModel = StiffnessModel {
    configuration: JointConfiguration::FlatHeadThreaded,
    section: flat_head_threaded_section,
    cone: flat_head_threaded_cone,
    plane_offset: head_and_far_offset,
};

impl StiffnessModel {
    pub fn for_configuration(configuration: JointConfiguration) -> &'static StiffnessModel {
        match configuration {
            JointConfiguration::ThroughBolt => &THROUGH_BOLT,
            JointConfiguration::FlatHeadThrough => &FLAT_HEAD_THROUGH,
            JointConfiguration::ThreadedEnd => &THREADED_END,
            JointConfiguration::FlatHeadThreaded => &FLAT_HEAD_THREADED,
        }
    }

    pub fn effective_section(&self, geometry: &JointGeometry) -> CalcResult<EffectiveSection> {
        if geometry.layers.is_empty() {
            return Err(CalcError::EmptyStack);
        }
        let section = (self.section)(geometry)?;
        if !(section.modulus_pa.is_finite() && section.modulus_pa > 0.0) {
            return Err(self.invalid(format!(
                "Effective joint modulus {} Pa is not positive",
                section.modulus_pa
            )));
        }
        Ok(section)
    }

    /// K_b in N/m
    pub fn bolt_stiffness(&self, geometry: &JointGeometry) -> CalcResult<f64> {
        let section = self.effective_section(geometry)?;
        let area = FRAC_PI_4 * section.diameter_m * section.diameter_m;
        Ok(area * geometry.bolt_modulus_pa / section.length_m)
    }

    /// K_j in N/m
    pub fn joint_stiffness(&self, geometry: &JointGeometry) -> CalcResult<f64> {
        let section = self.effective_section(geometry)?;
        (self.cone)(geometry, &section)
    }

    /// Φ = K_b / (K_b + K_j)
    pub fn stiffness_factor(&self, geometry: &JointGeometry) -> CalcResult<f64> {
        let k_b = self.bolt_stiffness(geometry)?;
        let k_j = self.joint_stiffness(geometry)?;
        Ok(k_b / (k_b + k_j))
    }

    /// n in (0, 1]
    pub fn loading_plane_factor(&self, geometry: &JointGeometry) -> CalcResult<f64> {
        let grip = geometry.grip_length_m();
        if grip <= 0.0 {
            return Err(CalcError::EmptyStack);
        }
        let n = (grip - (self.plane_offset)(geometry)) / grip;
        if !(n > 0.0 && n <= 1.0) {
            return Err(self.invalid(format!("Loading plane factor {} is outside (0, 1]", n)));
        }
        Ok(n)
    }

    fn invalid(&self, reason: String) -> CalcError {
        CalcError::invalid_geometry(self.configuration.name(), reason)
    }
}

// ============================================================================
// Loading plane offsets
// ============================================================================

fn no_offset(_g: &JointGeometry) -> f64 {
    0.0
}

fn head_offset(g: &JointGeometry) -> f64 {
    g.head_height_m / 2.0
}

fn far_offset(g: &JointGeometry) -> f64 {
    g.member_threaded_length_m / 2.0
}

fn head_and_far_offset(g: &JointGeometry) -> f64 {
    head_offset(g) + far_offset(g)
}

// ============================================================================
// Effective sections
// ============================================================================

fn compliance(layers: &[Layer]) -> f64 {
    layers.iter().map(|l| l.thickness_m / l.modulus_pa).sum()
}

fn total_thickness(layers: &[Layer]) -> f64 {
    layers.iter().map(|l| l.thickness_m).sum()
}

/// Length and compliance of the stack with the head-side and far-side
/// layers shortened. A single-layer stack takes both cuts. Individual layers
/// may go negative; only the totals must stay positive.
fn trimmed_totals(
    geometry: &JointGeometry,
    configuration: JointConfiguration,
    head_cut: f64,
    far_cut: f64,
) -> CalcResult<(f64, f64)> {
    let mut layers = geometry.layers.clone();
    let last = layers.len() - 1;
    layers[0].thickness_m -= head_cut;
    layers[last].thickness_m -= far_cut;

    let length = total_thickness(&layers);
    let flexibility = compliance(&layers);
    if length <= 0.0 || flexibility <= 0.0 {
        return Err(CalcError::invalid_geometry(
            configuration.name(),
            format!(
                "End adjustments leave no effective stack (length {} m, compliance {} m/Pa)",
                length, flexibility
            ),
        ));
    }
    Ok((length, flexibility))
}

fn through_bolt_section(g: &JointGeometry) -> CalcResult<EffectiveSection> {
    let length = total_thickness(&g.layers);
    Ok(EffectiveSection {
        length_m: length,
        diameter_m: g.diameter_m,
        modulus_pa: length / (2.0 * PI * compliance(&g.layers)),
    })
}

fn flat_head_through_section(g: &JointGeometry) -> CalcResult<EffectiveSection> {
    let length = total_thickness(&g.layers) - g.head_height_m / 2.0;
    if length <= 0.0 {
        return Err(CalcError::invalid_geometry(
            JointConfiguration::FlatHeadThrough.name(),
            format!("Head height {} m consumes the clamped stack", g.head_height_m),
        ));
    }
    Ok(EffectiveSection {
        length_m: length,
        diameter_m: g.diameter_m,
        modulus_pa: length / compliance(&g.layers).sqrt(),
    })
}

fn threaded_end_section(g: &JointGeometry) -> CalcResult<EffectiveSection> {
    let (length, compliance) =
        trimmed_totals(g, JointConfiguration::ThreadedEnd, 0.0, g.member_threaded_length_m / 2.0)?;
    Ok(EffectiveSection {
        length_m: length,
        diameter_m: g.diameter_m,
        modulus_pa: length / compliance,
    })
}

fn flat_head_threaded_section(g: &JointGeometry) -> CalcResult<EffectiveSection> {
    let (length, compliance) = trimmed_totals(
        g,
        JointConfiguration::FlatHeadThreaded,
        g.head_height_m / 2.0,
        g.member_threaded_length_m / 2.0,
    )?;
    Ok(EffectiveSection {
        length_m: length,
        diameter_m: g.diameter_m,
        modulus_pa: length / compliance,
    })
}

// ============================================================================
// Pressure cone
// ============================================================================

/// `numerator / |ln(arg)|`, rejecting non-positive and degenerate ratios
fn cone_stiffness(configuration: JointConfiguration, numerator: f64, arg: f64) -> CalcResult<f64> {
    if !(arg.is_finite() && arg > 0.0) {
        return Err(CalcError::invalid_geometry(
            configuration.name(),
            format!("Pressure cone log argument {} is not positive", arg),
        ));
    }
    let magnitude = arg.ln().abs();
    if magnitude < MIN_LOG_MAGNITUDE {
        return Err(CalcError::invalid_geometry(
            configuration.name(),
            "Pressure cone ratio is 1; joint stiffness is unbounded",
        ));
    }
    let k = numerator / magnitude;
    if !(k.is_finite() && k > 0.0) {
        return Err(CalcError::invalid_geometry(
            configuration.name(),
            format!("Joint stiffness {} N/m is not positive", k),
        ));
    }
    Ok(k)
}

/// Washer-face equivalent diameter of a countersunk head
fn bearing_diameter(g: &JointGeometry, configuration: JointConfiguration) -> CalcResult<f64> {
    if g.head_diameter_m <= g.diameter_m {
        return Err(CalcError::invalid_geometry(
            configuration.name(),
            format!(
                "Head diameter {} m must exceed fastener diameter {} m",
                g.head_diameter_m, g.diameter_m
            ),
        ));
    }
    Ok((g.head_diameter_m + g.diameter_m) / 2.0)
}

fn through_bolt_cone(_g: &JointGeometry, s: &EffectiveSection) -> CalcResult<f64> {
    let (l, d) = (s.length_m, s.diameter_m);
    let arg = (l + 0.5 * d) / (l + 2.5 * d);
    cone_stiffness(JointConfiguration::ThroughBolt, PI * s.modulus_pa * d / 2.0, arg)
}

fn flat_head_through_cone(g: &JointGeometry, s: &EffectiveSection) -> CalcResult<f64> {
    let config = JointConfiguration::FlatHeadThrough;
    let (l, d) = (s.length_m, s.diameter_m);
    let dw = bearing_diameter(g, config)?;
    let arg = ((l + dw - d) * (dw + d) * (l + 0.5 * d)) / ((l + dw + d) * (dw - d) * (l + 2.5 * d));
    cone_stiffness(config, PI * s.modulus_pa * d, arg)
}

fn threaded_end_cone(_g: &JointGeometry, s: &EffectiveSection) -> CalcResult<f64> {
    let (l, d) = (s.length_m, s.diameter_m);
    let arg = (2.0 * l + 0.5 * d) / (2.0 * l + 2.5 * d);
    cone_stiffness(JointConfiguration::ThreadedEnd, PI * s.modulus_pa * d, arg)
}

fn flat_head_threaded_cone(g: &JointGeometry, s: &EffectiveSection) -> CalcResult<f64> {
    let config = JointConfiguration::FlatHeadThreaded;
    let (l, d) = (s.length_m, s.diameter_m);
    let dw = bearing_diameter(g, config)?;
    let arg = ((l + dw - d) * (dw + d)) / ((l + dw + d) * (dw - d));
    cone_stiffness(config, PI * s.modulus_pa * d, arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IN: f64 = 0.0254;
    const E_AL: f64 = 69e9;
    const E_STEEL: f64 = 200e9;

    /// 1/2" bolt through two 0.5" aluminum plates
    fn half_inch_stack() -> JointGeometry {
        JointGeometry {
            layers: vec![
                Layer { thickness_m: 0.5 * IN, modulus_pa: E_AL },
                Layer { thickness_m: 0.5 * IN, modulus_pa: E_AL },
            ],
            diameter_m: 0.5 * IN,
            bolt_modulus_pa: E_STEEL,
            head_height_m: 0.25 * IN,
            head_diameter_m: 0.875 * IN,
            member_threaded_length_m: 0.4 * IN,
        }
    }

    #[test]
    fn test_through_bolt_values() {
        let model = StiffnessModel::for_configuration(JointConfiguration::ThroughBolt);
        let g = half_inch_stack();

        let section = model.effective_section(&g).unwrap();
        assert_relative_eq!(section.length_m, IN, epsilon = 1e-12);
        assert_relative_eq!(section.modulus_pa, E_AL / (2.0 * PI), max_relative = 1e-9);

        assert_relative_eq!(model.joint_stiffness(&g).unwrap(), 3.7271e8, max_relative = 1e-3);
        assert_relative_eq!(model.bolt_stiffness(&g).unwrap(), 9.9746e8, max_relative = 1e-3);
        assert_relative_eq!(model.stiffness_factor(&g).unwrap(), 0.72798, max_relative = 1e-3);
        assert_eq!(model.loading_plane_factor(&g).unwrap(), 1.0);
    }

    #[test]
    fn test_threaded_end_trims_last_layer() {
        let model = StiffnessModel::for_configuration(JointConfiguration::ThreadedEnd);
        let g = half_inch_stack();

        let section = model.effective_section(&g).unwrap();
        assert_relative_eq!(section.length_m, 0.8 * IN, epsilon = 1e-12);
        assert_relative_eq!(section.modulus_pa, E_AL, max_relative = 1e-9);
        assert_relative_eq!(model.joint_stiffness(&g).unwrap(), 6.3706e9, max_relative = 1e-3);
        assert_relative_eq!(model.loading_plane_factor(&g).unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_head_through() {
        let model = StiffnessModel::for_configuration(JointConfiguration::FlatHeadThrough);
        let g = half_inch_stack();

        let section = model.effective_section(&g).unwrap();
        assert_relative_eq!(section.length_m, 0.875 * IN, epsilon = 1e-12);
        let phi = model.stiffness_factor(&g).unwrap();
        assert!(phi > 0.0 && phi < 1.0);
        assert_relative_eq!(model.loading_plane_factor(&g).unwrap(), 0.875, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_head_threaded_single_layer_takes_both_cuts() {
        let model = StiffnessModel::for_configuration(JointConfiguration::FlatHeadThreaded);
        let mut g = half_inch_stack();
        g.layers = vec![Layer { thickness_m: IN, modulus_pa: E_AL }];

        let section = model.effective_section(&g).unwrap();
        assert_relative_eq!(section.length_m, (1.0 - 0.125 - 0.2) * IN, epsilon = 1e-12);
        assert!(model.joint_stiffness(&g).unwrap() > 0.0);
        assert_relative_eq!(model.loading_plane_factor(&g).unwrap(), 0.675, epsilon = 1e-12);
    }

    #[test]
    fn test_every_configuration_has_phi_in_unit_interval() {
        let g = half_inch_stack();
        for config in JointConfiguration::ALL {
            let model = StiffnessModel::for_configuration(config);
            assert_eq!(model.configuration, config);
            let phi = model.stiffness_factor(&g).unwrap();
            assert!(phi > 0.0 && phi < 1.0, "{}: phi = {}", config, phi);
        }
    }

    #[test]
    fn test_flat_head_rejects_small_head() {
        let mut g = half_inch_stack();
        g.head_diameter_m = 0.45 * IN;
        for config in [JointConfiguration::FlatHeadThrough, JointConfiguration::FlatHeadThreaded] {
            let err = StiffnessModel::for_configuration(config).joint_stiffness(&g).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_JOINT_GEOMETRY");
        }
        // protruding heads never read the head diameter
        assert!(StiffnessModel::for_configuration(JointConfiguration::ThroughBolt)
            .joint_stiffness(&g)
            .is_ok());
    }

    #[test]
    fn test_threaded_end_thin_sheet_on_tapped_block() {
        // 0.1" sheet on a 0.5" plate, 0.5" thread depth: the sheet is cut past zero
        let mut g = half_inch_stack();
        g.layers[1].thickness_m = 0.1 * IN;
        g.member_threaded_length_m = 0.5 * IN;
        let model = StiffnessModel::for_configuration(JointConfiguration::ThreadedEnd);

        let section = model.effective_section(&g).unwrap();
        assert_relative_eq!(section.length_m, 0.35 * IN, epsilon = 1e-12);
        assert_relative_eq!(section.modulus_pa, E_AL, max_relative = 1e-9);
        let phi = model.stiffness_factor(&g).unwrap();
        assert!(phi > 0.0 && phi < 1.0);
        assert_relative_eq!(model.loading_plane_factor(&g).unwrap(), 0.35 / 0.6, epsilon = 1e-12);

        let flat = StiffnessModel::for_configuration(JointConfiguration::FlatHeadThreaded);
        let phi = flat.stiffness_factor(&g).unwrap();
        assert!(phi > 0.0 && phi < 1.0);
    }

    #[test]
    fn test_threaded_end_rejects_consumed_stack() {
        let mut g = half_inch_stack();
        g.member_threaded_length_m = 2.0 * IN;
        let model = StiffnessModel::for_configuration(JointConfiguration::ThreadedEnd);
        assert!(matches!(
            model.joint_stiffness(&g),
            Err(CalcError::InvalidJointGeometry { .. })
        ));
        assert!(model.loading_plane_factor(&g).is_err());
    }

    #[test]
    fn test_threaded_end_rejects_negative_compliance() {
        // stiff thin layer over a soft layer cut past zero
        let mut g = half_inch_stack();
        g.layers = vec![
            Layer { thickness_m: 0.1 * IN, modulus_pa: E_STEEL },
            Layer { thickness_m: 0.3 * IN, modulus_pa: E_AL },
        ];
        g.member_threaded_length_m = 0.7 * IN;
        let model = StiffnessModel::for_configuration(JointConfiguration::ThreadedEnd);
        let err = model.effective_section(&g).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_JOINT_GEOMETRY");
    }

    #[test]
    fn test_degenerate_cone_ratio() {
        assert!(cone_stiffness(JointConfiguration::ThroughBolt, 1.0, 1.0).is_err());
        assert!(cone_stiffness(JointConfiguration::ThroughBolt, 1.0, -0.5).is_err());
        assert!(cone_stiffness(JointConfiguration::ThroughBolt, 1.0, f64::NAN).is_err());
        assert_relative_eq!(
            cone_stiffness(JointConfiguration::ThroughBolt, 1.0, 0.5).unwrap(),
            1.0 / 2f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_stack() {
        let mut g = half_inch_stack();
        g.layers.clear();
        let model = StiffnessModel::for_configuration(JointConfiguration::ThreadedEnd);
        assert_eq!(model.effective_section(&g).unwrap_err(), CalcError::EmptyStack);
        assert_eq!(model.loading_plane_factor(&g).unwrap_err(), CalcError::EmptyStack);
    }
}
