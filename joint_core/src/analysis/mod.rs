//! # NASA-STD-5020 Joint Analysis
//!
//! Preload and margin of safety evaluation for a [`Junction`] under an
//! [`Environment`].
//!
//! ## Order of Evaluation
//!
//! ```text
//! preloads ──┬─> slip margin            (nominal preload)
//!            └─> separation margin      (minimum preload)
//!                    ^
//! stiffness ─────────┘                  (Φ, n from the junction)
//!
//! ultimate / yield margins              (loads over nominal area)
//! ```
//!
//! Every `calculate_*` method is a pure read of the junction, environment and
//! configuration. [`Nasa5020Analysis::run`] evaluates all of them once and
//! returns an [`AnalysisReport`].
//!
//! ## Preload
//!
//! ```text
//! P0      = T / (K·D)
//! P_max   = (1 + u)·P0 + max(|ΔP_hot|, |ΔP_cold|)
//! P_min   = (1 − u)·P0 − min(|ΔP_hot|, |ΔP_cold|)
//! ΔP      = (α_b − mean α_c)·ΔT·E_b·A
//! ```
//!
//! `ΔT` is nom − min for the cold excursion and max − nom for the hot one.
//! The nominal preload is `P0`.

pub mod config;
pub mod margins;

pub use config::{AnalysisConfig, FrictionSurface, SafetyFactors};
pub use margins::StrengthMargins;

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use tracing::{debug, warn};

use crate::components::{Component, ClampedComponent};
use crate::environment::Environment;
use crate::errors::{CalcError, CalcResult};
use crate::junction::{JointConfiguration, Junction};
use crate::units::{Quantity, UnitSystem};

// ============================================================================
// Code References
// ============================================================================

/// NASA-STD-5020 and NASA-TM-106943 references for each check.
pub mod nasa_ref {
    /// Torque-controlled preload, Eq. 6-4
    pub const PRELOAD: &str = "NASA-STD-5020 6.1, Eq. 6-4";
    /// Thermal preload change, Eq. 6-3
    pub const THERMAL_PRELOAD: &str = "NASA-STD-5020 6.1, Eq. 6-3";
    /// Ultimate strength margins
    pub const ULTIMATE: &str = "NASA-STD-5020 6.2";
    /// Yield strength margins
    pub const YIELD: &str = "NASA-STD-5020 6.3";
    /// Joint slip
    pub const SLIP: &str = "NASA-STD-5020 6.4";
    /// Joint separation, Eq. 6-23
    pub const SEPARATION: &str = "NASA-STD-5020 6.5, Eq. 6-23";
    /// Stiffness and loading plane factors
    pub const STIFFNESS: &str = "NASA-TM-106943";
}

/// Friction coefficient above which no surface condition qualifies
const MAX_FRICTION_CEILING: f64 = 0.2;

// ============================================================================
// Results
// ============================================================================

/// Installation preloads in the configured output unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preloads {
    pub min: Quantity,
    pub max: Quantity,
    pub nominal: Quantity,
}

/// SI preload breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
struct PreloadBreakdown {
    nominal_n: f64,
    min_n: f64,
    max_n: f64,
    thermal_hot_n: f64,
    thermal_cold_n: f64,
}

/// Everything an analysis produces, evaluated once in dependency order.
///
/// ## JSON Example
///
/// ```json
/// {
///   "configuration": "THROUGH_BOLT",
///   "unit_system": "imperial",
///   "grip_length": { "value": 1.0, "unit": "in" },
///   "stack_up_thickness": { "value": 1.375, "unit": "in" },
///   "preloads": {
///     "min": { "value": 3526.0, "unit": "lbf" },
///     "max": { "value": 10097.0, "unit": "lbf" },
///     "nominal": { "value": 6000.0, "unit": "lbf" }
///   },
///   "stiffness_factor": 0.728,
///   "loading_plane_factor": 1.0,
///   "slip_margin": 0.8,
///   "separation_margin": 1.03,
///   ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub configuration: JointConfiguration,
    pub unit_system: UnitSystem,

    // === Geometry ===
    pub grip_length: Quantity,
    pub stack_up_thickness: Quantity,

    // === Preload ===
    pub preloads: Preloads,
    /// Preload change over the hot excursion (max − nom)
    pub thermal_preload_hot: Quantity,
    /// Preload change over the cold excursion (nom − min)
    pub thermal_preload_cold: Quantity,

    // === Stiffness ===
    pub bolt_stiffness_n_per_m: f64,
    pub joint_stiffness_n_per_m: f64,
    pub stiffness_factor: f64,
    pub loading_plane_factor: f64,

    // === Margins ===
    pub ultimate: StrengthMargins,
    #[serde(rename = "yield")]
    pub yielding: StrengthMargins,
    /// `None` when the joint carries no shear
    pub slip_margin: Option<f64>,
    /// `None` when the joint carries no tension
    pub separation_margin: Option<f64>,
}

impl AnalysisReport {
    /// Every margin with its label and code reference; `None` where the
    /// matching load is zero
    pub fn margins(&self) -> [(&'static str, &'static str, Option<f64>); 8] {
        [
            ("Ultimate tension", nasa_ref::ULTIMATE, self.ultimate.tension),
            ("Ultimate shear", nasa_ref::ULTIMATE, self.ultimate.shear),
            ("Ultimate combined", nasa_ref::ULTIMATE, Some(self.ultimate.combined)),
            ("Yield tension", nasa_ref::YIELD, self.yielding.tension),
            ("Yield shear", nasa_ref::YIELD, self.yielding.shear),
            ("Yield combined", nasa_ref::YIELD, Some(self.yielding.combined)),
            ("Slip", nasa_ref::SLIP, self.slip_margin),
            ("Separation", nasa_ref::SEPARATION, self.separation_margin),
        ]
    }

    fn defined_margins(&self) -> impl Iterator<Item = (&'static str, f64)> {
        self.margins()
            .into_iter()
            .filter_map(|(label, _, ms)| ms.map(|ms| (label, ms)))
    }

    /// True when every defined margin is ≥ 0
    pub fn passes(&self) -> bool {
        self.defined_margins().all(|(_, ms)| ms >= 0.0)
    }

    /// Lowest defined margin of safety
    pub fn governing_margin(&self) -> f64 {
        self.defined_margins().map(|(_, ms)| ms).fold(f64::INFINITY, f64::min)
    }

    /// Label of the lowest defined margin
    pub fn governing_condition(&self) -> &'static str {
        let mut governing = ("Ultimate combined", f64::INFINITY);
        for (label, ms) in self.defined_margins() {
            if ms < governing.1 {
                governing = (label, ms);
            }
        }
        governing.0
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Bolted joint analysis per NASA-STD-5020.
///
/// Borrows the junction and environment; holds a validated configuration.
#[derive(Debug, Clone)]
pub struct Nasa5020Analysis<'a> {
    junction: &'a Junction,
    environment: &'a Environment,
    config: AnalysisConfig,
}

impl<'a> Nasa5020Analysis<'a> {
    pub fn new(junction: &'a Junction, environment: &'a Environment, config: AnalysisConfig) -> CalcResult<Self> {
        config.validate()?;
        if config.friction_surface.is_none() && config.friction_coefficient > MAX_FRICTION_CEILING {
            warn!(
                friction_coefficient = config.friction_coefficient,
                ceiling = MAX_FRICTION_CEILING,
                "friction coefficient exceeds the NASA-STD-5020 slip limit for any surface"
            );
        }
        Ok(Nasa5020Analysis {
            junction,
            environment,
            config,
        })
    }

    pub fn junction(&self) -> &Junction {
        self.junction
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fastener area π/4·D² in m²
    pub fn stress_area_m2(&self) -> CalcResult<f64> {
        let d = self.junction.fastener().nominal_diameter_m();
        let area = FRAC_PI_4 * d * d;
        if area > 0.0 {
            Ok(area)
        } else {
            Err(CalcError::zero_divisor("stress area", area))
        }
    }

    fn force(&self, newtons: f64) -> Quantity {
        Quantity::from_si(newtons, self.config.unit_system.force_unit())
    }

    fn preload_breakdown(&self) -> CalcResult<PreloadBreakdown> {
        let fastener = self.junction.fastener();
        let diameter = fastener.nominal_diameter_m();
        let torque = self.environment.preload_torque_nm();
        let lever = self.config.nut_factor * diameter;
        if lever <= 0.0 {
            return Err(CalcError::zero_divisor("nut factor × diameter", lever));
        }

        let nominal_n = torque / lever;
        let u = self.config.preload_uncertainty;
        let base_max = (1.0 + u) * nominal_n;
        let base_min = (1.0 - u) * nominal_n;

        let clamped = self.junction.clamped_components();
        let alpha_joint = clamped
            .iter()
            .map(|c: &ClampedComponent| c.material().thermal_expansion_per_k())
            .sum::<f64>()
            / clamped.len() as f64;
        let delta_alpha = fastener.material().thermal_expansion_per_k() - alpha_joint;
        let axial_rigidity = fastener.material().elastic_modulus_pa() * self.stress_area_m2()?;

        let env = self.environment;
        let thermal_cold_n = delta_alpha * (env.nom_temp_k() - env.min_temp_k()) * axial_rigidity;
        let thermal_hot_n = delta_alpha * (env.max_temp_k() - env.nom_temp_k()) * axial_rigidity;

        let largest = thermal_hot_n.abs().max(thermal_cold_n.abs());
        let smallest = thermal_hot_n.abs().min(thermal_cold_n.abs());

        Ok(PreloadBreakdown {
            nominal_n,
            min_n: base_min - smallest,
            max_n: base_max + largest,
            thermal_hot_n,
            thermal_cold_n,
        })
    }

    /// Minimum, maximum and nominal installation preload
    pub fn calculate_preloads(&self) -> CalcResult<Preloads> {
        let p = self.preload_breakdown()?;
        debug!(
            min_n = p.min_n,
            nominal_n = p.nominal_n,
            max_n = p.max_n,
            reference = nasa_ref::PRELOAD,
            "preloads"
        );
        Ok(Preloads {
            min: self.force(p.min_n),
            max: self.force(p.max_n),
            nominal: self.force(p.nominal_n),
        })
    }

    fn applied_stresses(&self) -> CalcResult<(f64, f64)> {
        let area = self.stress_area_m2()?;
        Ok((self.environment.tension_n() / area, self.environment.shear_n() / area))
    }

    pub fn calculate_ultimate_margins(&self) -> CalcResult<StrengthMargins> {
        let (sigma, tau) = self.applied_stresses()?;
        let material = self.junction.fastener().material();
        let ms = margins::ultimate_margins(
            sigma,
            tau,
            material.ultimate_strength_pa(),
            material.ultimate_shear_strength_pa(),
            self.config.safety_factors.ultimate,
            self.config.fitting_factor,
        )?;
        debug!(tension = ?ms.tension, shear = ?ms.shear, combined = ms.combined, reference = nasa_ref::ULTIMATE, "ultimate margins");
        Ok(ms)
    }

    pub fn calculate_yield_margins(&self) -> CalcResult<StrengthMargins> {
        let (sigma, tau) = self.applied_stresses()?;
        let ms = margins::yield_margins(
            sigma,
            tau,
            self.junction.fastener().material().yield_strength_pa(),
            self.config.safety_factors.yielding,
            self.config.fitting_factor,
        )?;
        debug!(tension = ?ms.tension, shear = ?ms.shear, combined = ms.combined, reference = nasa_ref::YIELD, "yield margins");
        Ok(ms)
    }

    /// Slip margin on the nominal preload
    pub fn calculate_slip_margin(&self) -> CalcResult<f64> {
        let preload = self.preload_breakdown()?;
        let ms = margins::slip_margin(
            preload.nominal_n,
            self.environment.shear_n(),
            self.config.friction_coefficient,
        )?;
        debug!(margin = ms, reference = nasa_ref::SLIP, "slip margin");
        Ok(ms)
    }

    /// Separation margin on the minimum preload
    pub fn calculate_separation_margin(&self) -> CalcResult<f64> {
        let preload = self.preload_breakdown()?;
        let phi = self.junction.calculate_stiffness_factor()?;
        let n = self.junction.calculate_loading_plane_factor()?;
        let ms = margins::separation_margin(
            preload.min_n,
            self.environment.tension_n(),
            n,
            phi,
            self.config.safety_factors.separation,
            self.config.fitting_factor,
        )?;
        debug!(margin = ms, phi, n, reference = nasa_ref::SEPARATION, "separation margin");
        Ok(ms)
    }

    /// Evaluate every check once
    pub fn run(&self) -> CalcResult<AnalysisReport> {
        let preload = self.preload_breakdown()?;
        let k_b = self.junction.calculate_bolt_stiffness()?;
        let k_j = self.junction.calculate_joint_stiffness()?;
        let phi = k_b / (k_b + k_j);
        let n = self.junction.calculate_loading_plane_factor()?;

        let ultimate = self.calculate_ultimate_margins()?;
        let yielding = self.calculate_yield_margins()?;
        let shear_n = self.environment.shear_n();
        let tension_n = self.environment.tension_n();
        let slip_margin = unless_unloaded(shear_n, || {
            margins::slip_margin(preload.nominal_n, shear_n, self.config.friction_coefficient)
        })?;
        let separation_margin = unless_unloaded(tension_n, || {
            margins::separation_margin(
                preload.min_n,
                tension_n,
                n,
                phi,
                self.config.safety_factors.separation,
                self.config.fitting_factor,
            )
        })?;

        let length_unit = self.config.unit_system.length_unit();
        let report = AnalysisReport {
            configuration: self.junction.configuration_type(),
            unit_system: self.config.unit_system,
            grip_length: Quantity::from_si(self.junction.grip_length_m(), length_unit),
            stack_up_thickness: Quantity::from_si(self.junction.stack_up_thickness_m(), length_unit),
            preloads: Preloads {
                min: self.force(preload.min_n),
                max: self.force(preload.max_n),
                nominal: self.force(preload.nominal_n),
            },
            thermal_preload_hot: self.force(preload.thermal_hot_n),
            thermal_preload_cold: self.force(preload.thermal_cold_n),
            bolt_stiffness_n_per_m: k_b,
            joint_stiffness_n_per_m: k_j,
            stiffness_factor: phi,
            loading_plane_factor: n,
            ultimate,
            yielding,
            slip_margin,
            separation_margin,
        };
        debug!(
            governing = report.governing_condition(),
            margin = report.governing_margin(),
            passes = report.passes(),
            "analysis complete"
        );
        Ok(report)
    }
}

/// Skip a margin whose load is exactly zero
fn unless_unloaded(load: f64, margin: impl FnOnce() -> CalcResult<f64>) -> CalcResult<Option<f64>> {
    if load == 0.0 {
        Ok(None)
    } else {
        margin().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Fastener, FastenerSpec, HeadStyle, Nut, Plate};
    use crate::environment::EnvironmentInput;
    use crate::materials::standard::{generic_aluminum, generic_steel};
    use crate::units::Unit;
    use approx::assert_relative_eq;

    fn junction() -> Junction {
        let thread: crate::threads::ThreadSpec = "1/2-13 UNC".parse().unwrap();
        let bolt = Fastener::new(
            FastenerSpec {
                thread: thread.clone(),
                length: Quantity::inches(2.5),
                threaded_length: Quantity::inches(1.5),
                head_diameter: Quantity::inches(0.75),
                head_height: Quantity::inches(0.375),
                head_style: HeadStyle::Protruding,
                tool_size: None,
            },
            generic_steel(),
        )
        .unwrap();
        let nut = Nut::new(thread, Quantity::inches(0.75), Quantity::inches(0.375), generic_steel()).unwrap();
        Junction::new(
            bolt,
            vec![
                Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
                Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
            ],
            nut.into(),
        )
        .unwrap()
    }

    fn environment() -> Environment {
        Environment::try_from(EnvironmentInput {
            tension: Quantity::pounds_force(1000.0),
            shear: Quantity::pounds_force(500.0),
            bending: Quantity::newton_meters(0.0),
            min_temp: Quantity::kelvin(255.0),
            nom_temp: Quantity::kelvin(295.0),
            max_temp: Quantity::kelvin(310.0),
            preload_torque: Quantity::foot_pounds(50.0),
        })
        .unwrap()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            unit_system: UnitSystem::Imperial,
            friction_coefficient: 0.15,
            fitting_factor: 1.15,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_preloads() {
        let (j, env) = (junction(), environment());
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        let p = analysis.calculate_preloads().unwrap();

        assert_eq!(p.nominal.unit, Unit::PoundForce);
        assert_relative_eq!(p.nominal.value, 6000.0, max_relative = 1e-9);
        // cold excursion 40 K, hot 15 K, aluminum expands faster than steel
        assert_relative_eq!(p.max.value, 7500.0 + 2597.4, max_relative = 1e-3);
        assert_relative_eq!(p.min.value, 4500.0 - 974.0, max_relative = 1e-3);
    }

    #[test]
    fn test_preloads_metric_output() {
        let (j, env) = (junction(), environment());
        let analysis = Nasa5020Analysis::new(&j, &env, AnalysisConfig::default()).unwrap();
        let p = analysis.calculate_preloads().unwrap();
        assert_eq!(p.nominal.unit, Unit::Newton);
        assert_relative_eq!(p.nominal.value, 6000.0 * 4.448_221_615_260_5, max_relative = 1e-9);
    }

    #[test]
    fn test_no_thermal_change_at_uniform_temperature() {
        let j = junction();
        let env = environment()
            .with_temperatures(Quantity::kelvin(295.0), Quantity::kelvin(295.0), Quantity::kelvin(295.0))
            .unwrap();
        let p = Nasa5020Analysis::new(&j, &env, config()).unwrap().calculate_preloads().unwrap();
        assert_relative_eq!(p.min.value, 4500.0, max_relative = 1e-9);
        assert_relative_eq!(p.max.value, 7500.0, max_relative = 1e-9);
    }

    #[test]
    fn test_margins() {
        let (j, env) = (junction(), environment());
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();

        let ult = analysis.calculate_ultimate_margins().unwrap();
        assert_relative_eq!(ult.tension.unwrap(), 6.075, max_relative = 1e-3);
        assert!(ult.combined < ult.tension.unwrap());

        let yld = analysis.calculate_yield_margins().unwrap();
        assert!(yld.tension.unwrap() < ult.tension.unwrap());

        assert_relative_eq!(analysis.calculate_slip_margin().unwrap(), 0.8, max_relative = 1e-9);

        let phi = j.calculate_stiffness_factor().unwrap();
        let expected = (p_min_lbf(&analysis) - phi * 1000.0) / (1000.0 * 1.2 * 1.15) - 1.0;
        assert_relative_eq!(analysis.calculate_separation_margin().unwrap(), expected, max_relative = 1e-9);
    }

    fn p_min_lbf(analysis: &Nasa5020Analysis) -> f64 {
        analysis.calculate_preloads().unwrap().min.value
    }

    #[test]
    fn test_run_matches_individual_calls() {
        let (j, env) = (junction(), environment());
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        let report = analysis.run().unwrap();

        assert_eq!(report.configuration, JointConfiguration::ThroughBolt);
        assert_eq!(report.preloads, analysis.calculate_preloads().unwrap());
        assert_eq!(report.ultimate, analysis.calculate_ultimate_margins().unwrap());
        assert_eq!(report.slip_margin, Some(analysis.calculate_slip_margin().unwrap()));
        assert_relative_eq!(
            report.separation_margin.unwrap(),
            analysis.calculate_separation_margin().unwrap(),
            epsilon = 1e-12
        );
        assert!(report.passes());
        assert_eq!(report.governing_condition(), "Slip");
        assert_eq!(Some(report.governing_margin()), report.slip_margin);
        assert_eq!(report.grip_length.unit, Unit::Inch);
        assert_relative_eq!(report.grip_length.value, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.stack_up_thickness.value, 1.375, epsilon = 1e-12);
    }

    #[test]
    fn test_repeatable() {
        let (j, env) = (junction(), environment());
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        assert_eq!(analysis.run().unwrap(), analysis.run().unwrap());
    }

    #[test]
    fn test_pure_tension_joint() {
        let j = junction();
        let env = Environment::try_from(EnvironmentInput {
            shear: Quantity::pounds_force(0.0),
            ..environment().input().clone()
        })
        .unwrap();
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        assert_eq!(analysis.calculate_slip_margin().unwrap_err().error_code(), "ZERO_DIVISOR");

        let report = analysis.run().unwrap();
        assert_eq!(report.ultimate.shear, None);
        assert_eq!(report.yielding.shear, None);
        assert_eq!(report.slip_margin, None);
        assert_relative_eq!(report.ultimate.tension.unwrap(), 6.075, max_relative = 1e-3);
        assert!(report.separation_margin.is_some());
        assert_eq!(report.margins().iter().filter(|(_, _, ms)| ms.is_none()).count(), 3);
        assert_ne!(report.governing_condition(), "Slip");
    }

    #[test]
    fn test_pure_shear_joint() {
        let j = junction();
        let env = Environment::try_from(EnvironmentInput {
            tension: Quantity::pounds_force(0.0),
            ..environment().input().clone()
        })
        .unwrap();
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        assert_eq!(analysis.calculate_separation_margin().unwrap_err().error_code(), "ZERO_DIVISOR");

        let report = analysis.run().unwrap();
        assert_eq!(report.ultimate.tension, None);
        assert_eq!(report.yielding.tension, None);
        assert_eq!(report.separation_margin, None);
        assert_relative_eq!(report.slip_margin.unwrap(), 0.8, max_relative = 1e-9);
        assert_eq!(report.governing_condition(), "Slip");
    }

    #[test]
    fn test_unloaded_joint_rejected() {
        let j = junction();
        let env = Environment::try_from(EnvironmentInput {
            tension: Quantity::pounds_force(0.0),
            shear: Quantity::pounds_force(0.0),
            ..environment().input().clone()
        })
        .unwrap();
        let analysis = Nasa5020Analysis::new(&j, &env, config()).unwrap();
        assert_eq!(analysis.run().unwrap_err().error_code(), "ZERO_DIVISOR");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (j, env) = (junction(), environment());
        let bad = AnalysisConfig {
            fitting_factor: 0.5,
            ..config()
        };
        assert!(Nasa5020Analysis::new(&j, &env, bad).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let (j, env) = (junction(), environment());
        let report = Nasa5020Analysis::new(&j, &env, config()).unwrap().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["configuration"], "THROUGH_BOLT");
        assert_eq!(json["preloads"]["nominal"]["unit"], "lbf");
        assert!(json["yield"]["combined"].is_number());
        assert_eq!(json["grip_length"]["unit"], "in");
        let back: AnalysisReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.configuration, report.configuration);
    }
}
