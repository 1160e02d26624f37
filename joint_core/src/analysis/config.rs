//! # Analysis Configuration
//!
//! Safety factors, friction and tightening parameters for a NASA-STD-5020
//! analysis. The record is validated once when the analysis is built.
//!
//! ## Defaults
//!
//! | Field                 | Default | Valid range |
//! |-----------------------|---------|-------------|
//! | `unit_system`         | metric  | metric, imperial |
//! | `friction_coefficient`| 0.2     | (0, 1]      |
//! | `safety_factors`      | 1.4 / 1.2 / 1.2 | each > 1.0 |
//! | `fitting_factor`      | 1.0     | ≥ 1.0       |
//! | `nut_factor`          | 0.2     | > 0         |
//! | `preload_uncertainty` | 0.25    | [0, 1)      |
//! | `friction_surface`    | none    | uncoated_metal, other |
//!
//! ## JSON Example
//!
//! Missing fields take their defaults:
//!
//! ```json
//! {
//!   "unit_system": "imperial",
//!   "friction_coefficient": 0.15,
//!   "safety_factors": { "ultimate": 1.4, "yield": 1.2, "separation": 1.2 },
//!   "fitting_factor": 1.15
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

/// Safety factors applied to the margin equations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyFactors {
    pub ultimate: f64,
    #[serde(rename = "yield")]
    pub yielding: f64,
    pub separation: f64,
}

impl Default for SafetyFactors {
    fn default() -> Self {
        SafetyFactors {
            ultimate: 1.4,
            yielding: 1.2,
            separation: 1.2,
        }
    }
}

/// Faying surface condition, which caps the usable friction coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionSurface {
    /// Uncoated, non-lubricated, visibly clean metal
    UncoatedMetal,
    /// Coated, lubricated or non-metallic
    Other,
}

impl FrictionSurface {
    /// Maximum friction coefficient allowed for slip analysis
    pub fn ceiling(&self) -> f64 {
        match self {
            FrictionSurface::UncoatedMetal => 0.2,
            FrictionSurface::Other => 0.1,
        }
    }
}

impl fmt::Display for FrictionSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrictionSurface::UncoatedMetal => write!(f, "uncoated metal"),
            FrictionSurface::Other => write!(f, "coated/lubricated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Output unit system for preloads
    pub unit_system: UnitSystem,
    pub friction_coefficient: f64,
    pub safety_factors: SafetyFactors,
    pub fitting_factor: f64,
    /// Torque-tension nut factor K
    pub nut_factor: f64,
    /// Symmetric preload scatter as a fraction of nominal
    pub preload_uncertainty: f64,
    /// When set, the friction coefficient must not exceed the surface ceiling
    pub friction_surface: Option<FrictionSurface>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            unit_system: UnitSystem::Metric,
            friction_coefficient: 0.2,
            safety_factors: SafetyFactors::default(),
            fitting_factor: 1.0,
            nut_factor: 0.2,
            preload_uncertainty: 0.25,
            friction_surface: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let mu = self.friction_coefficient;
        if !(mu > 0.0 && mu <= 1.0) {
            return Err(CalcError::invalid_input(
                "friction_coefficient",
                mu.to_string(),
                "Friction coefficient must be in (0, 1]",
            ));
        }

        let factors = [
            ("safety_factors.ultimate", self.safety_factors.ultimate),
            ("safety_factors.yield", self.safety_factors.yielding),
            ("safety_factors.separation", self.safety_factors.separation),
        ];
        for (field, value) in factors {
            if !(value.is_finite() && value > 1.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Safety factor must be greater than 1.0",
                ));
            }
        }

        if !(self.fitting_factor.is_finite() && self.fitting_factor >= 1.0) {
            return Err(CalcError::invalid_input(
                "fitting_factor",
                self.fitting_factor.to_string(),
                "Fitting factor must be at least 1.0",
            ));
        }

        if !(self.nut_factor.is_finite() && self.nut_factor > 0.0) {
            return Err(CalcError::invalid_input(
                "nut_factor",
                self.nut_factor.to_string(),
                "Nut factor must be positive",
            ));
        }

        let u = self.preload_uncertainty;
        if !(0.0..1.0).contains(&u) {
            return Err(CalcError::invalid_input(
                "preload_uncertainty",
                u.to_string(),
                "Preload uncertainty must be in [0, 1)",
            ));
        }

        if let Some(surface) = self.friction_surface {
            if mu > surface.ceiling() {
                return Err(CalcError::invalid_input(
                    "friction_coefficient",
                    mu.to_string(),
                    format!("Exceeds the NASA-STD-5020 limit of {} for {} surfaces", surface.ceiling(), surface),
                ));
            }
        }

        Ok(())
    }
}
