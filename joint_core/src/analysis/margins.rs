//! Margin of safety equations (NASA-STD-5020 section 6).
//!
//! Pure functions over SI magnitudes. Every margin has the form
//!
//! ```text
//! MS = Allowable / (Applied · FS · FF) − 1
//! ```
//!
//! A zero tension or shear leaves the matching single-load margin undefined
//! (`None`); the combined margin needs at least one of them. A negative or
//! non-finite applied value, and a zero load under slip or separation, is a
//! [`CalcError::ZeroDivisor`], never ±∞.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::VON_MISES_SHEAR_RATIO;

/// Tension, shear and combined margins for one strength criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthMargins {
    /// `None` when the joint carries no tension
    pub tension: Option<f64>,
    /// `None` when the joint carries no shear
    pub shear: Option<f64>,
    pub combined: f64,
}

impl StrengthMargins {
    /// Lowest of the defined margins
    pub fn min(&self) -> f64 {
        [self.tension, self.shear]
            .into_iter()
            .flatten()
            .fold(self.combined, f64::min)
    }
}

fn require_positive_load(quantity: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::zero_divisor(quantity, value))
    }
}

/// `Some` for a positive load, `None` for exactly zero
fn optional_load(quantity: &str, value: f64) -> CalcResult<Option<f64>> {
    if value == 0.0 {
        Ok(None)
    } else {
        require_positive_load(quantity, value).map(Some)
    }
}

fn margin(allowable: f64, demand: f64) -> f64 {
    allowable / demand - 1.0
}

/// Ultimate margins, section 6.2.
///
/// Shear is checked against `fsu`; the combined margin uses the elliptical
/// interaction with each term normalized by its own allowable.
pub fn ultimate_margins(
    tension_stress_pa: f64,
    shear_stress_pa: f64,
    ftu_pa: f64,
    fsu_pa: f64,
    safety_factor: f64,
    fitting_factor: f64,
) -> CalcResult<StrengthMargins> {
    let factor = safety_factor * fitting_factor;
    let sigma = optional_load("tension stress", tension_stress_pa)?;
    let tau = optional_load("shear stress", shear_stress_pa)?;
    let (s, t) = (sigma.unwrap_or(0.0), tau.unwrap_or(0.0));

    let ratio = ((s * factor / ftu_pa).powi(2) + (t * factor / fsu_pa).powi(2)).sqrt();
    let ratio = require_positive_load("combined stress ratio", ratio)?;

    Ok(StrengthMargins {
        tension: sigma.map(|s| margin(ftu_pa, s * factor)),
        shear: tau.map(|t| margin(fsu_pa, t * factor)),
        combined: 1.0 / ratio - 1.0,
    })
}

/// Yield margins, section 6.3.
///
/// Shear yield is 0.577·Fty. The combined margin is the distortion energy
/// form, with both terms over Fty and a factor of 3 on shear.
pub fn yield_margins(
    tension_stress_pa: f64,
    shear_stress_pa: f64,
    fty_pa: f64,
    safety_factor: f64,
    fitting_factor: f64,
) -> CalcResult<StrengthMargins> {
    let factor = safety_factor * fitting_factor;
    let sigma = optional_load("tension stress", tension_stress_pa)?;
    let tau = optional_load("shear stress", shear_stress_pa)?;
    let (s, t) = (sigma.unwrap_or(0.0), tau.unwrap_or(0.0));
    let shear_yield = VON_MISES_SHEAR_RATIO * fty_pa;

    let ratio = ((s * factor / fty_pa).powi(2) + 3.0 * (t * factor / fty_pa).powi(2)).sqrt();
    let ratio = require_positive_load("combined stress ratio", ratio)?;

    Ok(StrengthMargins {
        tension: sigma.map(|s| margin(fty_pa, s * factor)),
        shear: tau.map(|t| margin(shear_yield, t * factor)),
        combined: 1.0 / ratio - 1.0,
    })
}

/// Slip margin, section 6.4: `μ·P / V − 1`
pub fn slip_margin(preload_n: f64, shear_n: f64, friction_coefficient: f64) -> CalcResult<f64> {
    let shear = require_positive_load("shear load", shear_n)?;
    Ok(margin(friction_coefficient * preload_n, shear))
}

/// Separation margin, section 6.5 with the NASA-TM-106943 load split:
/// `(P_min − n·Φ·P_t) / (P_t·FS·FF) − 1`
pub fn separation_margin(
    min_preload_n: f64,
    tension_n: f64,
    loading_plane_factor: f64,
    stiffness_factor: f64,
    safety_factor: f64,
    fitting_factor: f64,
) -> CalcResult<f64> {
    let tension = require_positive_load("tension load", tension_n)?;
    let interface_load = min_preload_n - loading_plane_factor * stiffness_factor * tension;
    Ok(margin(interface_load, tension * safety_factor * fitting_factor))
}
