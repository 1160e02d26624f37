//! # Operating Environment
//!
//! External loads, temperature range and installation torque for a joint.
//!
//! An [`Environment`] can only exist in a validated state: it is built from an
//! [`EnvironmentInput`] through `TryFrom`, and deserializing an `Environment`
//! runs the same checks.
//!
//! ## Validation
//!
//! | Field            | Dimension   | Constraint               |
//! |------------------|-------------|--------------------------|
//! | `tension`        | force       | finite                   |
//! | `shear`          | force       | finite                   |
//! | `bending`        | moment      | finite                   |
//! | `*_temp`         | temperature | > 0 K, min ≤ nom ≤ max   |
//! | `preload_torque` | moment      | > 0                      |
//!
//! ## Example
//!
//! ```rust
//! use joint_core::environment::{Environment, EnvironmentInput};
//! use joint_core::units::{Quantity, Unit};
//!
//! let env = Environment::try_from(EnvironmentInput {
//!     tension: Quantity::pounds_force(1000.0),
//!     shear: Quantity::pounds_force(500.0),
//!     bending: Quantity::newton_meters(0.0),
//!     min_temp: Quantity::kelvin(255.0),
//!     nom_temp: Quantity::kelvin(295.0),
//!     max_temp: Quantity::kelvin(310.0),
//!     preload_torque: Quantity::foot_pounds(50.0),
//! })
//! .unwrap();
//! assert!((env.tension_n() - 4448.22).abs() < 0.01);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, Quantity};

/// Temperature used by [`Environment::from_6dof`] until overridden
pub const DEFAULT_TEMPERATURE_K: f64 = 300.0;

/// Installation torque used by [`Environment::from_6dof`] until overridden
pub const DEFAULT_PRELOAD_TORQUE_NM: f64 = 1.0;

/// Raw, unvalidated environment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInput {
    pub tension: Quantity,
    pub shear: Quantity,
    pub bending: Quantity,
    pub min_temp: Quantity,
    pub nom_temp: Quantity,
    pub max_temp: Quantity,
    pub preload_torque: Quantity,
}

/// Fastener axis in the global frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastenerAxis {
    X,
    Y,
    Z,
}

impl FastenerAxis {
    fn unit_vector(&self) -> Vector3<f64> {
        match self {
            FastenerAxis::X => Vector3::x(),
            FastenerAxis::Y => Vector3::y(),
            FastenerAxis::Z => Vector3::z(),
        }
    }
}

impl FromStr for FastenerAxis {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(FastenerAxis::X),
            "y" => Ok(FastenerAxis::Y),
            "z" => Ok(FastenerAxis::Z),
            _ => Err(CalcError::invalid_input(
                "fastener_axis",
                s,
                "Fastener axis must be one of x, y, z",
            )),
        }
    }
}

/// Validated loads and conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvironmentInput", into = "EnvironmentInput")]
pub struct Environment {
    input: EnvironmentInput,
}

impl TryFrom<EnvironmentInput> for Environment {
    type Error = CalcError;

    fn try_from(input: EnvironmentInput) -> CalcResult<Self> {
        input.tension.require("tension", Dimension::Force)?;
        input.shear.require("shear", Dimension::Force)?;
        input.bending.require("bending", Dimension::Moment)?;

        let min = absolute_temperature("min_temp", &input.min_temp)?;
        let nom = absolute_temperature("nom_temp", &input.nom_temp)?;
        let max = absolute_temperature("max_temp", &input.max_temp)?;
        if min > nom || nom > max {
            return Err(CalcError::invalid_input(
                "nom_temp",
                format!("{} / {} / {}", input.min_temp, input.nom_temp, input.max_temp),
                "Temperatures must satisfy min <= nominal <= max",
            ));
        }

        input.preload_torque.require_positive("preload_torque", Dimension::Moment)?;

        Ok(Environment { input })
    }
}

impl From<Environment> for EnvironmentInput {
    fn from(env: Environment) -> Self {
        env.input
    }
}

fn absolute_temperature(field: &str, q: &Quantity) -> CalcResult<f64> {
    let kelvin = q.require(field, Dimension::Temperature)?;
    if kelvin <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            q.to_string(),
            "Temperature must be above absolute zero",
        ));
    }
    Ok(kelvin)
}

impl Environment {
    /// Decompose a 6-DOF load set about the fastener axis.
    ///
    /// Tension is the force component along the axis, shear the magnitude of
    /// the in-plane force, bending the magnitude of the in-plane moment.
    /// Results are reported in the unit of the first force and first moment.
    /// Temperatures start at 300 K and torque at 1 N·m; override them with
    /// [`Environment::with_temperatures`] and [`Environment::with_preload_torque`].
    pub fn from_6dof(forces: [Quantity; 3], moments: [Quantity; 3], axis: FastenerAxis) -> CalcResult<Self> {
        let mut f = Vector3::zeros();
        let mut m = Vector3::zeros();
        for (i, (force, moment)) in forces.iter().zip(moments.iter()).enumerate() {
            f[i] = force.require("forces", Dimension::Force)?;
            m[i] = moment.require("moments", Dimension::Moment)?;
        }

        let a = axis.unit_vector();
        let axial = f.dot(&a);
        let shear = (f - a * axial).norm();
        let bending = (m - a * m.dot(&a)).norm();

        let force_unit = forces[0].unit;
        let moment_unit = moments[0].unit;
        Environment::try_from(EnvironmentInput {
            tension: Quantity::from_si(axial, force_unit),
            shear: Quantity::from_si(shear, force_unit),
            bending: Quantity::from_si(bending, moment_unit),
            min_temp: Quantity::kelvin(DEFAULT_TEMPERATURE_K),
            nom_temp: Quantity::kelvin(DEFAULT_TEMPERATURE_K),
            max_temp: Quantity::kelvin(DEFAULT_TEMPERATURE_K),
            preload_torque: Quantity::newton_meters(DEFAULT_PRELOAD_TORQUE_NM),
        })
    }

    /// Copy with a new temperature range, re-validated
    pub fn with_temperatures(&self, min: Quantity, nom: Quantity, max: Quantity) -> CalcResult<Self> {
        let mut input = self.input.clone();
        input.min_temp = min;
        input.nom_temp = nom;
        input.max_temp = max;
        Environment::try_from(input)
    }

    /// Copy with a new installation torque, re-validated
    pub fn with_preload_torque(&self, torque: Quantity) -> CalcResult<Self> {
        let mut input = self.input.clone();
        input.preload_torque = torque;
        Environment::try_from(input)
    }

    pub fn input(&self) -> &EnvironmentInput {
        &self.input
    }

    pub fn tension(&self) -> Quantity {
        self.input.tension
    }

    pub fn shear(&self) -> Quantity {
        self.input.shear
    }

    pub fn bending(&self) -> Quantity {
        self.input.bending
    }

    pub fn preload_torque(&self) -> Quantity {
        self.input.preload_torque
    }

    pub fn tension_n(&self) -> f64 {
        self.input.tension.si_value()
    }

    pub fn shear_n(&self) -> f64 {
        self.input.shear.si_value()
    }

    pub fn bending_nm(&self) -> f64 {
        self.input.bending.si_value()
    }

    pub fn min_temp_k(&self) -> f64 {
        self.input.min_temp.si_value()
    }

    pub fn nom_temp_k(&self) -> f64 {
        self.input.nom_temp.si_value()
    }

    pub fn max_temp_k(&self) -> f64 {
        self.input.max_temp.si_value()
    }

    pub fn preload_torque_nm(&self) -> f64 {
        self.input.preload_torque.si_value()
    }
}
