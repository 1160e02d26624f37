//! # joint_core - Bolted Joint Analysis Engine
//!
//! `joint_core` evaluates a bolted joint against NASA-STD-5020 and
//! NASA-TM-106943: given a fastener, a stack of clamped parts, a nut or
//! tapped plate, and an operating environment, it computes installation
//! preloads, bolt and joint stiffness, and the ultimate, yield, slip and
//! separation margins of safety.
//!
//! ## Design Philosophy
//!
//! - **Validated at construction**: components, junctions, environments and
//!   configurations cannot exist in an invalid state
//! - **Stateless analysis**: every calculation is a pure read of its inputs
//! - **JSON-First**: inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use joint_core::analysis::{AnalysisConfig, Nasa5020Analysis};
//! use joint_core::components::{Fastener, FastenerSpec, HeadStyle, Nut, Plate};
//! use joint_core::environment::{Environment, EnvironmentInput};
//! use joint_core::junction::Junction;
//! use joint_core::materials::standard::{generic_aluminum, generic_steel};
//! use joint_core::units::{Quantity, UnitSystem};
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
//! let junction = Junction::new(
//!     bolt,
//!     vec![
//!         Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
//!         Plate::new(Quantity::inches(0.5), generic_aluminum()).unwrap().into(),
//!     ],
//!     nut.into(),
//! )
//! .unwrap();
//!
//! let environment = Environment::try_from(EnvironmentInput {
//!     tension: Quantity::pounds_force(1000.0),
//!     shear: Quantity::pounds_force(500.0),
//!     bending: Quantity::newton_meters(0.0),
//!     min_temp: Quantity::kelvin(255.0),
//!     nom_temp: Quantity::kelvin(295.0),
//!     max_temp: Quantity::kelvin(310.0),
//!     preload_torque: Quantity::foot_pounds(50.0),
//! })
//! .unwrap();
//!
//! let config = AnalysisConfig {
//!     unit_system: UnitSystem::Imperial,
//!     friction_coefficient: 0.15,
//!     fitting_factor: 1.15,
//!     ..AnalysisConfig::default()
//! };
//!
//! let report = Nasa5020Analysis::new(&junction, &environment, config).unwrap().run().unwrap();
//! assert!(report.preloads.max.value > report.preloads.min.value);
//! assert!(report.passes());
//! ```
//!
//! ## Modules
//!
//! - [`analysis`] - Preloads, margins of safety and analysis configuration
//! - [`junction`] - Assembly validation, configuration and stiffness
//! - [`components`] - Fasteners, nuts, washers, plates, threaded plates
//! - [`environment`] - Loads, temperatures and installation torque
//! - [`materials`] - Material records and standard materials
//! - [`threads`] - UNC/UNF/metric thread specifications
//! - [`units`] - Dimensioned quantities
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod components;
pub mod environment;
pub mod errors;
pub mod junction;
pub mod materials;
pub mod threads;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use analysis::{AnalysisConfig, AnalysisReport, Nasa5020Analysis};
pub use environment::Environment;
pub use errors::{CalcError, CalcResult};
pub use junction::{JointConfiguration, Junction};
pub use units::{Quantity, Unit, UnitSystem};
