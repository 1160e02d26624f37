//! # Error Types
//!
//! Structured error types for joint_core. Every failure carries the values
//! that caused it so a caller (human or LLM) can tell which invariant was
//! violated without re-running the analysis.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::errors::{CalcError, CalcResult};
//!
//! fn validate_fitting_factor(fitting_factor: f64) -> CalcResult<()> {
//!     if fitting_factor < 1.0 {
//!         return Err(CalcError::invalid_input(
//!             "fitting_factor",
//!             fitting_factor.to_string(),
//!             "Fitting factor must be at least 1.0",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for joint_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for assembly and analysis operations.
///
/// Variants map onto four kinds of failure: construction/validation,
/// dimensional, invalid joint geometry, and zero or negative divisors.
/// None of them is recoverable by retrying; the inputs must change.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive, inconsistent)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A quantity was supplied with the wrong physical dimension
    #[error("Dimension mismatch for '{field}': expected {expected}, found {found}")]
    DimensionMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A thread designation could not be parsed or is not a standard size
    #[error("Invalid thread specification '{spec}': {reason}")]
    InvalidThreadSpec { spec: String, reason: String },

    /// Fastener and threaded member threads do not mate
    #[error("Thread specifications are not compatible: fastener {fastener}, threaded member {member}")]
    IncompatibleThreads { fastener: String, member: String },

    /// Overlapping thread length is below half the nominal diameter
    #[error("Insufficient thread engagement: {engagement} engaged, {required} required")]
    InsufficientEngagement { engagement: String, required: String },

    /// Fastener does not pass through the stack-up
    #[error("Fastener length insufficient: {length} must exceed required {required}")]
    InsufficientFastenerLength { length: String, required: String },

    /// The same component instance appears twice in the clamped stack
    #[error("Duplicate component in assembly: {id}")]
    DuplicateComponent { id: String },

    /// The clamped stack has no components
    #[error("Assembly must have at least one clamped component")]
    EmptyStack,

    /// Positional access outside the clamped stack
    #[error("Index {index} out of range for clamped stack of {len} components")]
    IndexOutOfRange { index: usize, len: usize },

    /// A stiffness or loading-plane formula has no physical solution for this geometry
    #[error("Invalid joint geometry for {configuration}: {reason}")]
    InvalidJointGeometry {
        configuration: String,
        reason: String,
    },

    /// A divisor in a margin or preload equation is zero or negative
    #[error("Zero or negative divisor: {quantity} = {value}")]
    ZeroDivisor { quantity: String, value: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error
    pub fn dimension_mismatch(field: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        CalcError::DimensionMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an InvalidThreadSpec error
    pub fn invalid_thread(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidThreadSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidJointGeometry error
    pub fn invalid_geometry(configuration: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidJointGeometry {
            configuration: configuration.into(),
            reason: reason.into(),
        }
    }

    /// Create a ZeroDivisor error
    pub fn zero_divisor(quantity: impl Into<String>, value: f64) -> Self {
        CalcError::ZeroDivisor {
            quantity: quantity.into(),
            value: value.to_string(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            CalcError::InvalidThreadSpec { .. } => "INVALID_THREAD_SPEC",
            CalcError::IncompatibleThreads { .. } => "INCOMPATIBLE_THREADS",
            CalcError::InsufficientEngagement { .. } => "INSUFFICIENT_ENGAGEMENT",
            CalcError::InsufficientFastenerLength { .. } => "INSUFFICIENT_FASTENER_LENGTH",
            CalcError::DuplicateComponent { .. } => "DUPLICATE_COMPONENT",
            CalcError::EmptyStack => "EMPTY_STACK",
            CalcError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            CalcError::InvalidJointGeometry { .. } => "INVALID_JOINT_GEOMETRY",
            CalcError::ZeroDivisor { .. } => "ZERO_DIVISOR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
