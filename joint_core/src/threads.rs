//! # Thread Specifications
//!
//! Parses standard thread designations and checks whether two threads mate.
//!
//! ## Supported Designations
//!
//! - Unified coarse/fine: `"1/2-13 UNC"`, `"1/4-28 UNF"` (series may be
//!   omitted, `"1/4-20"`, and is then inferred from the standard tables)
//! - ISO metric coarse: `"M12x1.75"`
//!
//! ## Example
//!
//! ```rust
//! use joint_core::threads::ThreadSpec;
//!
//! let bolt: ThreadSpec = "1/2-13 UNC".parse().unwrap();
//! let nut: ThreadSpec = "1/2-13".parse().unwrap();
//! assert!(bolt.is_compatible(&nut));
//!
//! let fine: ThreadSpec = "1/2-20 UNF".parse().unwrap();
//! assert!(!bolt.is_compatible(&fine));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};

const INCH_M: f64 = 0.0254;
const DIAMETER_TOLERANCE_M: f64 = 1e-9;

/// Unified coarse series: (size, threads per inch)
const UNC_SERIES: [(&str, u32); 8] = [
    ("1/4", 20),
    ("5/16", 18),
    ("3/8", 16),
    ("7/16", 14),
    ("1/2", 13),
    ("9/16", 12),
    ("5/8", 11),
    ("3/4", 10),
];

/// Unified fine series: (size, threads per inch)
const UNF_SERIES: [(&str, u32); 8] = [
    ("1/4", 28),
    ("5/16", 24),
    ("3/8", 24),
    ("7/16", 20),
    ("1/2", 20),
    ("9/16", 18),
    ("5/8", 18),
    ("3/4", 16),
];

/// ISO metric coarse series: (nominal diameter mm, pitch mm)
const METRIC_COARSE: [(u32, f64); 6] = [
    (6, 1.0),
    (8, 1.25),
    (10, 1.5),
    (12, 1.75),
    (16, 2.0),
    (20, 2.5),
];

/// Thread series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadSeries {
    /// Unified National Coarse
    #[serde(rename = "UNC")]
    Unc,
    /// Unified National Fine
    #[serde(rename = "UNF")]
    Unf,
    /// ISO metric
    #[serde(rename = "M")]
    Metric,
}

impl ThreadSeries {
    pub fn code(&self) -> &'static str {
        match self {
            ThreadSeries::Unc => "UNC",
            ThreadSeries::Unf => "UNF",
            ThreadSeries::Metric => "M",
        }
    }

    fn table(&self) -> &'static [(&'static str, u32)] {
        match self {
            ThreadSeries::Unc => &UNC_SERIES,
            ThreadSeries::Unf => &UNF_SERIES,
            ThreadSeries::Metric => &[],
        }
    }
}

impl fmt::Display for ThreadSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A parsed, standard thread specification.
///
/// All dimensions are stored in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThreadSpec {
    designation: String,
    series: ThreadSeries,
    nominal_diameter_m: f64,
    pitch_m: f64,
    threads_per_inch: Option<u32>,
    is_fractional: bool,
}

impl ThreadSpec {
    /// Parse a thread designation
    pub fn parse(spec: &str) -> CalcResult<Self> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(CalcError::invalid_thread(spec, "Thread specification must be a non-empty string"));
        }
        if let Some(rest) = trimmed.strip_prefix('M') {
            return Self::parse_metric(trimmed, rest);
        }
        Self::parse_unified(trimmed)
    }

    fn parse_metric(spec: &str, rest: &str) -> CalcResult<Self> {
        let (diameter, pitch) = rest
            .split_once(['x', 'X'])
            .ok_or_else(|| CalcError::invalid_thread(spec, "Expected metric format 'M<diameter>x<pitch>'"))?;
        let diameter: u32 = diameter
            .parse()
            .map_err(|_| CalcError::invalid_thread(spec, "Metric diameter must be a positive integer"))?;
        let pitch: f64 = pitch
            .parse()
            .map_err(|_| CalcError::invalid_thread(spec, "Metric pitch must be a number"))?;
        if diameter == 0 || pitch <= 0.0 {
            return Err(CalcError::invalid_thread(spec, "Diameter and pitch must be positive"));
        }

        let standard = METRIC_COARSE
            .iter()
            .any(|&(d, p)| d == diameter && (p - pitch).abs() < 1e-9);
        if !standard {
            return Err(CalcError::invalid_thread(spec, "Non-standard metric thread specification"));
        }

        Ok(ThreadSpec {
            designation: format!("M{}x{}", diameter, pitch),
            series: ThreadSeries::Metric,
            nominal_diameter_m: diameter as f64 * 1e-3,
            pitch_m: pitch * 1e-3,
            threads_per_inch: None,
            is_fractional: false,
        })
    }

    fn parse_unified(spec: &str) -> CalcResult<Self> {
        let mut parts = spec.split_whitespace();
        let size_tpi = parts.next().unwrap_or_default();
        let series = match parts.next() {
            Some("UNC") => Some(ThreadSeries::Unc),
            Some("UNF") => Some(ThreadSeries::Unf),
            Some(other) => {
                return Err(CalcError::invalid_thread(spec, format!("Unknown thread series '{}'", other)))
            }
            None => None,
        };
        if parts.next().is_some() {
            return Err(CalcError::invalid_thread(spec, "Unexpected trailing text"));
        }

        let (size, tpi) = size_tpi
            .split_once('-')
            .ok_or_else(|| CalcError::invalid_thread(spec, "Expected format '<size>-<tpi> <series>'"))?;
        let tpi: u32 = tpi
            .parse()
            .map_err(|_| CalcError::invalid_thread(spec, "Threads per inch must be a positive integer"))?;
        if tpi == 0 {
            return Err(CalcError::invalid_thread(spec, "Threads per inch must be positive"));
        }
        let (size_in, is_fractional) = parse_size(spec, size)?;

        let in_table = |s: ThreadSeries| s.table().iter().any(|&(sz, t)| sz == size && t == tpi);
        let series = match series {
            Some(s) if in_table(s) => s,
            Some(s) => {
                return Err(CalcError::invalid_thread(spec, format!("Non-standard {} thread specification", s)))
            }
            None if in_table(ThreadSeries::Unc) => ThreadSeries::Unc,
            None if in_table(ThreadSeries::Unf) => ThreadSeries::Unf,
            None => return Err(CalcError::invalid_thread(spec, "Not a standard UNC or UNF size")),
        };

        Ok(ThreadSpec {
            designation: format!("{}-{} {}", size, tpi, series),
            series,
            nominal_diameter_m: size_in * INCH_M,
            pitch_m: INCH_M / tpi as f64,
            threads_per_inch: Some(tpi),
            is_fractional,
        })
    }

    /// Canonical designation, e.g. `"1/2-13 UNC"`
    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn series(&self) -> ThreadSeries {
        self.series
    }

    pub fn is_metric(&self) -> bool {
        self.series == ThreadSeries::Metric
    }

    pub fn is_fractional(&self) -> bool {
        self.is_fractional
    }

    pub fn threads_per_inch(&self) -> Option<u32> {
        self.threads_per_inch
    }

    /// Nominal (major) diameter in meters
    pub fn nominal_diameter_m(&self) -> f64 {
        self.nominal_diameter_m
    }

    /// Thread pitch in meters
    pub fn pitch_m(&self) -> f64 {
        self.pitch_m
    }

    /// Basic pitch diameter, D - 0.6495p
    pub fn pitch_diameter_m(&self) -> f64 {
        self.nominal_diameter_m - 0.6495 * self.pitch_m
    }

    /// Basic minor diameter, D - 1.2269p
    pub fn minor_diameter_m(&self) -> f64 {
        self.nominal_diameter_m - 1.2269 * self.pitch_m
    }

    /// Two threads mate when series, diameter and pitch all agree.
    pub fn is_compatible(&self, other: &ThreadSpec) -> bool {
        self.is_metric() == other.is_metric()
            && self.series == other.series
            && (self.nominal_diameter_m - other.nominal_diameter_m).abs() < DIAMETER_TOLERANCE_M
            && (self.pitch_m - other.pitch_m).abs() < DIAMETER_TOLERANCE_M
    }
}

fn parse_size(spec: &str, size: &str) -> CalcResult<(f64, bool)> {
    match size.split_once('/') {
        Some((num, den)) => {
            let num: u32 = num
                .parse()
                .map_err(|_| CalcError::invalid_thread(spec, "Invalid fraction format"))?;
            let den: u32 = den
                .parse()
                .map_err(|_| CalcError::invalid_thread(spec, "Invalid fraction format"))?;
            if num == 0 || den == 0 {
                return Err(CalcError::invalid_thread(spec, "Numerator and denominator must be positive"));
            }
            Ok((num as f64 / den as f64, true))
        }
        None => {
            let value: f64 = size
                .parse()
                .map_err(|_| CalcError::invalid_thread(spec, "Invalid size"))?;
            if value <= 0.0 {
                return Err(CalcError::invalid_thread(spec, "Size must be positive"));
            }
            Ok((value, false))
        }
    }
}

impl FromStr for ThreadSpec {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadSpec::parse(s)
    }
}

impl TryFrom<String> for ThreadSpec {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ThreadSpec::parse(&value)
    }
}

impl From<ThreadSpec> for String {
    fn from(spec: ThreadSpec) -> Self {
        spec.designation
    }
}

impl fmt::Display for ThreadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.designation)
    }
}
