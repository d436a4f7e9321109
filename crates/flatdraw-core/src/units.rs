//! Unit conversion utilities
//!
//! Workspace coordinates are captured in millimeters while robot poses are
//! expressed in meters and radians. The workspace X axis runs opposite to the
//! robot reference frame's X axis, so conversion into the robot frame also
//! flips its sign.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per meter
pub const MM_PER_M: f64 = 1000.0;

/// Linear length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Millimeters (workspace coordinates)
    Millimeters,
    /// Meters (robot poses)
    Meters,
}

impl LengthUnit {
    /// Convert a value from one unit to another
    pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
        match (from, to) {
            (LengthUnit::Millimeters, LengthUnit::Meters) => value / MM_PER_M,
            (LengthUnit::Meters, LengthUnit::Millimeters) => value * MM_PER_M,
            _ => value,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Meters => write!(f, "m"),
        }
    }
}

/// Convert millimeters to meters
pub fn mm_to_m(value_mm: f64) -> f64 {
    LengthUnit::convert(value_mm, LengthUnit::Millimeters, LengthUnit::Meters)
}

/// Convert meters to millimeters
pub fn m_to_mm(value_m: f64) -> f64 {
    LengthUnit::convert(value_m, LengthUnit::Meters, LengthUnit::Millimeters)
}

/// Convert a workspace X coordinate (mm) into the robot frame (m)
pub fn workspace_x_to_robot(x_mm: f64) -> f64 {
    -mm_to_m(x_mm)
}

/// Convert a workspace Y coordinate (mm) into the robot frame (m)
pub fn workspace_y_to_robot(y_mm: f64) -> f64 {
    mm_to_m(y_mm)
}

/// Convert an array of angles from degrees to radians
pub fn degrees_to_radians<const N: usize>(degrees: [f64; N]) -> [f64; N] {
    degrees.map(f64::to_radians)
}

/// Format a length for display with its unit label
pub fn format_length(value: f64, unit: LengthUnit) -> String {
    format!("{:.3} {}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_m_conversion() {
        assert_eq!(mm_to_m(150.0), 0.15);
        assert_eq!(m_to_mm(0.5), 500.0);
        assert_eq!(
            LengthUnit::convert(10.0, LengthUnit::Meters, LengthUnit::Meters),
            10.0
        );
    }

    #[test]
    fn test_robot_axis_inversion() {
        assert_eq!(workspace_x_to_robot(150.0), -0.15);
        assert_eq!(workspace_y_to_robot(75.0), 0.075);
        assert_eq!(workspace_x_to_robot(0.0), 0.0);
    }

    #[test]
    fn test_degrees_to_radians() {
        let rad = degrees_to_radians([0.0, 90.0, -180.0]);
        assert_eq!(rad[0], 0.0);
        assert!((rad[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((rad[2] + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(9.5, LengthUnit::Millimeters), "9.500 mm");
        assert_eq!(format_length(0.01, LengthUnit::Meters), "0.010 m");
    }
}
