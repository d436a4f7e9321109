//! Robot poses and motion policy
//!
//! Joint poses are in radians, Cartesian poses in meters (translation) and
//! radians (rotation vector), all relative to the configured reference frame.

use crate::units::degrees_to_radians;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Six joint angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPose(pub [f64; 6]);

impl JointPose {
    /// Build a joint pose from angles given in degrees
    pub fn from_degrees(degrees: [f64; 6]) -> Self {
        Self(degrees_to_radians(degrees))
    }

    /// Joint angles in radians
    pub fn radians(&self) -> [f64; 6] {
        self.0
    }
}

impl fmt::Display for JointPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "[{:.4}, {:.4}, {:.4}, {:.4}, {:.4}, {:.4}] rad",
            a, b, c, d, e, g
        )
    }
}

/// Tool pose in the reference frame: translation in meters, orientation as a
/// rotation vector in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPose {
    /// X translation (m)
    pub x: f64,
    /// Y translation (m)
    pub y: f64,
    /// Z translation (m)
    pub z: f64,
    /// Rotation about X (rad)
    pub rx: f64,
    /// Rotation about Y (rad)
    pub ry: f64,
    /// Rotation about Z (rad)
    pub rz: f64,
}

impl CartesianPose {
    /// Create a pose with explicit translation and rotation
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        debug_assert!(
            [x, y, z, rx, ry, rz].iter().all(|v| v.is_finite()),
            "CartesianPose must be finite: x={x}, y={y}, z={z}, rx={rx}, ry={ry}, rz={rz}"
        );
        Self {
            x,
            y,
            z,
            rx,
            ry,
            rz,
        }
    }

    /// Create a pose with zero rotation
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0, 0.0, 0.0)
    }

    /// Pose as a six-element array `[x, y, z, rx, ry, rz]`
    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }

    /// Build a pose from `[x, y, z, rx, ry, rz]`
    pub fn from_array(values: [f64; 6]) -> Self {
        let [x, y, z, rx, ry, rz] = values;
        Self::new(x, y, z, rx, ry, rz)
    }
}

impl fmt::Display for CartesianPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p[{:.4}, {:.4}, {:.4}, {:.4}, {:.4}, {:.4}]",
            self.x, self.y, self.z, self.rx, self.ry, self.rz
        )
    }
}

/// Motion policy used when synthesizing a drawing program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParameters {
    /// Height kept above the workspace while tracing (m)
    pub hover_height_m: f64,
    /// Extra clearance added on approach and retract (m)
    pub extra_offset_m: f64,
    /// Tool speed for linear moves (m/s)
    pub linear_speed: f64,
    /// Tool acceleration for linear moves (m/s²)
    pub linear_accel: f64,
    /// Joint speed for joint moves (rad/s)
    pub joint_speed: f64,
    /// Joint acceleration for joint moves (rad/s²)
    pub joint_accel: f64,
    /// Fraction of `linear_accel` used on approach and retract
    pub approach_accel_scale: f64,
    /// Blend radius between mid-path linear moves (m)
    pub blend_radius_m: f64,
    /// Pause after settling on the first point and after the last point (s)
    pub dwell_secs: f64,
    /// Home joint pose (degrees)
    pub home_joint_deg: [f64; 6],
}

impl MotionParameters {
    /// Longest dwell a config may ask for (s)
    pub const MAX_DWELL_SECS: f64 = 3600.0;

    /// Home pose converted to radians
    pub fn home_pose(&self) -> JointPose {
        JointPose::from_degrees(self.home_joint_deg)
    }

    /// Acceleration used for approach and retract moves
    pub fn approach_accel(&self) -> f64 {
        self.approach_accel_scale * self.linear_accel
    }

    /// Clearance height used for approach and retract (m)
    pub fn clearance_height_m(&self) -> f64 {
        self.hover_height_m + self.extra_offset_m
    }

    /// Dwell as a duration, clamped to `0..=MAX_DWELL_SECS`
    pub fn dwell(&self) -> Duration {
        Duration::from_secs_f64(self.dwell_secs.max(0.0).min(Self::MAX_DWELL_SECS))
    }
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            hover_height_m: 0.010,
            extra_offset_m: 0.100,
            linear_speed: 0.15,
            linear_accel: 0.5,
            joint_speed: 1.6,
            joint_accel: 1.6,
            approach_accel_scale: 0.5,
            blend_radius_m: 0.005,
            dwell_secs: 1.0,
            home_joint_deg: [-71.85, -84.38, -123.96, -61.69, 90.0, 19.45],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_pose_in_radians() {
        let params = MotionParameters::default();
        let home = params.home_pose().radians();
        assert!((home[4] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((home[0] - (-71.85f64).to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_derived_values() {
        let params = MotionParameters::default();
        assert_eq!(params.approach_accel(), 0.25);
        assert!((params.clearance_height_m() - 0.110).abs() < 1e-12);
        assert_eq!(params.dwell(), Duration::from_secs(1));
    }

    #[test]
    fn test_dwell_out_of_range_is_clamped() {
        let mut params = MotionParameters {
            dwell_secs: 1e30,
            ..Default::default()
        };
        assert_eq!(params.dwell(), Duration::from_secs(3600));

        params.dwell_secs = f64::INFINITY;
        assert_eq!(params.dwell(), Duration::from_secs(3600));

        params.dwell_secs = -2.0;
        assert_eq!(params.dwell(), Duration::ZERO);

        params.dwell_secs = f64::NAN;
        assert_eq!(params.dwell(), Duration::ZERO);
    }

    #[test]
    fn test_cartesian_pose_array() {
        let pose = CartesianPose::translation(-0.15, 0.075, -0.01);
        assert_eq!(pose.to_array(), [-0.15, 0.075, -0.01, 0.0, 0.0, 0.0]);
        assert_eq!(CartesianPose::from_array(pose.to_array()), pose);
    }

    #[test]
    fn test_pose_display() {
        let pose = CartesianPose::translation(-0.15, 0.075, -0.01);
        assert_eq!(
            pose.to_string(),
            "p[-0.1500, 0.0750, -0.0100, 0.0000, 0.0000, 0.0000]"
        );
    }
}
