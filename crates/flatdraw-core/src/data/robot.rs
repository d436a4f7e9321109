//! Robot setup context
//!
//! Session policy passed alongside every motion batch. The core never
//! validates or interprets these values; the motion sink applies them when it
//! opens its link.

use super::motion::CartesianPose;
use serde::{Deserialize, Serialize};

/// Payload carried by the end-effector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Mass (kg)
    pub mass_kg: f64,
    /// Centre of gravity relative to the tool flange (m)
    pub center_of_gravity_m: [f64; 3],
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            mass_kg: 0.010,
            center_of_gravity_m: [0.0, 0.0, 0.0],
        }
    }
}

/// Connection and tooling context for a motion batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSetup {
    /// Robot controller address
    pub address: String,
    /// Name under which the generated program is uploaded
    pub script_name: String,
    /// Tool-center-point offset from the flange
    pub tcp: CartesianPose,
    /// End-effector payload
    pub payload: Payload,
    /// Workspace reference frame in robot base coordinates
    pub reference_frame: CartesianPose,
}

impl Default for RobotSetup {
    fn default() -> Self {
        Self {
            address: "192.168.99.228".to_string(),
            script_name: "draw_in_2D".to_string(),
            tcp: CartesianPose::translation(0.0, 0.0, 0.100),
            payload: Payload::default(),
            reference_frame: CartesianPose::new(-0.145, -0.575, 0.0, 0.0, 3.141, 0.0),
        }
    }
}
