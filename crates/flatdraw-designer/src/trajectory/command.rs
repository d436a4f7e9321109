//! Motion command types.

use flatdraw_core::{CartesianPose, JointPose};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single robot move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionCommand {
    /// Move in joint space to a joint pose.
    Joint {
        target: JointPose,
        /// rad/s
        speed: f64,
        /// rad/s²
        accel: f64,
    },
    /// Straight-line tool move to a Cartesian pose.
    Linear {
        target: CartesianPose,
        /// m/s
        speed: f64,
        /// m/s²
        accel: f64,
        /// Corner rounding radius (m); zero forces a full stop.
        blend_radius: f64,
    },
}

impl MotionCommand {
    /// Blend radius of a linear move, `None` for joint moves.
    pub fn blend_radius(&self) -> Option<f64> {
        match self {
            MotionCommand::Linear { blend_radius, .. } => Some(*blend_radius),
            MotionCommand::Joint { .. } => None,
        }
    }

    /// Cartesian target of a linear move.
    pub fn cartesian_target(&self) -> Option<&CartesianPose> {
        match self {
            MotionCommand::Linear { target, .. } => Some(target),
            MotionCommand::Joint { .. } => None,
        }
    }

    /// Joint target of a joint move.
    pub fn joint_target(&self) -> Option<&JointPose> {
        match self {
            MotionCommand::Joint { target, .. } => Some(target),
            MotionCommand::Linear { .. } => None,
        }
    }

    /// Commanded acceleration.
    pub fn accel(&self) -> f64 {
        match self {
            MotionCommand::Joint { accel, .. } | MotionCommand::Linear { accel, .. } => *accel,
        }
    }

    /// Commanded speed.
    pub fn speed(&self) -> f64 {
        match self {
            MotionCommand::Joint { speed, .. } | MotionCommand::Linear { speed, .. } => *speed,
        }
    }
}

impl std::fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionCommand::Joint {
                target,
                speed,
                accel,
            } => write!(f, "movej({}, v={}, a={})", target, speed, accel),
            MotionCommand::Linear {
                target,
                speed,
                accel,
                blend_radius,
            } => write!(
                f,
                "movel({}, v={}, a={}, r={})",
                target, speed, accel, blend_radius
            ),
        }
    }
}

/// Why a move is in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePhase {
    Home,
    Approach,
    Settle,
    Traverse,
    Retract,
}

/// One entry of a motion program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProgramStep {
    /// A robot move.
    Move {
        phase: MovePhase,
        command: MotionCommand,
    },
    /// Hold position so residual motion settles.
    Dwell(Duration),
}

impl ProgramStep {
    /// The move command, if this step is a move.
    pub fn command(&self) -> Option<&MotionCommand> {
        match self {
            ProgramStep::Move { command, .. } => Some(command),
            ProgramStep::Dwell(_) => None,
        }
    }

    /// The move phase, if this step is a move.
    pub fn phase(&self) -> Option<MovePhase> {
        match self {
            ProgramStep::Move { phase, .. } => Some(*phase),
            ProgramStep::Dwell(_) => None,
        }
    }
}
