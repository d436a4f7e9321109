//! Robot motion programs synthesized from captured paths.

mod command;
mod synthesizer;

pub use command::{MotionCommand, MovePhase, ProgramStep};
pub use synthesizer::TrajectorySynthesizer;

use flatdraw_core::CartesianPose;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An ordered motion program, handed to a motion sink as one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProgram {
    steps: Vec<ProgramStep>,
    path_points: usize,
    path_length_mm: f64,
}

impl MotionProgram {
    pub(crate) fn new(steps: Vec<ProgramStep>, path_points: usize, path_length_mm: f64) -> Self {
        Self {
            steps,
            path_points,
            path_length_mm,
        }
    }

    /// All steps in execution order.
    pub fn steps(&self) -> &[ProgramStep] {
        &self.steps
    }

    /// Move commands in execution order, dwells skipped.
    pub fn commands(&self) -> impl Iterator<Item = &MotionCommand> + '_ {
        self.steps.iter().filter_map(ProgramStep::command)
    }

    /// Number of move commands.
    pub fn move_count(&self) -> usize {
        self.commands().count()
    }

    /// Number of dwell steps.
    pub fn dwell_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, ProgramStep::Dwell(_)))
            .count()
    }

    /// Number of steps of any kind.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the program has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of points in the source path.
    pub fn path_points(&self) -> usize {
        self.path_points
    }

    /// Length of the drawn polyline in millimeters.
    pub fn path_length_mm(&self) -> f64 {
        self.path_length_mm
    }

    /// Lower bound on execution time: linear travel at commanded speed plus
    /// dwells. Joint moves and acceleration ramps are not included.
    pub fn estimated_linear_time(&self) -> Duration {
        let mut seconds = 0.0;
        let mut previous: Option<CartesianPose> = None;
        for step in &self.steps {
            match step {
                ProgramStep::Dwell(duration) => seconds += duration.as_secs_f64(),
                ProgramStep::Move { command, .. } => match command {
                    MotionCommand::Linear { target, speed, .. } => {
                        let from = previous.replace(*target);
                        if let (Some(from), true) = (from, *speed > 0.0) {
                            let dx = target.x - from.x;
                            let dy = target.y - from.y;
                            let dz = target.z - from.z;
                            seconds += (dx * dx + dy * dy + dz * dz).sqrt() / speed;
                        }
                    }
                    MotionCommand::Joint { .. } => previous = None,
                },
            }
        }
        Duration::from_secs_f64(seconds)
    }
}
