//! Converts a closed capture session into a motion program.

use super::{MotionCommand, MotionProgram, MovePhase, ProgramStep};
use crate::capture::{CaptureSession, CaptureState};
use flatdraw_core::units::{workspace_x_to_robot, workspace_y_to_robot};
use flatdraw_core::{CartesianPose, MotionParameters, Point2D, UsageError};

/// Builds drawing programs: home, approach, settle, trace the path at hover
/// height, retract, home.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySynthesizer {
    params: MotionParameters,
}

impl TrajectorySynthesizer {
    /// Creates a synthesizer for the given motion policy.
    pub fn new(params: MotionParameters) -> Self {
        Self { params }
    }

    /// Motion policy in use.
    pub fn params(&self) -> &MotionParameters {
        &self.params
    }

    /// Pose above a workspace point at `height_m`, fixed orientation.
    pub fn pose_at(point: &Point2D, height_m: f64) -> CartesianPose {
        CartesianPose::translation(
            workspace_x_to_robot(point.x),
            workspace_y_to_robot(point.y),
            -height_m,
        )
    }

    /// Synthesizes the program for a closed session.
    ///
    /// Fails with [`UsageError::InvalidState`] if the session is still open
    /// or holds no points. The session is only read.
    pub fn synthesize(&self, session: &CaptureSession) -> Result<MotionProgram, UsageError> {
        if session.state() != CaptureState::Closed {
            return Err(UsageError::invalid_state("synthesize", session.state()));
        }

        let path = session.path();
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(UsageError::invalid_state("synthesize", "Closed with empty path"));
        };

        let p = &self.params;
        let hover = p.hover_height_m;
        let clearance = p.clearance_height_m();
        let dwell = p.dwell();

        let home = MotionCommand::Joint {
            target: p.home_pose(),
            speed: p.joint_speed,
            accel: p.joint_accel,
        };
        let linear = |point: &Point2D, height: f64, accel: f64, blend_radius: f64| {
            MotionCommand::Linear {
                target: Self::pose_at(point, height),
                speed: p.linear_speed,
                accel,
                blend_radius,
            }
        };

        let mut steps = Vec::with_capacity(path.len() + 7);
        steps.push(ProgramStep::Move {
            phase: MovePhase::Home,
            command: home,
        });
        steps.push(ProgramStep::Move {
            phase: MovePhase::Approach,
            command: linear(first, clearance, p.approach_accel(), 0.0),
        });
        steps.push(ProgramStep::Move {
            phase: MovePhase::Settle,
            command: linear(first, hover, p.linear_accel, 0.0),
        });
        steps.push(ProgramStep::Dwell(dwell));

        for point in &path[..path.len() - 1] {
            tracing::debug!(
                "Moving to ({:.3}, {:.3})",
                workspace_x_to_robot(point.x),
                workspace_y_to_robot(point.y)
            );
            steps.push(ProgramStep::Move {
                phase: MovePhase::Traverse,
                command: linear(point, hover, p.linear_accel, p.blend_radius_m),
            });
        }

        // Full stop on the final point so the tool does not overshoot
        steps.push(ProgramStep::Move {
            phase: MovePhase::Traverse,
            command: linear(last, hover, p.linear_accel, 0.0),
        });
        steps.push(ProgramStep::Dwell(dwell));

        steps.push(ProgramStep::Move {
            phase: MovePhase::Retract,
            command: linear(last, clearance, p.approach_accel(), 0.0),
        });
        steps.push(ProgramStep::Move {
            phase: MovePhase::Home,
            command: home,
        });

        let length_mm: f64 = path.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
        let program = MotionProgram::new(steps, path.len(), length_mm);
        tracing::info!(
            "Synthesized {} moves and {} dwells for {} points ({:.1} mm)",
            program.move_count(),
            program.dwell_count(),
            path.len(),
            length_mm
        );
        Ok(program)
    }
}

impl Default for TrajectorySynthesizer {
    fn default() -> Self {
        Self::new(MotionParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(points: &[(f64, f64)]) -> CaptureSession {
        let mut session = CaptureSession::new(2.0);
        for &(x, y) in points {
            session.submit_sample(Point2D::new(x, y));
        }
        session.close().expect("close");
        session
    }

    #[test]
    fn test_pose_transform() {
        let pose = TrajectorySynthesizer::pose_at(&Point2D::new(150.0, 75.0), 0.010);
        assert_eq!(pose.to_array(), [-0.150, 0.075, -0.010, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rejects_open_sessions() {
        let synth = TrajectorySynthesizer::default();

        let empty = CaptureSession::new(2.0);
        assert!(matches!(
            synth.synthesize(&empty),
            Err(UsageError::InvalidState { ref state, .. }) if state == "Empty"
        ));

        let mut capturing = CaptureSession::new(2.0);
        capturing.submit_sample(Point2D::new(10.0, 10.0));
        assert!(matches!(
            synth.synthesize(&capturing),
            Err(UsageError::InvalidState { ref state, .. }) if state == "Capturing"
        ));
    }

    #[test]
    fn test_rejects_closed_session_without_points() {
        let session = CaptureSession::closed_without_points(2.0);
        assert_eq!(
            TrajectorySynthesizer::default().synthesize(&session),
            Err(UsageError::invalid_state("synthesize", "Closed with empty path"))
        );
    }

    #[test]
    fn test_phases_in_order() {
        let program = TrajectorySynthesizer::default()
            .synthesize(&closed(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0)]))
            .unwrap();

        let phases: Vec<_> = program.steps().iter().map(ProgramStep::phase).collect();
        assert_eq!(
            phases,
            vec![
                Some(MovePhase::Home),
                Some(MovePhase::Approach),
                Some(MovePhase::Settle),
                None,
                Some(MovePhase::Traverse),
                Some(MovePhase::Traverse),
                Some(MovePhase::Traverse),
                None,
                Some(MovePhase::Retract),
                Some(MovePhase::Home),
            ]
        );
    }

    #[test]
    fn test_approach_and_retract_use_reduced_accel() {
        let program = TrajectorySynthesizer::default()
            .synthesize(&closed(&[(100.0, 200.0)]))
            .unwrap();

        for step in program.steps() {
            if let ProgramStep::Move { phase, command } = step {
                match phase {
                    MovePhase::Approach | MovePhase::Retract => {
                        assert_eq!(command.accel(), 0.25);
                        let z = command.cartesian_target().unwrap().z;
                        assert!((z + 0.110).abs() < 1e-12);
                    }
                    MovePhase::Settle | MovePhase::Traverse => {
                        assert_eq!(command.accel(), 0.5);
                        assert_eq!(command.cartesian_target().unwrap().z, -0.010);
                    }
                    MovePhase::Home => assert_eq!(command.accel(), 1.6),
                }
            }
        }
    }

    #[test]
    fn test_path_length() {
        let program = TrajectorySynthesizer::default()
            .synthesize(&closed(&[(0.0, 0.0), (30.0, 40.0), (30.0, 0.0)]))
            .unwrap();
        assert_eq!(program.path_length_mm(), 90.0);
        assert_eq!(program.path_points(), 3);
    }
}
