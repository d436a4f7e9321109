//! Drawing session: the capture FSM, the preview and the synthesizer behind
//! the four host events (pointer down, pointer move, finalize, reset).

use crate::capture::{CaptureSession, CaptureState, SampleOutcome};
use crate::preview::PreviewState;
use crate::trajectory::{MotionProgram, TrajectorySynthesizer};
use flatdraw_core::event_bus::{CaptureEvent, ErrorEvent, TrajectoryEvent};
use flatdraw_core::{
    thread_safe, AppEvent, EventBus, MotionParameters, Point2D, ThreadSafe, UsageError,
    WorkspaceSettings,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only view of the session handed to the renderer after every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub state: CaptureState,
    pub path: Vec<Point2D>,
    pub preview: PreviewState,
}

/// A session shared by hosts that dispatch input from several threads.
pub type SharedSession = ThreadSafe<DrawingSession>;

/// Owns one capture session at a time and routes host events into it.
pub struct DrawingSession {
    workspace: WorkspaceSettings,
    synthesizer: TrajectorySynthesizer,
    capture: CaptureSession,
    preview: PreviewState,
    preview_armed: bool,
    events: Option<Arc<EventBus>>,
}

impl DrawingSession {
    pub fn new(workspace: WorkspaceSettings, motion: MotionParameters) -> Self {
        let capture = CaptureSession::new(workspace.end_tolerance_mm);
        Self {
            workspace,
            synthesizer: TrajectorySynthesizer::new(motion),
            capture,
            preview: PreviewState::empty(),
            preview_armed: true,
            events: None,
        }
    }

    /// Publish capture and trajectory events to `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    /// Wraps the session in a mutex so events are handled one at a time.
    pub fn into_shared(self) -> SharedSession {
        thread_safe(self)
    }

    fn publish(&self, event: AppEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    /// Handles a pointer-down sample in workspace millimeters.
    ///
    /// Samples outside the workspace are dropped without touching the path.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> FrameSnapshot {
        let Some(point) = self.workspace.bounds.sample(x, y) else {
            tracing::debug!("Pointer down at ({}, {}) outside workspace, ignored", x, y);
            return self.snapshot();
        };

        match self.capture.submit_sample(point) {
            SampleOutcome::Accepted { index, point } => {
                // Pending segment now starts at the new point
                if self.preview_armed {
                    self.preview = PreviewState::compute(
                        &self.capture,
                        self.preview.last_pointer_sample,
                        self.workspace.tool_radius_mm,
                    );
                }
                self.publish(AppEvent::Capture(CaptureEvent::PointAccepted { point, index }));
            }
            SampleOutcome::Closed => {
                self.on_closed();
            }
            SampleOutcome::Ignored => {}
        }
        self.snapshot()
    }

    /// Handles a pointer-move sample. Only the preview changes.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> FrameSnapshot {
        if self.preview_armed {
            let sample = self.workspace.bounds.sample(x, y);
            self.preview =
                PreviewState::compute(&self.capture, sample, self.workspace.tool_radius_mm);
        }
        self.snapshot()
    }

    /// Closes the path if still capturing, then synthesizes the program.
    ///
    /// An empty session is left untouched and reported as a usage error.
    pub fn finalize(&mut self) -> Result<MotionProgram, UsageError> {
        if self.capture.state() == CaptureState::Capturing {
            if let Err(err) = self.capture.close() {
                return Err(self.reject(err));
            }
            self.on_closed();
        }
        self.synthesize()
    }

    /// Synthesizes the program for an already closed path.
    pub fn synthesize(&self) -> Result<MotionProgram, UsageError> {
        match self.synthesizer.synthesize(&self.capture) {
            Ok(program) => {
                self.publish(AppEvent::Trajectory(TrajectoryEvent::ProgramSynthesized {
                    path_points: program.path_points(),
                    moves: program.move_count(),
                    dwells: program.dwell_count(),
                }));
                Ok(program)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Discards the path and preview and starts a new empty session.
    pub fn reset(&mut self) -> FrameSnapshot {
        self.capture = CaptureSession::new(self.workspace.end_tolerance_mm);
        self.preview = PreviewState::empty();
        self.preview_armed = true;
        tracing::info!("Session reset");
        self.publish(AppEvent::Capture(CaptureEvent::SessionReset));
        self.snapshot()
    }

    fn on_closed(&mut self) {
        self.preview = PreviewState::empty();
        self.preview_armed = false;
        self.publish(AppEvent::Capture(CaptureEvent::PathClosed {
            points: self.capture.len(),
        }));
    }

    fn reject(&self, err: UsageError) -> UsageError {
        tracing::warn!("{}", err);
        self.publish(AppEvent::Error(ErrorEvent::UsageRejected {
            message: err.to_string(),
        }));
        err
    }

    /// Current path and preview.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            state: self.capture.state(),
            path: self.capture.path().to_vec(),
            preview: self.preview,
        }
    }

    pub fn capture(&self) -> &CaptureSession {
        &self.capture
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    pub fn state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn workspace(&self) -> &WorkspaceSettings {
        &self.workspace
    }

    pub fn synthesizer(&self) -> &TrajectorySynthesizer {
        &self.synthesizer
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(WorkspaceSettings::default(), MotionParameters::default())
    }
}
