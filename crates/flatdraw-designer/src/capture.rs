//! Path capture state machine.
//!
//! Pointer-down samples accumulate into an ordered path until a sample lands
//! within the end-of-path tolerance of the last accepted point. That sample is
//! the finish gesture: it closes the session and is not recorded.

use flatdraw_core::{Point2D, UsageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    /// No point captured yet.
    Empty,
    /// At least one point captured, still accepting samples.
    Capturing,
    /// Finished; the path is frozen.
    Closed,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Empty => write!(f, "Empty"),
            CaptureState::Capturing => write!(f, "Capturing"),
            CaptureState::Closed => write!(f, "Closed"),
        }
    }
}

/// What a submitted sample did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// The sample was appended at `index`.
    Accepted { index: usize, point: Point2D },
    /// The sample was the finish gesture; the session is now closed.
    Closed,
    /// The session was already closed; nothing changed.
    Ignored,
}

/// An ordered path under construction plus its termination state.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSession {
    path: Vec<Point2D>,
    state: CaptureState,
    end_tolerance_mm: f64,
}

impl CaptureSession {
    /// Creates an empty session that closes on samples within
    /// `end_tolerance_mm` of the last point.
    pub fn new(end_tolerance_mm: f64) -> Self {
        debug_assert!(
            end_tolerance_mm.is_finite() && end_tolerance_mm >= 0.0,
            "end_tolerance_mm must be finite and non-negative, got {end_tolerance_mm}"
        );
        Self {
            path: Vec::new(),
            state: CaptureState::Empty,
            end_tolerance_mm,
        }
    }

    /// A closed session with no points, which `close()` never produces.
    #[cfg(test)]
    pub(crate) fn closed_without_points(end_tolerance_mm: f64) -> Self {
        Self {
            path: Vec::new(),
            state: CaptureState::Closed,
            end_tolerance_mm,
        }
    }

    /// Whether `point` would be taken as the finish gesture.
    pub fn is_finish_gesture(&self, point: &Point2D) -> bool {
        self.path
            .last()
            .is_some_and(|last| last.is_within(point, self.end_tolerance_mm))
    }

    /// Feeds one pointer-down sample into the session.
    pub fn submit_sample(&mut self, point: Point2D) -> SampleOutcome {
        if self.state == CaptureState::Closed {
            tracing::debug!("Sample {} ignored, session closed", point);
            return SampleOutcome::Ignored;
        }

        if self.is_finish_gesture(&point) {
            self.state = CaptureState::Closed;
            tracing::info!(
                "End of path detected at {} ({} points)",
                point,
                self.path.len()
            );
            return SampleOutcome::Closed;
        }

        self.path.push(point);
        self.state = CaptureState::Capturing;
        let index = self.path.len() - 1;
        tracing::debug!("Point {} accepted at {}", index, point);
        SampleOutcome::Accepted { index, point }
    }

    /// Closes the session without a finish gesture.
    ///
    /// Closing an already closed session is a no-op. An empty session cannot
    /// be closed because there is nothing to draw.
    pub fn close(&mut self) -> Result<(), UsageError> {
        match self.state {
            CaptureState::Empty => Err(UsageError::EmptyPath),
            CaptureState::Capturing => {
                self.state = CaptureState::Closed;
                tracing::info!("Path closed on request ({} points)", self.path.len());
                Ok(())
            }
            CaptureState::Closed => Ok(()),
        }
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Whether the path is frozen.
    pub fn is_closed(&self) -> bool {
        self.state == CaptureState::Closed
    }

    /// Captured points in traversal order.
    pub fn path(&self) -> &[Point2D] {
        &self.path
    }

    /// Most recently accepted point.
    pub fn last_point(&self) -> Option<&Point2D> {
        self.path.last()
    }

    /// Number of captured points.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether no point has been captured.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// End-of-path tolerance in millimeters.
    pub fn end_tolerance_mm(&self) -> f64 {
        self.end_tolerance_mm
    }
}
