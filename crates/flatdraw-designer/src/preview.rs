//! Transient preview derived from the capture session and the pointer.

use crate::capture::{CaptureSession, CaptureState};
use flatdraw_core::Point2D;
use serde::{Deserialize, Serialize};

/// Dashed segment from the last accepted point to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingSegment {
    pub start: Point2D,
    pub end: Point2D,
}

impl PendingSegment {
    /// Segment length in millimeters.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Overlay state for the renderer. Never feeds back into the path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewState {
    /// Pointer position, drawn as the tool footprint.
    pub last_pointer_sample: Option<Point2D>,
    /// Segment the next click would add.
    pub pending_segment: Option<PendingSegment>,
    /// Radius of the tool footprint around the pointer (mm).
    pub hover_radius_mm: f64,
}

impl PreviewState {
    /// The empty preview shown when nothing is being captured.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recompute the preview for a pointer-move sample.
    ///
    /// `sample` is `None` when the pointer is outside the workspace. Closed
    /// sessions always yield the empty preview.
    pub fn compute(
        session: &CaptureSession,
        sample: Option<Point2D>,
        hover_radius_mm: f64,
    ) -> Self {
        if session.state() == CaptureState::Closed {
            return Self::empty();
        }
        let Some(pointer) = sample else {
            return Self::empty();
        };

        Self {
            last_pointer_sample: Some(pointer),
            pending_segment: session.last_point().map(|start| PendingSegment {
                start: *start,
                end: pointer,
            }),
            hover_radius_mm,
        }
    }

    /// End of the pending segment, if any.
    pub fn pending_segment_end(&self) -> Option<Point2D> {
        self.pending_segment.map(|segment| segment.end)
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.last_pointer_sample.is_none() && self.pending_segment.is_none()
    }
}
