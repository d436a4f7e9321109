//! Event type definitions for the event bus.
//!
//! Events are grouped by the component that emits them. They are cloneable
//! and serializable so hosts can log or replay a drawing session.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::data::Point2D;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Path capture and session lifecycle
    Capture(CaptureEvent),
    /// Trajectory synthesis
    Trajectory(TrajectoryEvent),
    /// Motion batch execution
    Execution(ExecutionEvent),
    /// Rejected operations
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Capture(_) => EventCategory::Capture,
            AppEvent::Trajectory(_) => EventCategory::Trajectory,
            AppEvent::Execution(_) => EventCategory::Execution,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Capture(e) => e.description(),
            AppEvent::Trajectory(e) => e.description(),
            AppEvent::Execution(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Capture and reset events.
    Capture,
    /// Synthesis events.
    Trajectory,
    /// Sink execution events.
    Execution,
    /// Error events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Capture => write!(f, "Capture"),
            EventCategory::Trajectory => write!(f, "Trajectory"),
            EventCategory::Execution => write!(f, "Execution"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Capture-related events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaptureEvent {
    /// A pointer-down sample was appended to the path.
    PointAccepted {
        /// Position of the new point.
        point: Point2D,
        /// Zero-based index of the point in the path.
        index: usize,
    },
    /// The terminating gesture (or a finalize request) closed the path.
    PathClosed {
        /// Number of points in the closed path.
        points: usize,
    },
    /// The session was discarded and a new empty one started.
    SessionReset,
}

impl CaptureEvent {
    fn description(&self) -> String {
        match self {
            CaptureEvent::PointAccepted { point, index } => {
                format!("Point {} accepted at {}", index, point)
            }
            CaptureEvent::PathClosed { points } => {
                format!("End of path detected ({} points)", points)
            }
            CaptureEvent::SessionReset => "Session reset".to_string(),
        }
    }
}

/// Trajectory synthesis events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrajectoryEvent {
    /// A motion program was produced from a closed path.
    ProgramSynthesized {
        /// Number of points in the source path.
        path_points: usize,
        /// Number of motion commands in the program.
        moves: usize,
        /// Number of dwell steps in the program.
        dwells: usize,
    },
}

impl TrajectoryEvent {
    fn description(&self) -> String {
        match self {
            TrajectoryEvent::ProgramSynthesized {
                path_points,
                moves,
                dwells,
            } => format!(
                "Program synthesized: {} points, {} moves, {} dwells",
                path_points, moves, dwells
            ),
        }
    }
}

/// Motion batch execution events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionEvent {
    /// A batch was handed to the sink.
    Started {
        /// Program name used by the sink.
        script_name: String,
        /// Number of steps in the batch.
        steps: usize,
    },
    /// The sink will try the batch again.
    Retrying {
        /// Attempt about to start (1-based).
        attempt: u32,
        /// Maximum number of attempts.
        max_attempts: u32,
    },
    /// The sink reported success.
    Completed {
        /// Wall-clock time spent in the sink.
        duration: Duration,
    },
    /// The sink reported failure.
    Failed {
        /// Error message from the sink.
        error: String,
    },
    /// The host cancelled the batch.
    Cancelled,
}

impl ExecutionEvent {
    fn description(&self) -> String {
        match self {
            ExecutionEvent::Started { script_name, steps } => {
                format!("Executing '{}' ({} steps)", script_name, steps)
            }
            ExecutionEvent::Retrying {
                attempt,
                max_attempts,
            } => format!("Retrying batch ({}/{})", attempt, max_attempts),
            ExecutionEvent::Completed { duration } => {
                format!("Batch completed in {:.2?}", duration)
            }
            ExecutionEvent::Failed { error } => format!("Batch failed: {}", error),
            ExecutionEvent::Cancelled => "Batch cancelled".to_string(),
        }
    }
}

/// Error events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// An operation was rejected because of the session state.
    UsageRejected {
        /// Error message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::UsageRejected { message } => format!("Rejected: {}", message),
        }
    }
}
