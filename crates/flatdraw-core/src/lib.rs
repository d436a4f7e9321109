//! # FlatDraw Core
//!
//! Core types, geometry helpers, and shared abstractions for FlatDraw.
//! Provides the data model for workspace points and robot poses, the
//! error taxonomy used across crates, and the application event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;
pub mod units;

pub use data::{
    CartesianPose, JointPose, MotionParameters, Payload, Point2D, RobotSetup, WorkspaceBounds,
    WorkspaceSettings,
};

pub use error::{Error, Result, SinkError, UsageError};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, init_event_bus, AppEvent, EventBus, EventBusConfig, EventCategory, EventFilter,
    LoggedEvent, SubscriptionId,
};

pub use types::{thread_safe, ThreadSafe};
