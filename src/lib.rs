//! # FlatDraw
//!
//! Sketch a planar path by pointing at a bounded workspace, preview it, and
//! turn the finished path into a motion program for a robot arm.
//!
//! ## Architecture
//!
//! FlatDraw is organized as a workspace with multiple crates:
//!
//! 1. **flatdraw-core** - Points, poses, units, errors, event bus
//! 2. **flatdraw-settings** - Configuration file load/save/validate
//! 3. **flatdraw-designer** - Capture state machine, preview, trajectory synthesis
//! 4. **flatdraw-communication** - Motion sink boundary and batch execution
//! 5. **flatdraw** - Headless host that replays pointer events

pub mod host;

pub use flatdraw_communication::{Ack, DryRunSink, ExecutionJob, MotionSink, RetryingSink};
pub use flatdraw_core::{
    event_bus, AppEvent, CartesianPose, Error, EventBus, JointPose, MotionParameters, Point2D,
    Result, RobotSetup, SinkError, UsageError, WorkspaceBounds, WorkspaceSettings,
};
pub use flatdraw_designer::{
    CaptureSession, CaptureState, DrawingSession, FrameSnapshot, MotionCommand, MotionProgram,
    PreviewState, ProgramStep, TrajectorySynthesizer,
};
pub use flatdraw_settings::{Config, ExecutionSettings};
pub use host::{Host, HostEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty output on stderr, leaving stdout for frame snapshots
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
