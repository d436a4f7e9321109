//! # FlatDraw Designer
//!
//! Turns pointer samples on a flat workspace into a robot drawing program.
//!
//! - [`capture`]: the path capture state machine and its finish gesture
//! - [`preview`]: the overlay derived from the session and the pointer
//! - [`trajectory`]: synthesis of the home/approach/trace/retract program
//! - [`session`]: the reset lifecycle and event dispatch around all three

pub mod capture;
pub mod preview;
pub mod session;
pub mod trajectory;

pub use capture::{CaptureSession, CaptureState, SampleOutcome};
pub use preview::{PendingSegment, PreviewState};
pub use session::{DrawingSession, FrameSnapshot, SharedSession};
pub use trajectory::{
    MotionCommand, MotionProgram, MovePhase, ProgramStep, TrajectorySynthesizer,
};
