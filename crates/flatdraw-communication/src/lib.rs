//! # FlatDraw Communication
//!
//! The boundary between synthesized motion programs and the robot link.
//! A [`MotionSink`] accepts one ordered batch and returns one terminal
//! result; [`ExecutionJob`] runs it off the input path with optional
//! timeout and cancellation.

pub mod job;
pub mod sink;

pub use job::ExecutionJob;
pub use sink::{Ack, DryRunSink, ExecutedBatch, MotionSink, RetryingSink};
