//! Motion sink trait and adapters.

mod dry_run;
mod retry;

pub use dry_run::{DryRunSink, ExecutedBatch};
pub use retry::RetryingSink;

use async_trait::async_trait;
use flatdraw_core::{RobotSetup, SinkError};
use flatdraw_designer::MotionProgram;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Terminal confirmation of a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Steps the sink ran, moves and dwells
    pub steps_executed: usize,
    /// Time spent inside the sink
    pub duration: Duration,
}

/// External capability that executes a motion batch
///
/// Implementations run the steps in the given order, without reordering or
/// dropping any, and return exactly one result per call. `setup` carries the
/// link context (address, script name, tool, payload, reference frame) and
/// is passed through unvalidated.
#[async_trait]
pub trait MotionSink: Send + Sync {
    /// Execute one batch to completion
    async fn execute(&self, program: &MotionProgram, setup: &RobotSetup)
        -> Result<Ack, SinkError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "sink"
    }
}

#[async_trait]
impl<S: MotionSink + ?Sized> MotionSink for Arc<S> {
    async fn execute(
        &self,
        program: &MotionProgram,
        setup: &RobotSetup,
    ) -> Result<Ack, SinkError> {
        (**self).execute(program, setup).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
