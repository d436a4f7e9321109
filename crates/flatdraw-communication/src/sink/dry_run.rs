//! Sink that logs each step instead of driving a robot.

use super::{Ack, MotionSink};
use async_trait::async_trait;
use flatdraw_core::{RobotSetup, SinkError};
use flatdraw_designer::{MotionProgram, ProgramStep};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A batch as the dry-run sink received it
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedBatch {
    pub script_name: String,
    pub program: MotionProgram,
}

/// Logs every step through `tracing` and records the batches it accepted.
///
/// Failures can be queued with [`DryRunSink::fail_next`]; each call consumes
/// one before doing anything else.
#[derive(Debug, Default)]
pub struct DryRunSink {
    step_delay: Duration,
    honor_dwells: bool,
    failures: Mutex<VecDeque<SinkError>>,
    batches: Mutex<Vec<ExecutedBatch>>,
    attempts: Mutex<u32>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long after every step.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Actually wait out dwell steps instead of only logging them.
    pub fn with_dwells(mut self, honor: bool) -> Self {
        self.honor_dwells = honor;
        self
    }

    /// Queue a failure for the next call.
    pub fn fail_next(&self, error: SinkError) {
        self.failures.lock().push_back(error);
    }

    /// Batches executed successfully, oldest first.
    pub fn batches(&self) -> Vec<ExecutedBatch> {
        self.batches.lock().clone()
    }

    /// Number of `execute` calls, failed ones included.
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }
}

#[async_trait]
impl MotionSink for DryRunSink {
    async fn execute(
        &self,
        program: &MotionProgram,
        setup: &RobotSetup,
    ) -> Result<Ack, SinkError> {
        *self.attempts.lock() += 1;
        if let Some(err) = self.failures.lock().pop_front() {
            tracing::error!("Dry run of '{}' failed: {}", setup.script_name, err);
            return Err(err);
        }

        let started = Instant::now();
        tracing::info!(
            "Dry run '{}' for {} (tcp {}, payload {} kg, frame {})",
            setup.script_name,
            setup.address,
            setup.tcp,
            setup.payload.mass_kg,
            setup.reference_frame
        );

        for (i, step) in program.steps().iter().enumerate() {
            match step {
                ProgramStep::Move { phase, command } => {
                    tracing::info!("[{}] {:?}: {}", i, phase, command);
                }
                ProgramStep::Dwell(duration) => {
                    tracing::info!("[{}] sleep({:.1})", i, duration.as_secs_f64());
                    if self.honor_dwells {
                        tokio::time::sleep(*duration).await;
                    }
                }
            }
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        self.batches.lock().push(ExecutedBatch {
            script_name: setup.script_name.clone(),
            program: program.clone(),
        });

        Ok(Ack {
            steps_executed: program.len(),
            duration: started.elapsed(),
        })
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
