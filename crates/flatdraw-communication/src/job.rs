//! Asynchronous, cancellable execution of a motion batch.

use crate::sink::{Ack, MotionSink};
use flatdraw_core::event_bus::ExecutionEvent;
use flatdraw_core::{AppEvent, EventBus, RobotSetup, SinkError};
use flatdraw_designer::MotionProgram;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Handle to a batch running on the tokio runtime.
///
/// The job owns its copy of the program; the drawing session is never
/// touched, so a failed or cancelled batch can be synthesized and sent again.
pub struct ExecutionJob {
    id: Uuid,
    handle: JoinHandle<Result<Ack, SinkError>>,
    events: Option<Arc<EventBus>>,
}

impl ExecutionJob {
    /// Hands `program` to `sink` on a new task.
    ///
    /// With a `timeout` the sink call is abandoned once it elapses and the
    /// job resolves to [`SinkError::Timeout`]. Must be called within a tokio
    /// runtime.
    pub fn spawn(
        sink: Arc<dyn MotionSink>,
        program: MotionProgram,
        setup: RobotSetup,
        timeout: Option<Duration>,
        events: Option<Arc<EventBus>>,
    ) -> Self {
        let id = Uuid::new_v4();
        let task_events = events.clone();

        let handle = tokio::spawn(async move {
            let publish = |event: ExecutionEvent| {
                if let Some(bus) = &task_events {
                    bus.publish(AppEvent::Execution(event));
                }
            };

            tracing::info!(
                "Job {}: sending '{}' ({} steps) to {}",
                id,
                setup.script_name,
                program.len(),
                sink.name()
            );
            publish(ExecutionEvent::Started {
                script_name: setup.script_name.clone(),
                steps: program.len(),
            });

            let started = Instant::now();
            let call = sink.execute(&program, &setup);
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(SinkError::Timeout {
                        timeout_ms: limit.as_millis() as u64,
                    }),
                },
                None => call.await,
            };

            match &result {
                Ok(ack) => {
                    tracing::info!(
                        "Job {}: batch completed, {} steps in {:.2?}",
                        id,
                        ack.steps_executed,
                        started.elapsed()
                    );
                    publish(ExecutionEvent::Completed {
                        duration: started.elapsed(),
                    });
                }
                Err(err) => {
                    tracing::error!("Job {}: batch failed: {}", id, err);
                    publish(ExecutionEvent::Failed {
                        error: err.to_string(),
                    });
                }
            }
            result
        });

        Self { id, handle, events }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Aborts the sink call at its next await point.
    pub fn cancel(&self) {
        tracing::info!("Job {}: cancel requested", self.id);
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the terminal result of the batch.
    pub async fn wait(self) -> Result<Ack, SinkError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                tracing::warn!("Job {}: batch cancelled", self.id);
                if let Some(bus) = &self.events {
                    bus.publish(AppEvent::Execution(ExecutionEvent::Cancelled));
                }
                Err(SinkError::Cancelled)
            }
            Err(err) => Err(SinkError::Other {
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DryRunSink;
    use flatdraw_core::{EventCategory, Point2D};
    use flatdraw_designer::{CaptureSession, TrajectorySynthesizer};

    fn program() -> MotionProgram {
        let mut session = CaptureSession::new(2.0);
        session.submit_sample(Point2D::new(10.0, 10.0));
        session.submit_sample(Point2D::new(90.0, 90.0));
        session.close().unwrap();
        TrajectorySynthesizer::default().synthesize(&session).unwrap()
    }

    #[tokio::test]
    async fn test_job_completes() {
        let sink = Arc::new(DryRunSink::new());
        let bus = Arc::new(EventBus::new());
        let mut rx = bus.receiver();

        let job = ExecutionJob::spawn(
            sink.clone(),
            program(),
            RobotSetup::default(),
            None,
            Some(bus),
        );
        let ack = job.wait().await.unwrap();
        assert_eq!(ack.steps_executed, 9);
        assert_eq!(sink.batches().len(), 1);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.category(), EventCategory::Execution);
        assert!(matches!(
            second,
            AppEvent::Execution(ExecutionEvent::Completed { .. })
        ));
    }

    #[tokio::test]
    async fn test_job_times_out() {
        let sink = Arc::new(DryRunSink::new().with_step_delay(Duration::from_millis(50)));
        let job = ExecutionJob::spawn(
            sink.clone(),
            program(),
            RobotSetup::default(),
            Some(Duration::from_millis(20)),
            None,
        );
        assert_eq!(job.wait().await, Err(SinkError::Timeout { timeout_ms: 20 }));
        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_job_cancel() {
        let sink = Arc::new(DryRunSink::new().with_step_delay(Duration::from_secs(5)));
        let bus = Arc::new(EventBus::new());
        let job = ExecutionJob::spawn(
            sink.clone(),
            program(),
            RobotSetup::default(),
            None,
            Some(bus.clone()),
        );
        let mut rx = bus.receiver();

        job.cancel();
        assert_eq!(job.wait().await, Err(SinkError::Cancelled));
        assert!(sink.batches().is_empty());

        let mut saw_cancel = false;
        while let Ok(event) = rx.try_recv() {
            saw_cancel |= matches!(event, AppEvent::Execution(ExecutionEvent::Cancelled));
        }
        assert!(saw_cancel);
    }
}
