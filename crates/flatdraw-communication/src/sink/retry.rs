//! Retry adapter for transient sink failures.

use super::{Ack, MotionSink};
use async_trait::async_trait;
use flatdraw_core::event_bus::ExecutionEvent;
use flatdraw_core::{AppEvent, EventBus, RobotSetup, SinkError};
use flatdraw_designer::MotionProgram;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a sink and resubmits the whole batch on retryable errors.
///
/// Only link-level failures are retried; a rejected batch, a timeout or a
/// cancellation is returned as is. With `max_attempts == 1` this is a plain
/// pass-through.
pub struct RetryingSink<S> {
    inner: S,
    max_attempts: u32,
    retry_delay: Duration,
    events: Option<Arc<EventBus>>,
}

impl<S: MotionSink> RetryingSink<S> {
    pub fn new(inner: S, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            retry_delay,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[async_trait]
impl<S: MotionSink> MotionSink for RetryingSink<S> {
    async fn execute(
        &self,
        program: &MotionProgram,
        setup: &RobotSetup,
    ) -> Result<Ack, SinkError> {
        let mut attempt = 1;
        loop {
            match self.inner.execute(program, setup).await {
                Ok(ack) => return Ok(ack),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "{} failed ({}), retrying {}/{}",
                        self.inner.name(),
                        err,
                        attempt,
                        self.max_attempts
                    );
                    if let Some(bus) = &self.events {
                        bus.publish(AppEvent::Execution(ExecutionEvent::Retrying {
                            attempt,
                            max_attempts: self.max_attempts,
                        }));
                    }
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
