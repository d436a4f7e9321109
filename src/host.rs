//! Headless host: replays pointer events into a drawing session and runs
//! finalized programs on a motion sink.

use flatdraw_communication::{Ack, DryRunSink, ExecutionJob, MotionSink, RetryingSink};
use flatdraw_core::units::{format_length, LengthUnit};
use flatdraw_core::{EventBus, RobotSetup, SinkError};
use flatdraw_designer::{DrawingSession, FrameSnapshot};
use flatdraw_settings::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One input event, as read from a JSON line such as
/// `{"event":"pointer_down","x":10.0,"y":12.5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    Finalize,
    Reset,
}

impl HostEvent {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Option<serde_json::Result<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(serde_json::from_str(line))
    }
}

/// Routes host events into a [`DrawingSession`] and hands finalized
/// programs to the sink without waiting for them.
pub struct Host {
    session: DrawingSession,
    sink: Arc<dyn MotionSink>,
    setup: RobotSetup,
    timeout: Option<Duration>,
    events: Arc<EventBus>,
    jobs: Vec<ExecutionJob>,
}

impl Host {
    pub fn new(config: &Config, sink: Arc<dyn MotionSink>, events: Arc<EventBus>) -> Self {
        let session = DrawingSession::new(config.workspace, config.motion.clone())
            .with_event_bus(events.clone());
        Self {
            session,
            sink,
            setup: config.robot.clone(),
            timeout: config.execution.timeout(),
            events,
            jobs: Vec::new(),
        }
    }

    /// Host backed by a logging dry-run sink with the configured retry policy.
    pub fn dry_run(config: &Config, events: Arc<EventBus>) -> Self {
        let sink = RetryingSink::new(
            DryRunSink::new(),
            config.execution.max_attempts,
            config.execution.retry_delay(),
        )
        .with_event_bus(events.clone());
        Self::new(config, Arc::new(sink), events)
    }

    /// Applies one event and returns the frame to render.
    ///
    /// A finalize that succeeds spawns an execution job, so this must run
    /// inside a tokio runtime. Only one batch runs at a time: a finalize
    /// while the previous job is still running is ignored. Finished jobs are
    /// dropped at that point; their outcome was already published on the
    /// event bus. Usage errors are logged and leave the session as it was.
    pub fn handle(&mut self, event: HostEvent) -> FrameSnapshot {
        match event {
            HostEvent::PointerDown { x, y } => self.session.pointer_down(x, y),
            HostEvent::PointerMove { x, y } => self.session.pointer_move(x, y),
            HostEvent::Reset => self.session.reset(),
            HostEvent::Finalize => {
                self.jobs.retain(|job| !job.is_finished());
                if let Some(job) = self.jobs.last() {
                    tracing::warn!("Batch {} still running, finalize ignored", job.id());
                    return self.session.snapshot();
                }
                match self.session.finalize() {
                    Ok(program) => {
                        tracing::info!(
                            "Program ready: {} moves, {} dwells, {}, ~{:.1?}",
                            program.move_count(),
                            program.dwell_count(),
                            format_length(program.path_length_mm(), LengthUnit::Millimeters),
                            program.estimated_linear_time()
                        );
                        let job = ExecutionJob::spawn(
                            self.sink.clone(),
                            program,
                            self.setup.clone(),
                            self.timeout,
                            Some(self.events.clone()),
                        );
                        self.jobs.push(job);
                    }
                    Err(err) => tracing::warn!("Finalize rejected: {}", err),
                }
                self.session.snapshot()
            }
        }
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    /// Jobs spawned and not yet drained or dropped by a later finalize.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Cancels every outstanding job.
    pub fn cancel_all(&self) {
        for job in &self.jobs {
            job.cancel();
        }
    }

    /// Waits for every outstanding job, in spawn order.
    pub async fn drain(&mut self) -> Vec<Result<Ack, SinkError>> {
        let mut results = Vec::with_capacity(self.jobs.len());
        for job in self.jobs.drain(..) {
            results.push(job.wait().await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatdraw_designer::CaptureState;
    use std::io::Write;

    const SQUARE: &str = r#"
# square, closed by a click next to the last corner
{"event":"pointer_move","x":5.0,"y":5.0}
{"event":"pointer_down","x":10.0,"y":10.0}
{"event":"pointer_down","x":100.0,"y":10.0}
{"event":"pointer_down","x":400.0,"y":10.0}
{"event":"pointer_down","x":100.0,"y":100.0}
{"event":"pointer_down","x":10.0,"y":100.0}
{"event":"pointer_down","x":11.0,"y":101.0}
{"event":"finalize"}
"#;

    fn replay(host: &mut Host, script: &str) {
        for line in script.lines() {
            if let Some(event) = HostEvent::parse_line(line) {
                host.handle(event.expect("valid event"));
            }
        }
    }

    async fn wait_until_idle(host: &Host) {
        while !host.jobs.iter().all(ExecutionJob::is_finished) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            HostEvent::parse_line(r#"{"event":"pointer_down","x":10.0,"y":12.5}"#)
                .unwrap()
                .unwrap(),
            HostEvent::PointerDown { x: 10.0, y: 12.5 }
        );
        assert_eq!(
            HostEvent::parse_line(r#"{"event":"finalize"}"#)
                .unwrap()
                .unwrap(),
            HostEvent::Finalize
        );
        assert_eq!(
            HostEvent::parse_line(r#" {"event":"reset"} "#)
                .unwrap()
                .unwrap(),
            HostEvent::Reset
        );
    }

    #[test]
    fn test_skip_blank_and_comment_lines() {
        assert!(HostEvent::parse_line("").is_none());
        assert!(HostEvent::parse_line("   ").is_none());
        assert!(HostEvent::parse_line("# square").is_none());
    }

    #[test]
    fn test_malformed_line_is_error() {
        assert!(HostEvent::parse_line(r#"{"event":"teleport"}"#)
            .unwrap()
            .is_err());
        assert!(HostEvent::parse_line("pointer_down 1 2").unwrap().is_err());
    }

    #[test]
    fn test_finalize_on_empty_session_spawns_nothing() {
        let mut host = Host::dry_run(&Config::default(), Arc::new(EventBus::new()));
        let frame = host.handle(HostEvent::Finalize);
        assert!(frame.path.is_empty());
        assert_eq!(host.pending_jobs(), 0);
    }

    #[tokio::test]
    async fn test_replay_square_on_dry_run() {
        let sink = Arc::new(DryRunSink::new());
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        replay(&mut host, SQUARE);
        assert_eq!(host.session().state(), CaptureState::Closed);
        assert_eq!(host.session().capture().len(), 4);
        assert_eq!(host.pending_jobs(), 1);

        let results = host.drain().await;
        assert_eq!(results.len(), 1);
        let ack = results[0].as_ref().expect("ack");
        assert_eq!(ack.steps_executed, 4 + 7);

        let batches = sink.batches();
        assert_eq!(batches[0].program.move_count(), 9);
        assert_eq!(batches[0].script_name, "draw_in_2D");
    }

    #[tokio::test]
    async fn test_failed_execution_keeps_path() {
        let sink = Arc::new(DryRunSink::new());
        sink.fail_next(SinkError::Rejected {
            reason: "protective stop".to_string(),
        });
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        replay(&mut host, SQUARE);
        let path_before = host.session().snapshot().path;
        let results = host.drain().await;
        assert!(matches!(results[0], Err(SinkError::Rejected { .. })));

        assert_eq!(host.session().snapshot().path, path_before);
        assert_eq!(host.session().state(), CaptureState::Closed);

        // Finalizing the closed session again resubmits the same program
        let expected = host.session().synthesize().expect("program");
        host.handle(HostEvent::Finalize);
        let results = host.drain().await;
        assert!(results[0].is_ok());
        assert_eq!(sink.batches()[0].program, expected);
    }

    #[tokio::test]
    async fn test_reset_then_new_path() {
        let sink = Arc::new(DryRunSink::new());
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        replay(&mut host, SQUARE);
        host.drain().await;

        let frame = host.handle(HostEvent::Reset);
        assert_eq!(frame.state, CaptureState::Empty);
        host.handle(HostEvent::PointerDown { x: 50.0, y: 50.0 });
        host.handle(HostEvent::PointerDown { x: 150.0, y: 50.0 });
        host.handle(HostEvent::Finalize);
        host.drain().await;

        let batches = sink.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].program.path_points(), 2);
    }

    #[tokio::test]
    async fn test_timeout_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flatdraw.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[execution]\ntimeout_ms = 10\n").unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.execution.timeout_ms, Some(10));

        let sink: Arc<dyn MotionSink> =
            Arc::new(DryRunSink::new().with_step_delay(Duration::from_millis(25)));
        let mut host = Host::new(&config, sink, Arc::new(EventBus::new()));
        replay(&mut host, SQUARE);

        let results = host.drain().await;
        assert_eq!(results[0], Err(SinkError::Timeout { timeout_ms: 10 }));
    }

    #[tokio::test]
    async fn test_finalize_while_batch_running_is_ignored() {
        let sink = Arc::new(DryRunSink::new().with_step_delay(Duration::from_millis(20)));
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        host.handle(HostEvent::PointerDown { x: 10.0, y: 10.0 });
        host.handle(HostEvent::PointerDown { x: 90.0, y: 90.0 });
        host.handle(HostEvent::Finalize);
        tokio::time::sleep(Duration::from_millis(30)).await;

        let frame = host.handle(HostEvent::Finalize);
        assert_eq!(frame.state, CaptureState::Closed);
        assert_eq!(frame.path.len(), 2);
        assert_eq!(host.pending_jobs(), 1);

        let results = host.drain().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(sink.attempts(), 1);
    }

    #[tokio::test]
    async fn test_ignored_finalize_leaves_new_path_capturing() {
        let sink = Arc::new(DryRunSink::new().with_step_delay(Duration::from_millis(20)));
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        replay(&mut host, SQUARE);
        host.handle(HostEvent::Reset);
        host.handle(HostEvent::PointerDown { x: 50.0, y: 50.0 });
        let frame = host.handle(HostEvent::Finalize);
        assert_eq!(frame.state, CaptureState::Capturing);
        assert_eq!(frame.path.len(), 1);

        host.drain().await;
        assert_eq!(sink.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_finished_jobs_dropped_on_finalize() {
        let sink = Arc::new(DryRunSink::new());
        let mut host = Host::new(&Config::default(), sink.clone(), Arc::new(EventBus::new()));

        replay(&mut host, SQUARE);
        wait_until_idle(&host).await;
        assert_eq!(host.pending_jobs(), 1);

        host.handle(HostEvent::Finalize);
        assert_eq!(host.pending_jobs(), 1);

        let results = host.drain().await;
        assert_eq!(results.len(), 1);
        assert_eq!(sink.batches().len(), 2);
    }
}
