use anyhow::Context;
use clap::Parser;
use flatdraw::{init_logging, AppEvent, Config, Host, HostEvent, BUILD_DATE, VERSION};
use flatdraw_core::event_bus::ExecutionEvent;
use flatdraw_core::{event_bus, init_event_bus, EventBusConfig, EventCategory, EventFilter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const EVENT_LOG_LIMIT: usize = 1000;

/// Replays JSON-lines pointer events and traces finalized paths on a dry-run sink
#[derive(Parser, Debug)]
#[command(name = "flatdraw", version)]
struct Args {
    /// Config file (JSON or TOML); defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines event file, read from stdin when omitted
    events: Option<PathBuf>,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Ok(Config::load_or_default(&path)?),
            Err(err) => {
                tracing::warn!("No config directory ({}), using defaults", err);
                Ok(Config::default())
            }
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("FlatDraw {} (built {})", VERSION, BUILD_DATE);

    let args = Args::parse();
    let config = load_config(args.config)?;
    let bus = init_event_bus(EventBusConfig {
        log_limit: Some(EVENT_LOG_LIMIT),
        ..Default::default()
    })
    .unwrap_or_else(|_| event_bus());
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = failures.clone();
    bus.subscribe(EventFilter::only([EventCategory::Execution]), move |event| {
        if matches!(
            event,
            AppEvent::Execution(ExecutionEvent::Failed { .. } | ExecutionEvent::Cancelled)
        ) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    });
    let mut host = Host::dry_run(&config, bus.clone());

    let reader: Box<dyn AsyncBufRead + Unpin> = match &args.events {
        Some(path) => Box::new(BufReader::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let event = match HostEvent::parse_line(&line) {
            None => continue,
            Some(Ok(event)) => event,
            Some(Err(err)) => {
                tracing::warn!("Skipping malformed event {:?}: {}", line, err);
                continue;
            }
        };
        let frame = host.handle(event);
        println!("{}", serde_json::to_string(&frame)?);
    }

    for result in host.drain().await {
        if let Err(err) = result.map_err(flatdraw::Error::from) {
            if err.is_timeout() {
                tracing::error!("Batch abandoned: {}", err);
            } else {
                tracing::error!("Batch failed: {}", err);
            }
        }
    }
    for logged in bus.take_log() {
        tracing::debug!("#{} [{}] {}", logged.seq, logged.category, logged.event.description());
    }

    let failures = failures.load(Ordering::Relaxed);
    if failures > 0 {
        anyhow::bail!("{} batch(es) failed", failures);
    }
    Ok(())
}
