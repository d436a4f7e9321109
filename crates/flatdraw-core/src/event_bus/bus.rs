//! Event bus: synchronous handlers plus a tokio broadcast channel, with an
//! optional bounded log of sequenced events.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Which categories a handler wants. No categories means everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    categories: Vec<EventCategory>,
}

impl EventFilter {
    /// Accept every event
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only events in `categories`
    pub fn only(categories: impl IntoIterator<Item = EventCategory>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn matches(&self, event: &AppEvent) -> bool {
        self.categories.is_empty() || self.categories.contains(&event.category())
    }
}

type Handler = Box<dyn Fn(&AppEvent) + Send + Sync>;

/// Bus sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Broadcast buffer per receiver; slow receivers lag past this.
    pub channel_capacity: usize,
    /// Keep the last N events for [`EventBus::log`]. `None` keeps nothing.
    pub log_limit: Option<usize>,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            log_limit: None,
        }
    }
}

/// An event as recorded in the bus log
#[derive(Debug, Clone, Serialize)]
pub struct LoggedEvent {
    /// Publication order, starting at 1
    pub seq: u64,
    pub category: EventCategory,
    pub event: AppEvent,
}

/// Fan-out point for drawing, trajectory and execution events
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, Handler)>>,
    log: Mutex<VecDeque<LoggedEvent>>,
    next_seq: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            log: Mutex::new(VecDeque::new()),
            next_seq: AtomicU64::new(1),
            config,
        }
    }

    /// Delivers `event` to matching handlers, then to broadcast receivers.
    ///
    /// Returns the sequence number given to the event. Nobody listening is
    /// fine.
    pub fn publish(&self, event: AppEvent) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("event #{}: {}", seq, event.description());

        for (filter, handler) in self.handlers.read().values() {
            if filter.matches(&event) {
                handler(&event);
            }
        }

        if let Some(limit) = self.config.log_limit {
            let mut log = self.log.lock();
            log.push_back(LoggedEvent {
                seq,
                category: event.category(),
                event: event.clone(),
            });
            while log.len() > limit {
                log.pop_front();
            }
        }

        // Err only means there are no receivers right now
        let _ = self.sender.send(event);
        seq
    }

    /// Registers a handler that runs on the publishing thread.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Event handler {} registered", id);
        id
    }

    /// Removes a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.write().remove(&id).is_some()
    }

    /// A receiver for async consumers; sees events published from now on.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Logged events, oldest first.
    pub fn log(&self) -> Vec<LoggedEvent> {
        self.log.lock().iter().cloned().collect()
    }

    /// Empties the log and returns what it held.
    pub fn take_log(&self) -> Vec<LoggedEvent> {
        self.log.lock().drain(..).collect()
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .field("published", &(self.next_seq.load(Ordering::Relaxed) - 1))
            .field("config", &self.config)
            .finish()
    }
}

static GLOBAL_BUS: OnceLock<Arc<EventBus>> = OnceLock::new();

/// The process-wide bus, created with defaults on first use.
pub fn event_bus() -> Arc<EventBus> {
    GLOBAL_BUS.get_or_init(|| Arc::new(EventBus::new())).clone()
}

/// Creates the process-wide bus with `config`.
///
/// Fails, handing `config` back, once the bus exists.
pub fn init_event_bus(config: EventBusConfig) -> Result<Arc<EventBus>, EventBusConfig> {
    let bus = Arc::new(EventBus::with_config(config.clone()));
    GLOBAL_BUS.set(bus.clone()).map_err(|_| config)?;
    Ok(bus)
}
