//! # Event Stream Client
//!
//! Owns the single live connection to the deployment event endpoint and
//! reconnects after unplanned closes with exponential backoff.
//!
//! ## State machine
//!
//! ```text
//! Idle --connect()--> Connecting --Opened--> Open
//!                         |                   |
//!                         +------Closed-------+--> Closed --timer--> Connecting
//! any --disconnect()--> Idle (stopped)
//! ```
//!
//! All state lives behind one mutex. Transport and timer callbacks carry the
//! connection id or timer token they were created for, and anything that no
//! longer matches the current one is ignored. Listeners are always invoked
//! with the lock released.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lib_utils::now_utc;
use parking_lot::Mutex;
use serde::Serialize;
use shared::StreamEvent;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use super::backoff::BackoffPolicy;
use crate::core::{
    ScheduledTask, Scheduler, TokenProvider, Transport, TransportConnection, TransportEvent,
    TransportSink,
};

// region:    --- Types

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseReason {
    pub code: Option<u16>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed(CloseReason),
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Connecting => f.write_str("connecting"),
            Self::Open => f.write_str("open"),
            Self::Closed(reason) => match reason.code {
                Some(code) => write!(f, "closed ({code})"),
                None => f.write_str("closed"),
            },
        }
    }
}

/// Which events the server should deliver on the next connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionFilter {
    #[default]
    All,
    Project(i64),
}

impl fmt::Display for SubscriptionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Project(id) => write!(f, "project:{id}"),
        }
    }
}

/// Snapshot of the stream client, published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamStatus {
    pub state: ConnectionState,
    pub filter: SubscriptionFilter,
    /// Delay the next reconnect will wait.
    pub backoff_delay: Duration,
    pub last_error: Option<String>,
    /// When the current connection opened; `None` unless `Open`.
    pub connected_at: Option<DateTime<Utc>>,
    /// Unplanned closes since the last successful open.
    pub reconnect_attempts: u32,
    pub messages_received: u64,
}

impl StreamStatus {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Open
    }
}

type Listener = Arc<dyn Fn(&StreamEvent) + Send + Sync>;

// endregion: --- Types

// region:    --- State

struct ActiveConnection {
    id: u64,
    handle: Box<dyn TransportConnection>,
}

struct PendingReconnect {
    token: u64,
    task: Box<dyn ScheduledTask>,
}

struct Inner {
    state: ConnectionState,
    filter: SubscriptionFilter,
    backoff: Duration,
    last_error: Option<String>,
    connected_at: Option<DateTime<Utc>>,
    stopped: bool,
    connection: Option<ActiveConnection>,
    next_connection_id: u64,
    reconnect: Option<PendingReconnect>,
    next_timer_token: u64,
    listeners: BTreeMap<u64, Listener>,
    next_listener_id: u64,
    reconnect_attempts: u32,
    messages_received: u64,
}

impl Inner {
    fn is_current(&self, connection_id: u64) -> bool {
        self.connection.as_ref().is_some_and(|c| c.id == connection_id)
    }

    fn status(&self) -> StreamStatus {
        StreamStatus {
            state: self.state.clone(),
            filter: self.filter,
            backoff_delay: self.backoff,
            last_error: self.last_error.clone(),
            connected_at: self.connected_at,
            reconnect_attempts: self.reconnect_attempts,
            messages_received: self.messages_received,
        }
    }
}

/// `Transport::open` and `Scheduler::schedule` are called with `inner` held;
/// neither may call back synchronously.
struct Shared {
    endpoint: Url,
    policy: BackoffPolicy,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    tokens: Arc<dyn TokenProvider>,
    inner: Mutex<Inner>,
    status: watch::Sender<StreamStatus>,
}

// endregion: --- State

/// Live deployment event feed.
///
/// Cheap to clone; clones share the same connection.
#[derive(Clone)]
pub struct EventStreamClient {
    shared: Arc<Shared>,
}

impl fmt::Debug for EventStreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStreamClient")
            .field("endpoint", &self.shared.endpoint.as_str())
            .field("status", &self.status())
            .finish()
    }
}

impl EventStreamClient {
    pub fn new(
        endpoint: Url,
        policy: BackoffPolicy,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let inner = Inner {
            state: ConnectionState::Idle,
            filter: SubscriptionFilter::All,
            backoff: policy.initial,
            last_error: None,
            connected_at: None,
            stopped: false,
            connection: None,
            next_connection_id: 0,
            reconnect: None,
            next_timer_token: 0,
            listeners: BTreeMap::new(),
            next_listener_id: 0,
            reconnect_attempts: 0,
            messages_received: 0,
        };
        let (status, _) = watch::channel(inner.status());

        Self {
            shared: Arc::new(Shared {
                endpoint,
                policy,
                transport,
                scheduler,
                tokens,
                inner: Mutex::new(inner),
                status,
            }),
        }
    }

    /// Open the connection if it is not already open or opening.
    ///
    /// Without a session token this logs and returns, leaving the state as it
    /// was.
    pub fn connect(&self) {
        self.shared.open_connection(None);
    }

    /// Stop the stream: cancel any pending reconnect, close the connection
    /// and rest in `Idle`. Idempotent.
    pub fn disconnect(&self) {
        self.shared.disconnect();
    }

    /// Receive only events for `project_id`.
    pub fn subscribe_to_project(&self, project_id: i64) {
        self.shared.set_filter(SubscriptionFilter::Project(project_id));
    }

    pub fn subscribe_to_all(&self) {
        self.shared.set_filter(SubscriptionFilter::All);
    }

    /// Register `handler` for every decoded event, in arrival order.
    pub fn on_message<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StreamEvent) + Send + Sync + 'static,
    {
        let id = self.shared.add_listener(|_| Arc::new(handler));
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Channel fed with every decoded event. The backing listener goes away
    /// once the receiver is dropped and the next event arrives.
    pub fn events(&self) -> async_channel::Receiver<StreamEvent> {
        let (tx, rx) = async_channel::unbounded();
        let shared = Arc::downgrade(&self.shared);
        self.shared.add_listener(move |id| {
            Arc::new(move |event: &StreamEvent| {
                if tx.try_send(event.clone()).is_err() {
                    if let Some(shared) = shared.upgrade() {
                        shared.remove_listener(id);
                    }
                }
            })
        });
        rx
    }

    /// Serialize `message` and hand it to the open connection.
    ///
    /// Returns `false` when the stream is not open; nothing is queued.
    pub fn send<T: Serialize + ?Sized>(&self, message: &T) -> bool {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize outbound event-stream message");
                return false;
            }
        };

        let inner = self.shared.inner.lock();
        match (&inner.state, inner.connection.as_ref()) {
            (ConnectionState::Open, Some(connection)) => connection.handle.send(text),
            _ => {
                warn!(state = %inner.state, "Event stream not open, dropping outbound message");
                false
            }
        }
    }

    pub fn status(&self) -> StreamStatus {
        self.shared.inner.lock().status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StreamStatus> {
        self.shared.status.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.inner.lock().state.clone()
    }

    pub fn filter(&self) -> SubscriptionFilter {
        self.shared.inner.lock().filter
    }

    pub fn is_connected(&self) -> bool {
        self.shared.inner.lock().state == ConnectionState::Open
    }
}

/// Registration returned by [`EventStreamClient::on_message`].
///
/// Dropping it leaves the listener registered.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    /// Remove the listener. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.remove_listener(self.id))
    }
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.status.send_replace(inner.status());
    }

    fn event_url(&self, token: &str, filter: SubscriptionFilter) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", token);
            if let SubscriptionFilter::Project(id) = filter {
                query.append_pair("projectId", &id.to_string());
            }
        }
        url
    }

    fn sink(self: &Arc<Self>, connection_id: u64) -> TransportSink {
        let shared = Arc::downgrade(self);
        Arc::new(move |event| {
            if let Some(shared) = shared.upgrade() {
                shared.handle_event(connection_id, event);
            }
        })
    }

    // region:    --- Connection lifecycle

    /// `timer` is the token of the reconnect timer asking for this attempt;
    /// `None` for an explicit `connect()`.
    fn open_connection(self: &Arc<Self>, timer: Option<u64>) {
        let token = self.tokens.token();

        let (cancelled, stale) = {
            let mut inner = self.inner.lock();

            if let Some(timer) = timer {
                let due = !inner.stopped
                    && inner.reconnect.as_ref().is_some_and(|p| p.token == timer);
                if !due {
                    debug!(timer, "Ignoring stale reconnect timer");
                    return;
                }
                // The firing timer needs no cancel.
                inner.reconnect = None;
            }

            if matches!(inner.state, ConnectionState::Open | ConnectionState::Connecting) {
                debug!(state = %inner.state, "Event stream already active, connect ignored");
                return;
            }

            let Some(token) = token else {
                warn!("No session token, event stream not connected");
                return;
            };

            let cancelled = if timer.is_none() {
                inner.stopped = false;
                inner.reconnect.take()
            } else {
                None
            };

            inner.next_connection_id += 1;
            let id = inner.next_connection_id;
            let url = self.event_url(&token, inner.filter);

            inner.state = ConnectionState::Connecting;
            inner.last_error = None;
            info!(
                connection_id = id,
                filter = %inner.filter,
                attempt = inner.reconnect_attempts,
                "Connecting event stream"
            );

            let handle = self.transport.open(&url, self.sink(id));
            let stale = inner.connection.replace(ActiveConnection { id, handle });
            self.publish(&inner);
            (cancelled, stale)
        };

        if let Some(pending) = cancelled {
            pending.task.cancel();
        }
        if let Some(stale) = stale {
            stale.handle.close();
        }
    }

    fn disconnect(&self) {
        let (pending, connection) = {
            let mut inner = self.inner.lock();
            inner.stopped = true;
            let pending = inner.reconnect.take();
            let connection = inner.connection.take();
            if inner.state != ConnectionState::Idle {
                info!(state = %inner.state, "Event stream disconnected");
            }
            inner.state = ConnectionState::Idle;
            inner.connected_at = None;
            self.publish(&inner);
            (pending, connection)
        };

        if let Some(pending) = pending {
            pending.task.cancel();
        }
        if let Some(connection) = connection {
            connection.handle.close();
        }
    }

    fn set_filter(self: &Arc<Self>, filter: SubscriptionFilter) {
        let cycle = {
            let mut inner = self.inner.lock();
            if inner.filter == filter {
                debug!(filter = %filter, "Subscription filter unchanged");
                return;
            }
            inner.filter = filter;
            self.publish(&inner);
            matches!(inner.state, ConnectionState::Open | ConnectionState::Connecting)
        };

        if cycle {
            info!(filter = %filter, "Subscription changed, reconnecting event stream");
            self.disconnect();
            self.open_connection(None);
        }
    }

    // endregion: --- Connection lifecycle

    // region:    --- Transport events

    fn handle_event(self: &Arc<Self>, connection_id: u64, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                let mut inner = self.inner.lock();
                if !inner.is_current(connection_id) {
                    debug!(connection_id, "Ignoring open from stale connection");
                    return;
                }
                inner.state = ConnectionState::Open;
                inner.last_error = None;
                inner.connected_at = Some(now_utc());
                inner.backoff = self.policy.initial;
                inner.reconnect_attempts = 0;
                info!(connection_id, filter = %inner.filter, "Event stream open");
                self.publish(&inner);
            }
            TransportEvent::Message(text) => self.dispatch(connection_id, &text),
            TransportEvent::Error(message) => {
                let mut inner = self.inner.lock();
                if !inner.is_current(connection_id) {
                    return;
                }
                warn!(connection_id, error = %message, "Event stream transport error");
                inner.last_error = Some(message);
                self.publish(&inner);
            }
            TransportEvent::Closed { code, reason } => {
                self.handle_close(connection_id, CloseReason { code, reason });
            }
        }
    }

    fn dispatch(&self, connection_id: u64, text: &str) {
        let event = match serde_json::from_str::<StreamEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                warn!(connection_id, error = %e, len = text.len(), "Dropping malformed event-stream message");
                return;
            }
        };

        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock();
            if !inner.is_current(connection_id) {
                return;
            }
            inner.messages_received += 1;
            self.publish(&inner);
            inner.listeners.values().cloned().collect()
        };

        debug!(
            kind = ?event.kind(),
            project_id = ?event.project_id(),
            listeners = listeners.len(),
            "Event received"
        );
        for listener in listeners {
            listener(&event);
        }
    }

    fn handle_close(self: &Arc<Self>, connection_id: u64, reason: CloseReason) {
        let previous = {
            let mut inner = self.inner.lock();
            if !inner.is_current(connection_id) {
                debug!(connection_id, "Ignoring close from stale connection");
                return;
            }
            inner.connection = None;
            inner.connected_at = None;
            inner.state = ConnectionState::Closed(reason.clone());

            if inner.stopped {
                self.publish(&inner);
                return;
            }

            let delay = inner.backoff;
            inner.backoff = self.policy.next(delay);
            inner.reconnect_attempts += 1;
            inner.next_timer_token += 1;
            let token = inner.next_timer_token;

            warn!(
                code = ?reason.code,
                reason = %reason.reason,
                delay_ms = delay.as_millis() as u64,
                attempt = inner.reconnect_attempts,
                "Event stream closed, scheduling reconnect"
            );

            let shared = Arc::downgrade(self);
            let task = self.scheduler.schedule(
                delay,
                Box::new(move || {
                    if let Some(shared) = shared.upgrade() {
                        shared.open_connection(Some(token));
                    }
                }),
            );
            let previous = inner.reconnect.replace(PendingReconnect { token, task });
            self.publish(&inner);
            previous
        };

        if let Some(previous) = previous {
            previous.task.cancel();
        }
    }

    // endregion: --- Transport events

    // region:    --- Listeners

    fn add_listener(&self, make: impl FnOnce(u64) -> Listener) -> u64 {
        let mut inner = self.inner.lock();
        inner.next_listener_id += 1;
        let id = inner.next_listener_id;
        inner.listeners.insert(id, make(id));
        id
    }

    fn remove_listener(&self, id: u64) -> bool {
        self.inner.lock().listeners.remove(&id).is_some()
    }

    // endregion: --- Listeners
}

// region:    --- Tests


// endregion: --- Tests
