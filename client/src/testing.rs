//! Deterministic fakes for the injected collaborators.
//!
//! Timers only fire when a test fires them and transport events only arrive
//! when a test emits them, so reconnect and backoff behaviour can be checked
//! step by step without a runtime or a socket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserRole,
};
use url::Url;

use crate::core::{
    AuthApi, ClientError, Navigator, Result, ScheduledTask, Scheduler, TokenProvider, Transport,
    TransportConnection, TransportEvent, TransportSink,
};

pub fn sample_user() -> User {
    User {
        id: 1,
        email: "ops@example.com".to_string(),
        name: "Ops".to_string(),
        role: UserRole::Admin,
        github_connected: false,
        github_username: None,
        gitlab_connected: false,
        gitlab_username: None,
        gitea_connected: false,
        gitea_username: None,
        gitea_url: None,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:00Z".to_string(),
    }
}

// region:    --- Navigation

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

// endregion: --- Navigation

// region:    --- Tokens

#[derive(Debug, Default)]
pub struct StaticToken(Mutex<Option<String>>);

impl StaticToken {
    pub fn new(token: Option<&str>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(token.map(str::to_string))))
    }

    pub fn set(&self, token: Option<&str>) {
        *self.0.lock() = token.map(str::to_string);
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.lock().clone()
    }
}

// endregion: --- Tokens

// region:    --- Scheduler

struct ManualTimer {
    delay: Duration,
    task: Option<Box<dyn FnOnce() + Send>>,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler whose timers only run when the test fires them.
#[derive(Default)]
pub struct ManualScheduler {
    timers: Mutex<Vec<ManualTimer>>,
}

struct ManualHandle(Arc<AtomicBool>);

impl ScheduledTask for ManualHandle {
    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Delays of every timer ever scheduled, in scheduling order.
    pub fn delays(&self) -> Vec<Duration> {
        self.timers.lock().iter().map(|t| t.delay).collect()
    }

    /// Timers neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        self.timers
            .lock()
            .iter()
            .filter(|t| t.task.is_some() && !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn is_cancelled(&self, index: usize) -> bool {
        self.timers.lock()[index].cancelled.load(Ordering::SeqCst)
    }

    /// Fire the oldest pending, non-cancelled timer.
    pub fn fire_next(&self) -> bool {
        let task = {
            let mut timers = self.timers.lock();
            timers
                .iter_mut()
                .find(|t| t.task.is_some() && !t.cancelled.load(Ordering::SeqCst))
                .and_then(|t| t.task.take())
        };
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Fire timer `index` even if it was cancelled, as a timer that was
    /// already running when `cancel` arrived would.
    pub fn fire_late(&self, index: usize) -> bool {
        let task = self.timers.lock()[index].task.take();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Box<dyn ScheduledTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().push(ManualTimer {
            delay,
            task: Some(task),
            cancelled: cancelled.clone(),
        });
        Box::new(ManualHandle(cancelled))
    }
}

// endregion: --- Scheduler

// region:    --- Transport

#[derive(Default)]
struct FakeConnectionState {
    sent: Mutex<Vec<String>>,
    closed_by_client: AtomicBool,
    closed_by_server: AtomicBool,
}

struct FakeConnectionRecord {
    url: Url,
    sink: TransportSink,
    state: Arc<FakeConnectionState>,
}

struct FakeConnection(Arc<FakeConnectionState>);

impl TransportConnection for FakeConnection {
    fn send(&self, text: String) -> bool {
        if self.0.closed_by_client.load(Ordering::SeqCst) {
            return false;
        }
        self.0.sent.lock().push(text);
        true
    }

    fn close(&self) {
        self.0.closed_by_client.store(true, Ordering::SeqCst);
    }
}

/// Transport that records every connection and lets the test drive events.
#[derive(Default)]
pub struct FakeTransport {
    connections: Mutex<Vec<FakeConnectionRecord>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Connections closed by neither side.
    pub fn live_count(&self) -> usize {
        self.connections
            .lock()
            .iter()
            .filter(|c| {
                !c.state.closed_by_client.load(Ordering::SeqCst)
                    && !c.state.closed_by_server.load(Ordering::SeqCst)
            })
            .count()
    }

    pub fn url(&self, index: usize) -> Url {
        self.connections.lock()[index].url.clone()
    }

    pub fn sent(&self, index: usize) -> Vec<String> {
        self.connections.lock()[index].state.sent.lock().clone()
    }

    pub fn closed_by_client(&self, index: usize) -> bool {
        self.connections.lock()[index]
            .state
            .closed_by_client
            .load(Ordering::SeqCst)
    }

    /// Deliver `event` on connection `index`.
    pub fn emit(&self, index: usize, event: TransportEvent) {
        let (sink, state) = {
            let connections = self.connections.lock();
            let record = &connections[index];
            (record.sink.clone(), record.state.clone())
        };
        if matches!(event, TransportEvent::Closed { .. }) {
            state.closed_by_server.store(true, Ordering::SeqCst);
        }
        sink(event);
    }

    pub fn open(&self, index: usize) {
        self.emit(index, TransportEvent::Opened);
    }

    pub fn message(&self, index: usize, text: &str) {
        self.emit(index, TransportEvent::Message(text.to_string()));
    }

    /// Abnormal server-side close (1006).
    pub fn drop_connection(&self, index: usize) {
        self.emit(
            index,
            TransportEvent::Closed {
                code: Some(1006),
                reason: String::new(),
            },
        );
    }
}

impl Transport for FakeTransport {
    fn open(&self, url: &Url, sink: TransportSink) -> Box<dyn TransportConnection> {
        let state = Arc::new(FakeConnectionState::default());
        self.connections.lock().push(FakeConnectionRecord {
            url: url.clone(),
            sink,
            state: state.clone(),
        });
        Box::new(FakeConnection(state))
    }
}

// endregion: --- Transport

// region:    --- Auth API

/// Auth backend accepting a single password.
pub struct FakeAuthApi {
    pub password: String,
    pub user: Mutex<User>,
    pub current_user_fails: AtomicBool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeAuthApi {
    pub fn new(password: &str) -> Arc<Self> {
        Arc::new(Self {
            password: password.to_string(),
            user: Mutex::new(sample_user()),
            current_user_fails: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn respond(&self) -> AuthResponse {
        AuthResponse {
            token: "token-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user: self.user.lock().clone(),
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        self.calls.lock().push("login");
        if credentials.password != self.password {
            return Err(ClientError::Auth("Invalid credentials".to_string()));
        }
        Ok(self.respond())
    }

    async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse> {
        self.calls.lock().push("register");
        {
            let mut user = self.user.lock();
            user.email = details.email.clone();
            user.name = details.name.clone();
        }
        Ok(self.respond())
    }

    async fn current_user(&self) -> Result<User> {
        self.calls.lock().push("current_user");
        if self.current_user_fails.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.user.lock().clone())
    }

    async fn update_profile(&self, changes: &UpdateProfileRequest) -> Result<User> {
        self.calls.lock().push("update_profile");
        let mut user = self.user.lock();
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        Ok(user.clone())
    }
}

// endregion: --- Auth API
