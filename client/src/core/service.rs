//! # Service Traits
//!
//! Seams between the client and its environment. Production implementations
//! live in [`crate::storage`], [`crate::navigation`] and
//! [`crate::services::stream`]; tests use the fakes in `crate::testing`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use url::Url;

use super::error::Result;

/// Durable key/value storage for client-side state.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// The value must be durable once this returns `Ok`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Client-side route changes (`/login`, `/dashboard`).
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// One-shot delayed callbacks.
///
/// Implementations must never run `task` inline from `schedule`.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Box<dyn ScheduledTask>;
}

pub trait ScheduledTask: Send {
    /// Prevent the task from running if it has not started. Idempotent.
    fn cancel(&self);
}

/// Lifecycle and data events reported by a transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed { code: Option<u16>, reason: String },
}

/// Callback receiving every event of one connection, in order.
pub type TransportSink = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// Message-oriented duplex transport (the event stream's socket).
///
/// `open` returns immediately. Failures to connect are reported through the
/// sink as `Error` followed by `Closed`; the sink is never called from inside
/// `open` itself.
pub trait Transport: Send + Sync {
    fn open(&self, url: &Url, sink: TransportSink) -> Box<dyn TransportConnection>;
}

pub trait TransportConnection: Send {
    /// Queue a text frame. Returns `false` if the connection is already gone.
    fn send(&self, text: String) -> bool;

    /// Close the connection. Idempotent.
    fn close(&self);
}

/// Source of the bearer token for authenticated calls.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Authentication endpoints used by [`crate::stores::AuthStore`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse>;

    async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse>;

    async fn current_user(&self) -> Result<User>;

    async fn update_profile(&self, changes: &UpdateProfileRequest) -> Result<User>;
}
