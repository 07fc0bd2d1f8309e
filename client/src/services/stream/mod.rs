//! # Event Stream
//!
//! Live deployment events over a single WebSocket connection.
//!
//! - [`client`]: connection state machine, listeners, reconnect backoff
//! - [`backoff`]: reconnect delay policy
//! - [`transport`]: `tokio-tungstenite` implementation of [`crate::core::Transport`]
//! - [`scheduler`]: Tokio timers implementing [`crate::core::Scheduler`]

pub mod backoff;
pub mod client;
pub mod scheduler;
pub mod transport;

pub use backoff::BackoffPolicy;
pub use client::{
    CloseReason, ConnectionState, EventStreamClient, StreamStatus, Subscription, SubscriptionFilter,
};
pub use scheduler::TokioScheduler;
pub use transport::{WsConnection, WsTransport};
