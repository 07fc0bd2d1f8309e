//! # Panel Client - Library Root
//!
//! Typed client for the VPS Panel deployment platform.
//!
//! ## Features
//!
//! - **Session management**: persisted token and profile, forced logout on 401
//! - **REST gateway**: bearer attachment, 204 handling, error normalisation
//! - **Typed endpoints**: projects, environments, domains, deployments, build
//!   logs, git providers and OAuth
//! - **Live events**: deployment status and build logs over WebSocket, with
//!   per-project subscription and exponential reconnect backoff
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 App (composition root)                 │
//! ├──────────────┬──────────────┬──────────────────────────┤
//! │ AuthStore    │ ApiClient    │ EventStreamClient        │
//! │ ThemeStore   │ (reqwest)    │ (tokio-tungstenite)      │
//! ├──────────────┴──────┬───────┴──────────────────────────┤
//! │ SessionStore        │ Storage / Navigator / Scheduler  │
//! └─────────────────────┴──────────────────────────────────┘
//!          │ HTTP/JSON                 │ WebSocket
//!          ▼                           ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                 Panel backend (/api/v1)                │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: `App::create` / `App::dispose`
//! - **config**: environment-driven [`ClientConfig`]
//! - **core**: [`ClientError`] and the collaborator traits
//! - **debug**: logging setup
//! - **services**: `api` (REST) and `stream` (events)
//! - **storage**, **navigation**: production collaborators
//! - **stores**: session, auth and theme state
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use panel_client::{App, ClientConfig};
//! use panel_client::navigation::ChannelNavigator;
//! use panel_client::storage::MemoryStorage;
//!
//! # async fn run() -> panel_client::Result<()> {
//! let (navigator, _routes) = ChannelNavigator::new();
//! let app = App::create(
//!     ClientConfig::load()?,
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(navigator),
//! )?;
//!
//! app.auth.login("dev@example.com", "correct horse").await?;
//! app.stream.subscribe_to_project(42);
//! app.stream.connect();
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod navigation;
pub mod services;
pub mod storage;
pub mod stores;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::ClientConfig;
pub use core::{ClientError, Result};
