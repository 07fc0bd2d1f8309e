//! # Services Module
//!
//! Communication with the panel backend.
//!
//! ```text
//! services/
//! ├── api/     - REST gateway and typed endpoint wrappers
//! │              (auth, projects, deployments, git providers, OAuth)
//! └── stream/  - Live deployment event stream over WebSocket
//!                (reconnect with backoff, per-project subscription)
//! ```
//!
//! Both read the session token from [`crate::stores::SessionStore`]. A 401 on
//! any authenticated REST call clears the session; the event stream then
//! stops reconnecting until a new token exists.

pub mod api;
pub mod stream;
