//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the panel client and the backend via the REST API and the event stream.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, auth responses and user profiles
//! - [`project`] - Projects, environment variables, domains, framework detection
//! - [`deployment`] - Deployments and build logs
//! - [`git_provider`] - Git providers, OAuth initiation and repository listings
//! - [`events`] - Event-stream envelope (`{type, payload}`)
//!
//! ## Serialization Format
//!
//! - **Field naming**: snake_case (default serde behavior), camelCase for event payloads
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Enums**: Serialize to lowercase strings using `#[serde(rename_all = "lowercase")]`
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/v1/auth/login
//! Content-Type: application/json
//!
//! {
//!   "email": "ops@example.com",
//!   "password": "MyPassword123!"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "refresh_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "user": {
//!     "id": 1,
//!     "email": "ops@example.com",
//!     "name": "Ops",
//!     "role": "admin",
//!     ...
//!   }
//! }
//! ```

pub mod auth;
pub mod deployment;
pub mod events;
pub mod git_provider;
pub mod project;

pub use auth::*;
pub use deployment::*;
pub use events::*;
pub use git_provider::*;
pub use project::*;
