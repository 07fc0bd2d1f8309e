//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the panel client and the
//! deployment platform's REST API and event stream.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Credentials, auth responses and user profiles
//!   - **[`dto::project`]**: Projects, environments, domains and framework detection
//!   - **[`dto::deployment`]**: Deployments and build logs
//!   - **[`dto::git_provider`]**: Git providers, OAuth and repositories
//!   - **[`dto::events`]**: Event-stream message envelope and payloads
//!
//! ## Wire Format
//!
//! REST DTOs follow the backend JSON:
//! - Field names are **snake_case** on the wire, matching Rust field names
//! - Optional fields are omitted from JSON when `None`
//! - Timestamps stay RFC3339 strings; parse them with `lib_utils::parse_utc` when needed
//!
//! Event-stream payloads are the exception: they use **camelCase**
//! (`deploymentId`, `projectId`), mirroring what the backend hub emits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shared::dto::auth::{LoginRequest, AuthResponse};
//!
//! # async fn demo() -> Result<(), reqwest::Error> {
//! let request = LoginRequest {
//!     email: "ops@example.com".to_string(),
//!     password: "secret".to_string(),
//! };
//!
//! let response: AuthResponse = reqwest::Client::new()
//!     .post("http://127.0.0.1:8080/api/v1/auth/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
