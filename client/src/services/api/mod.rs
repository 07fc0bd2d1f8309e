//! # Backend API Client Module
//!
//! Typed wrappers over the deployment platform's REST API. Each resource
//! module exposes free functions taking the shared [`ApiClient`].
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs            - Module exports and documentation
//! ├── client.rs         - ApiClient gateway (auth header, 401/204 handling, errors)
//! ├── auth.rs           - Login, register, current user, profile update
//! ├── projects.rs       - Projects, detection, environments, domains
//! ├── deployments.rs    - Deployments, cancellation, build logs
//! ├── git_providers.rs  - Git provider CRUD, provider OAuth, repositories
//! └── oauth.rs          - Account-level GitHub/Gitea OAuth
//! ```

pub mod auth;
pub mod client;
pub mod deployments;
pub mod git_providers;
pub mod oauth;
pub mod projects;

pub use client::ApiClient;
