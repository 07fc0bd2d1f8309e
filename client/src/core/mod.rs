//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! ## Modules
//!
//! - **[`error`]**: Client error type (`ClientError`, `Result<T>`)
//! - **[`service`]**: Collaborator traits (`Storage`, `Navigator`, `Scheduler`,
//!   `Transport`, `TokenProvider`, `AuthApi`)
//!
//! ## Error Handling
//!
//! All fallible client operations return the centralized [`ClientError`]:
//!
//! ```rust,no_run
//! use panel_client::core::error::{ClientError, Result};
//!
//! fn validate_project_name(name: &str) -> Result<String> {
//!     if name.is_empty() {
//!         return Err(ClientError::Validation("Name cannot be empty".to_string()));
//!     }
//!     Ok(name.to_string())
//! }
//! ```
//!
//! ## Dependency Injection
//!
//! Stores and the event stream own their collaborators through these traits,
//! so tests swap in fakes for storage, navigation, timers and the socket:
//!
//! ```rust,ignore
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let session = Arc::new(SessionStore::load(storage));
//! ```

pub mod error;
pub mod service;

pub use error::{ClientError, Result};
pub use service::{
    AuthApi, Navigator, ScheduledTask, Scheduler, Storage, TokenProvider, Transport,
    TransportConnection, TransportEvent, TransportSink,
};
