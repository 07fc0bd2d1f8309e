//! # Common Error Types
//!
//! Consolidated error handling for the panel client.
//!
//! ## Error Categories
//!
//! - **Unauthorized / Auth**: rejected or missing credentials
//! - **Http / Decode**: non-2xx responses and bodies that do not match the expected type
//! - **Network**: no response at all (connection refused, timeout, DNS)
//! - **Storage / Config / Validation**: local failures before anything hits the wire
//!
//! Event-stream failures never surface here. The stream logs them and records
//! the last one in its status snapshot.

use thiserror::Error;

/// Client-wide error type.
///
/// # Example
///
/// ```rust
/// use panel_client::core::error::ClientError;
///
/// let err = ClientError::Http { status: 404, message: "Project not found".to_string() };
/// assert_eq!(err.to_string(), "Project not found");
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// An authenticated request was rejected with 401. The session has already
    /// been cleared and the navigator sent to the login route.
    #[error("Unauthorized")]
    Unauthorized,

    /// Credentials rejected on an anonymous call (login/register).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response. `message` comes from the `{ "error": ... }` body when
    /// present, otherwise `HTTP <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth initiation requested for a provider type with no OAuth flow.
    #[error("Provider type not supported yet: {0}")]
    UnsupportedProvider(String),
}

impl ClientError {
    /// HTTP status associated with the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<lib_utils::envs::Error> for ClientError {
    fn from(err: lib_utils::envs::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ClientError::Unauthorized.status(), Some(401));
        assert_eq!(ClientError::Network("refused".into()).status(), None);
        assert!(ClientError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn test_env_error_becomes_config() {
        let err: ClientError = lib_utils::envs::Error::WrongFormat("PANEL_HTTP_TIMEOUT_SECS").into();
        assert!(matches!(err, ClientError::Config(ref m) if m.contains("PANEL_HTTP_TIMEOUT_SECS")));
    }
}
