//! # Utilities Library
//!
//! Shared helpers for the panel client: environment variables, base64url and
//! JWT claim inspection, RFC3339 time parsing, and input validation.

pub mod b64;
pub mod envs;
pub mod jwt;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64u_decode, b64u_decode_to_string, b64u_encode};
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use jwt::{jwt_expires_at, jwt_is_expired};
pub use time::{format_time, now_utc, parse_utc};
pub use validation::{validate_email, validate_min_length, validate_not_empty};
