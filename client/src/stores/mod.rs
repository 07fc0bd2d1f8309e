//! # Client-Side Stores
//!
//! Explicit, injectable replacements for global UI state:
//!
//! - [`SessionStore`]: token + profile, persisted, observable
//! - [`AuthStore`]: login/register/logout flows over the session store
//! - [`ThemeStore`]: light/dark preference

pub mod auth;
pub mod session;
pub mod theme;

pub use auth::AuthStore;
pub use session::{Session, SessionStore};
pub use theme::{Theme, ThemeStore};
