//! Session store: the current bearer token and user profile.
//!
//! Persisted under the storage keys `token` and `user` (profile as JSON).
//! `authenticated` holds exactly when both are present.

use std::sync::Arc;

use lib_utils::{jwt_is_expired, now_utc};
use parking_lot::RwLock;
use shared::User;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::{Result, Storage, TokenProvider};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    session: RwLock<Session>,
    changes: watch::Sender<Session>,
}

impl SessionStore {
    /// Restore the session from storage.
    ///
    /// Only a complete pair (token and a decodable profile) is restored;
    /// anything else starts signed out.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => {
                    info!(user_id = user.id, "Restored stored session");
                    Session {
                        token: Some(token),
                        user: Some(user),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Stored profile is unreadable, starting signed out");
                    Session::default()
                }
            },
            _ => {
                debug!("No stored session");
                Session::default()
            }
        };

        let (changes, _) = watch::channel(session.clone());
        Self {
            storage,
            session: RwLock::new(session),
            changes,
        }
    }

    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.session.read().user.clone()
    }

    /// Current token, unless it is a JWT whose `exp` has passed.
    pub fn token(&self) -> Option<String> {
        let session = self.session.read();
        let token = session.token.as_ref()?;
        if jwt_is_expired(token, now_utc()) {
            debug!("Stored token has expired");
            return None;
        }
        Some(token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.session.read().user.is_some()
    }

    /// Persist then publish a new token and profile.
    pub fn set_auth(&self, token: &str, user: &User) -> Result<()> {
        let raw_user = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &raw_user)?;

        self.replace(Session {
            token: Some(token.to_string()),
            user: Some(user.clone()),
        });
        info!(user_id = user.id, "Session established");
        Ok(())
    }

    /// Persist then publish a refreshed profile, keeping the token.
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.storage.set(USER_KEY, &serde_json::to_string(user)?)?;

        let next = Session {
            token: self.session.read().token.clone(),
            user: Some(user.clone()),
        };
        self.replace(next);
        debug!(user_id = user.id, "Profile updated");
        Ok(())
    }

    /// Drop token and profile from storage and memory.
    ///
    /// Storage failures are logged; the in-memory session is always cleared.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove stored session entry");
            }
        }
        self.replace(Session::default());
        info!("Session cleared");
    }

    /// Receive every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.changes.subscribe()
    }

    fn replace(&self, next: Session) {
        *self.session.write() = next.clone();
        self.changes.send_replace(next);
    }
}

impl TokenProvider for SessionStore {
    fn token(&self) -> Option<String> {
        SessionStore::token(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::sample_user;
    use lib_utils::b64u_encode;

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_empty_storage_is_signed_out() {
        let store = SessionStore::load(memory());
        assert!(!store.is_authenticated());
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_set_auth_persists_and_restores() {
        let storage = memory();
        let store = SessionStore::load(storage.clone());
        store.set_auth("opaque-token", &sample_user()).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("opaque-token"));

        let restored = SessionStore::load(storage);
        assert_eq!(restored.token().as_deref(), Some("opaque-token"));
        assert_eq!(restored.user().unwrap().email, "ops@example.com");
    }

    #[test]
    fn test_token_without_user_is_not_restored() {
        let storage = memory();
        storage.set(TOKEN_KEY, "orphan").unwrap();
        let store = SessionStore::load(storage.clone());
        assert!(store.token().is_none());

        storage.set(USER_KEY, "{not json").unwrap();
        assert!(!SessionStore::load(storage).is_authenticated());
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let storage = memory();
        let store = SessionStore::load(storage.clone());
        store.set_auth("opaque-token", &sample_user()).unwrap();
        store.clear();
        assert!(storage.is_empty());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_user_keeps_token() {
        let store = SessionStore::load(memory());
        store.set_auth("opaque-token", &sample_user()).unwrap();
        let mut user = sample_user();
        user.name = "Renamed".to_string();
        store.update_user(&user).unwrap();
        assert_eq!(store.token().as_deref(), Some("opaque-token"));
        assert_eq!(store.user().unwrap().name, "Renamed");
    }

    #[test]
    fn test_expired_jwt_is_treated_as_absent() {
        let token = format!(
            "{}.{}.sig",
            b64u_encode(r#"{"alg":"HS256"}"#),
            b64u_encode(r#"{"user_id":1,"exp":1000}"#)
        );
        let store = SessionStore::load(memory());
        store.set_auth(&token, &sample_user()).unwrap();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
        assert!(store.snapshot().token.is_some());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = SessionStore::load(memory());
        let mut rx = store.subscribe();
        store.set_auth("opaque-token", &sample_user()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
        store.clear();
        assert!(!rx.borrow_and_update().is_authenticated());
    }
}
