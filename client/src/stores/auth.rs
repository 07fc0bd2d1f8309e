//! Authentication flows over the session store.

use std::sync::Arc;

use lib_utils::{validate_email, validate_min_length, validate_not_empty};
use shared::{LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use tracing::{error, info, instrument, warn};

use super::session::{Session, SessionStore};
use crate::config::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::core::{AuthApi, ClientError, Navigator, Result};

const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_email(email).map_err(ClientError::Validation)?;
        validate_not_empty(password, "Password").map_err(ClientError::Validation)?;

        let response = self
            .api
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await
            .inspect_err(|e| error!(error = %e, "Login failed"))?;

        self.session.set_auth(&response.token, &response.user)?;
        info!(user_id = response.user.id, "Logged in");
        self.navigator.navigate(DASHBOARD_ROUTE);
        Ok(self.session.snapshot())
    }

    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        validate_email(email).map_err(ClientError::Validation)?;
        validate_min_length(password, MIN_PASSWORD_LEN, "Password").map_err(ClientError::Validation)?;
        validate_not_empty(name, "Name").map_err(ClientError::Validation)?;

        let response = self
            .api
            .register(&RegisterRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
                name: name.trim().to_string(),
            })
            .await
            .inspect_err(|e| error!(error = %e, "Registration failed"))?;

        self.session.set_auth(&response.token, &response.user)?;
        info!(user_id = response.user.id, "Registered");
        self.navigator.navigate(DASHBOARD_ROUTE);
        Ok(self.session.snapshot())
    }

    /// Re-fetch the profile. Any failure means the stored token can no longer
    /// be trusted: the session is logged out and the error returned.
    pub async fn refresh_current_user(&self) -> Result<User> {
        match self.api.current_user().await {
            Ok(user) => {
                self.session.update_user(&user)?;
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch current user, logging out");
                self.logout();
                Err(e)
            }
        }
    }

    pub async fn update_profile(&self, changes: &UpdateProfileRequest) -> Result<User> {
        if let Some(email) = &changes.email {
            validate_email(email).map_err(ClientError::Validation)?;
        }
        if let Some(name) = &changes.name {
            validate_not_empty(name, "Name").map_err(ClientError::Validation)?;
        }

        let user = self.api.update_profile(changes).await?;
        self.session.update_user(&user)?;
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{FakeAuthApi, RecordingNavigator};
    use std::sync::atomic::Ordering;

    struct Fixture {
        api: Arc<FakeAuthApi>,
        navigator: Arc<RecordingNavigator>,
        store: AuthStore,
    }

    fn fixture() -> Fixture {
        let api = FakeAuthApi::new("correct horse");
        let navigator = RecordingNavigator::new();
        let session = Arc::new(SessionStore::load(Arc::new(MemoryStorage::new())));
        let store = AuthStore::new(api.clone(), session, navigator.clone());
        Fixture {
            api,
            navigator,
            store,
        }
    }

    #[tokio::test]
    async fn test_login_stores_session_and_lands_on_dashboard() {
        let f = fixture();
        let session = f.store.login("ops@example.com", "correct horse").await.unwrap();
        assert!(session.is_authenticated());
        assert!(f.store.is_authenticated());
        assert_eq!(f.navigator.routes(), vec![DASHBOARD_ROUTE.to_string()]);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email_without_calling_api() {
        let f = fixture();
        let err = f.store.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(f.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let f = fixture();
        let err = f.store.login("ops@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
        assert!(!f.store.is_authenticated());
        assert!(f.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_register_requires_long_password() {
        let f = fixture();
        let err = f.store.register("new@example.com", "short", "New").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let session = f
            .store
            .register("new@example.com", "long enough", "New")
            .await
            .unwrap();
        assert_eq!(session.user.unwrap().name, "New");
    }

    #[tokio::test]
    async fn test_refresh_failure_logs_out() {
        let f = fixture();
        f.store.login("ops@example.com", "correct horse").await.unwrap();
        f.api.current_user_fails.store(true, Ordering::SeqCst);

        let err = f.store.refresh_current_user().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!f.store.is_authenticated());
        assert_eq!(
            f.navigator.routes(),
            vec![DASHBOARD_ROUTE.to_string(), LOGIN_ROUTE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_profile_stores_returned_user() {
        let f = fixture();
        f.store.login("ops@example.com", "correct horse").await.unwrap();
        let changes = UpdateProfileRequest {
            name: Some("Night Shift".to_string()),
            email: None,
        };
        f.store.update_profile(&changes).await.unwrap();
        assert_eq!(f.store.current_user().unwrap().name, "Night Shift");
    }

    #[tokio::test]
    async fn test_logout_clears_and_redirects() {
        let f = fixture();
        f.store.login("ops@example.com", "correct horse").await.unwrap();
        f.store.logout();
        assert!(f.store.current_user().is_none());
        assert_eq!(f.navigator.routes().last().map(String::as_str), Some(LOGIN_ROUTE));
    }
}
