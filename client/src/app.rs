//! Composition root.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::config::ClientConfig;
use crate::core::{ClientError, Navigator, Result, Storage};
use crate::services::api::ApiClient;
use crate::services::stream::{BackoffPolicy, EventStreamClient, TokioScheduler, WsTransport};
use crate::stores::{AuthStore, SessionStore, ThemeStore};

/// Every client component, wired once and shared by reference.
pub struct App {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub auth: AuthStore,
    pub theme: ThemeStore,
    pub stream: EventStreamClient,
}

impl App {
    /// Build the client on the current Tokio runtime.
    ///
    /// Fails with [`ClientError::Config`] outside a runtime or when the
    /// event-stream URL does not parse.
    pub fn create(
        config: ClientConfig,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| ClientError::Config(format!("No Tokio runtime available: {e}")))?;

        let session = Arc::new(SessionStore::load(storage.clone()));
        let api = Arc::new(ApiClient::new(&config, session.clone(), navigator.clone())?);
        let auth = AuthStore::new(api.clone(), session.clone(), navigator);
        let theme = ThemeStore::new(storage, true);
        let stream = EventStreamClient::new(
            config.ws_endpoint()?,
            BackoffPolicy::new(config.reconnect_initial, config.reconnect_max),
            Arc::new(WsTransport::new(runtime.clone())),
            Arc::new(TokioScheduler::new(runtime)),
            session.clone(),
        );

        info!(
            api_url = %config.api_url,
            authenticated = session.is_authenticated(),
            theme = %theme.current(),
            "Panel client created"
        );

        Ok(Self {
            config,
            session,
            api,
            auth,
            theme,
            stream,
        })
    }

    /// Tear down background activity. The stores keep their persisted state.
    pub fn dispose(&self) {
        self.stream.disconnect();
        info!("Panel client disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stream::ConnectionState;
    use crate::storage::MemoryStorage;
    use crate::testing::RecordingNavigator;

    #[tokio::test]
    async fn test_create_wires_components() {
        let storage = Arc::new(MemoryStorage::new());
        let app = App::create(ClientConfig::default(), storage, RecordingNavigator::new()).unwrap();

        assert!(!app.auth.is_authenticated());
        assert_eq!(app.api.base_url(), crate::config::DEFAULT_API_URL);
        assert_eq!(app.stream.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn test_connect_without_session_stays_idle() {
        let storage = Arc::new(MemoryStorage::new());
        let app = App::create(ClientConfig::default(), storage, RecordingNavigator::new()).unwrap();

        app.stream.connect();
        assert_eq!(app.stream.state(), ConnectionState::Idle);

        app.dispose();
        app.dispose();
    }

    #[test]
    fn test_create_outside_runtime_fails() {
        let storage = Arc::new(MemoryStorage::new());
        let result = App::create(ClientConfig::default(), storage, RecordingNavigator::new());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
