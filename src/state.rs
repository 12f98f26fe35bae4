use std::sync::Arc;

use crate::config::ClientConfig;
use crate::db::Store;
use crate::services::admin::AdminConsole;
use crate::services::api::http::HttpBackend;
use crate::services::api::BackendApi;
use crate::services::auth::AuthFlows;
use crate::services::booking::BookingWorkflow;
use crate::services::password_reset::PasswordResetFlow;
use crate::services::session::SessionProvider;

/// Everything a front-end needs, owned in one place and handed down
/// explicitly.
pub struct AppState {
    pub config: ClientConfig,
    pub api: Arc<dyn BackendApi>,
    pub store: Store,
    pub session: Arc<SessionProvider>,
}

impl AppState {
    pub fn new(config: ClientConfig, api: Arc<dyn BackendApi>, store: Store) -> Self {
        let session = Arc::new(SessionProvider::new(api.clone(), store.clone()));
        Self {
            config,
            api,
            store,
            session,
        }
    }

    /// HTTP backend at `config.api_url`, storage at `config.database_url`.
    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        let store = Store::open(&config.database_url)?;
        let api: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(config.api_url.clone()));
        Ok(Self::new(config, api, store))
    }

    pub fn booking_workflow(&self) -> BookingWorkflow {
        BookingWorkflow::new(self.api.clone(), self.config.working_hours.clone())
    }

    pub fn admin_console(&self) -> AdminConsole {
        AdminConsole::new(self.api.clone(), self.session.clone())
    }

    pub fn auth_flows(&self) -> AuthFlows {
        AuthFlows::new(self.api.clone())
    }

    pub fn password_reset(&self) -> PasswordResetFlow {
        PasswordResetFlow::new(self.api.clone())
    }
}
