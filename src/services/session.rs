use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::db::Store;
use crate::errors::ClientError;
use crate::models::{Access, Identity, SessionEvent, SessionKind, SessionState, User};
use crate::services::api::BackendApi;

pub const LOGIN_FAILED_MESSAGE: &str = "Authentication failed.";
pub const ADMIN_LOGIN_FAILED_MESSAGE: &str = "Invalid Password. Please check.";
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have access to this page.";

/// The one session record per client process. Every transition that
/// changes authentication status is published to subscribers.
pub struct SessionProvider {
    api: Arc<dyn BackendApi>,
    store: Store,
    state: Mutex<SessionState>,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl SessionProvider {
    pub fn new(api: Arc<dyn BackendApi>, store: Store) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            api,
            store,
            state: Mutex::new(SessionState::Uninitialized),
            events_tx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn kind(&self) -> SessionKind {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .kind()
    }

    pub fn token(&self) -> Option<String> {
        self.state().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.state().identity().map(|id| id.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state().is_logged_in()
    }

    pub fn is_admin(&self) -> bool {
        self.state().is_admin()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub fn events(&self) -> BroadcastStream<SessionEvent> {
        BroadcastStream::new(self.subscribe())
    }

    /// Gate a view. A session still loading is only let into public views.
    pub fn authorize(&self, access: Access) -> Result<(), ClientError> {
        let state = self.state();
        if state.allows(access) {
            return Ok(());
        }
        let reason = if state.is_loading() {
            "session is still loading"
        } else if access == Access::GuestOnly {
            "already logged in"
        } else {
            ACCESS_DENIED_MESSAGE
        };
        Err(ClientError::Auth(reason.to_string()))
    }

    fn transition(&self, next: SessionState) {
        let current = next.kind();
        let previous = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, next)
        };
        let event = SessionEvent {
            previous: previous.kind(),
            current,
        };
        tracing::info!(
            from = event.previous.as_str(),
            to = event.current.as_str(),
            "session transition"
        );
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }

    /// Startup check: read the persisted token and ask the backend who it
    /// belongs to. A rejected token is wiped.
    pub async fn restore(&self) -> Result<SessionKind, ClientError> {
        self.transition(SessionState::Loading);

        let token = match self.store.token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.transition(SessionState::Anonymous);
                return Ok(SessionKind::Anonymous);
            }
            Err(e) => {
                self.transition(SessionState::Anonymous);
                return Err(e);
            }
        };

        match self.api.me(&token).await {
            Ok(user) => {
                self.transition(SessionState::authenticated(Identity { token, user }));
                Ok(self.kind())
            }
            Err(ClientError::Auth(reason)) => {
                tracing::warn!(reason = %reason, "stored token rejected, clearing");
                self.store.clear_credentials()?;
                self.transition(SessionState::Anonymous);
                Ok(SessionKind::Anonymous)
            }
            Err(e) => {
                // Unreachable backend says nothing about the token; keep it
                // for the next start.
                tracing::warn!(error = %e, "could not verify stored token");
                self.transition(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionKind, ClientError> {
        let resp = self.api.login(email, password).await?;
        self.store.set_token(&resp.token)?;
        self.transition(SessionState::authenticated(Identity {
            token: resp.token,
            user: resp.user,
        }));
        Ok(self.kind())
    }

    /// Shared-secret admin login. The admin's e-mail is persisted next to
    /// the token.
    pub async fn admin_login(&self, password: &str) -> Result<SessionKind, ClientError> {
        let resp = self.api.admin_pass_login(password).await?;
        self.store.set_token(&resp.token)?;
        if let Some(email) = resp.user.email.as_deref() {
            self.store.set_user_email(email)?;
        }
        self.transition(SessionState::authenticated(Identity {
            token: resp.token,
            user: resp.user,
        }));
        Ok(self.kind())
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear_credentials()?;
        self.transition(SessionState::Anonymous);
        Ok(())
    }
}
