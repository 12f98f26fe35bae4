use serde::Serialize;

use super::user::{Role, User};

/// An accepted credential and the identity the backend resolved it to.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Loading,
    Anonymous,
    AuthenticatedUser(Identity),
    AuthenticatedAdmin(Identity),
}

/// Payload-free summary of a [`SessionState`], cheap to broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Uninitialized,
    Loading,
    Anonymous,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Uninitialized => "uninitialized",
            SessionKind::Loading => "loading",
            SessionKind::Anonymous => "anonymous",
            SessionKind::AuthenticatedUser => "authenticated_user",
            SessionKind::AuthenticatedAdmin => "authenticated_admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    pub previous: SessionKind,
    pub current: SessionKind,
}

/// What a view requires of the session before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Login/signup pages; signed-in users are sent elsewhere.
    GuestOnly,
    /// Any signed-in role.
    Customer,
    Admin,
}

impl SessionState {
    pub fn authenticated(identity: Identity) -> Self {
        match identity.user.role {
            Role::Admin => SessionState::AuthenticatedAdmin(identity),
            Role::User => SessionState::AuthenticatedUser(identity),
        }
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            SessionState::Uninitialized => SessionKind::Uninitialized,
            SessionState::Loading => SessionKind::Loading,
            SessionState::Anonymous => SessionKind::Anonymous,
            SessionState::AuthenticatedUser(_) => SessionKind::AuthenticatedUser,
            SessionState::AuthenticatedAdmin(_) => SessionKind::AuthenticatedAdmin,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::AuthenticatedUser(id) | SessionState::AuthenticatedAdmin(id) => Some(id),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.identity().map(|id| id.token.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity().is_some()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SessionState::AuthenticatedAdmin(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Loading)
    }

    pub fn allows(&self, access: Access) -> bool {
        if self.is_loading() {
            return access == Access::Public;
        }
        match access {
            Access::Public => true,
            Access::GuestOnly => !self.is_logged_in(),
            Access::Customer => self.is_logged_in(),
            Access::Admin => self.is_admin(),
        }
    }
}
