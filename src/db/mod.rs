pub mod migrations;
pub mod queries;

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use rusqlite::Connection;

use crate::errors::ClientError;

pub const TOKEN_KEY: &str = "token";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const CONTACT_POPUP_KEY: &str = "contactPopupShown";

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Durable client-side state that survives restarts: the credential token,
/// the admin's e-mail and one-off UI flags.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the store at `path`, creating its parent directory
    /// when missing.
    pub fn open(path: &str) -> anyhow::Result<Self> {
        if path != ":memory:" {
            if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create data directory {}", dir.display()))?;
            }
        }
        Ok(Self::from_connection(init_db(path)?))
    }

    pub fn in_memory() -> anyhow::Result<Self> {
        Self::open(":memory:")
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, ClientError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn).map_err(ClientError::from)
    }

    pub fn token(&self) -> Result<Option<String>, ClientError> {
        self.with_conn(|c| queries::get_value(c, TOKEN_KEY))
            .map(|t| t.filter(|t| !t.is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.with_conn(|c| queries::set_value(c, TOKEN_KEY, token))
    }

    pub fn user_email(&self) -> Result<Option<String>, ClientError> {
        self.with_conn(|c| queries::get_value(c, USER_EMAIL_KEY))
    }

    pub fn set_user_email(&self, email: &str) -> Result<(), ClientError> {
        self.with_conn(|c| queries::set_value(c, USER_EMAIL_KEY, email))
    }

    /// Forget the credential and anything tied to it.
    pub fn clear_credentials(&self) -> Result<(), ClientError> {
        self.with_conn(|c| {
            queries::delete_value(c, TOKEN_KEY)?;
            queries::delete_value(c, USER_EMAIL_KEY)?;
            Ok(())
        })
    }

    pub fn contact_popup_shown(&self) -> Result<bool, ClientError> {
        self.with_conn(|c| queries::get_value(c, CONTACT_POPUP_KEY))
            .map(|v| v.as_deref() == Some("true"))
    }

    pub fn mark_contact_popup_shown(&self) -> Result<(), ClientError> {
        self.with_conn(|c| queries::set_value(c, CONTACT_POPUP_KEY, "true"))
    }
}
