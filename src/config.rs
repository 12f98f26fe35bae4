use std::env;
use std::path::PathBuf;

use crate::errors::ClientError;
use crate::models::WorkingHours;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub database_url: String,
    pub working_hours: WorkingHours,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let working_hours = match var("COOLCARE_WORKING_HOURS") {
            Some(raw) if !raw.trim().is_empty() => WorkingHours::parse_list(&raw)?,
            _ => WorkingHours::default(),
        };

        Ok(Self {
            api_url: var("COOLCARE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            database_url: var("COOLCARE_DB").unwrap_or_else(default_db_path),
            working_hours,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            database_url: default_db_path(),
            working_hours: WorkingHours::default(),
        }
    }
}

/// `~/.local/share/coolcare/client.db` on Linux, `./coolcare.db` when no
/// data directory is known. The directory is created by `Store::open`.
fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("coolcare").join("client.db"))
        .unwrap_or_else(|| PathBuf::from("coolcare.db"))
        .to_string_lossy()
        .to_string()
}
