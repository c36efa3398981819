use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::errors::ErrorMessagePolicy;

pub const MODIFIERS_CSV_FILE_ENV: &str = "MODIFIERS_CSV_FILE";
pub const WIZARD_SESSION_KEY_PREFIX_ENV: &str = "WIZARD_SESSION_KEY_PREFIX";
pub const UNKNOWN_ERROR_MESSAGE_ENV: &str = "UNKNOWN_ERROR_MESSAGE";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

pub const DEFAULT_SESSION_KEY_PREFIX: &str = "order-wizard:";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub modifiers_csv_file: Option<PathBuf>,
    pub session_key_prefix: String,
    pub error_policy: ErrorMessagePolicy,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            modifiers_csv_file: None,
            session_key_prefix: String::from(DEFAULT_SESSION_KEY_PREFIX),
            error_policy: ErrorMessagePolicy::default(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenv::from_filename` first
    /// to pick up values from an env file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    /// Empty values are treated the same way as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut settings = Self::default();

        if let Some(path) = non_empty(MODIFIERS_CSV_FILE_ENV) {
            settings.modifiers_csv_file = Some(PathBuf::from(path));
        }

        if let Some(prefix) = non_empty(WIZARD_SESSION_KEY_PREFIX_ENV) {
            settings.session_key_prefix = prefix;
        }

        if let Some(message) = non_empty(UNKNOWN_ERROR_MESSAGE_ENV) {
            settings.error_policy = ErrorMessagePolicy::new(message);
        }

        if let Some(level) = non_empty(LOG_LEVEL_ENV) {
            settings.log_level = LevelFilter::from_str(level.trim())
                .map_err(|_| anyhow::anyhow!("invalid log level: {}", level))?;
        }

        Ok(settings)
    }

    pub fn modifiers_csv_file(&self) -> Result<&Path> {
        self.modifiers_csv_file
            .as_deref()
            .context(format!("{} is not set", MODIFIERS_CSV_FILE_ENV))
    }

    pub fn session_key(&self, session_id: &str) -> String {
        format!("{}{}", self.session_key_prefix, session_id)
    }
}
