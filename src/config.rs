use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Symptriage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name kept from the first release of the bot.
pub const KNOWLEDGE_BASE_FILE: &str = "data_penyakit.json";

pub const ENV_KB_PATH: &str = "SYMPTRIAGE_KB_PATH";
pub const ENV_PERSIST_DEFAULT: &str = "SYMPTRIAGE_PERSIST_DEFAULT";
pub const ENV_ADMIN_IDS: &str = "SYMPTRIAGE_ADMIN_IDS";
pub const ENV_RELOAD_PER_QUERY: &str = "SYMPTRIAGE_RELOAD_PER_QUERY";

/// Get the application data directory.
/// ~/Symptriage/, or the working directory when there is no home.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => PathBuf::from("."),
    }
}

/// Default location of the condition knowledge file.
pub fn default_knowledge_base_path() -> PathBuf {
    app_data_dir().join(KNOWLEDGE_BASE_FILE)
}

/// Log filter used when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "symptriage=info,symptriage_lib=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid boolean for {name}: {value}")]
    InvalidFlag { name: String, value: String },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageConfig {
    pub knowledge_base_path: PathBuf,
    /// Write the built-in conditions back when the file is unusable.
    pub persist_default: bool,
    /// Users allowed to see detailed `/stats`.
    pub admin_ids: Vec<u64>,
    /// Re-read the knowledge file for every query instead of once at start.
    pub reload_per_query: bool,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: default_knowledge_base_path(),
            persist_default: true,
            admin_ids: Vec::new(),
            reload_per_query: false,
        }
    }
}

impl TriageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_KB_PATH).filter(|p| !p.trim().is_empty()) {
            config.knowledge_base_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_PERSIST_DEFAULT) {
            config.persist_default = parse_flag(ENV_PERSIST_DEFAULT, &value)?;
        }
        if let Some(value) = lookup(ENV_RELOAD_PER_QUERY) {
            config.reload_per_query = parse_flag(ENV_RELOAD_PER_QUERY, &value)?;
        }
        if let Some(value) = lookup(ENV_ADMIN_IDS) {
            config.admin_ids = parse_admin_ids(&value);
        }

        Ok(config)
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: name.into(),
            value: value.into(),
        }),
    }
}

/// Comma-separated user ids. Entries that are not numbers are skipped.
fn parse_admin_ids(value: &str) -> Vec<u64> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(entry = s, "Ignoring invalid admin id");
                None
            }
        })
        .collect()
}
