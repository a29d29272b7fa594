use std::{path::PathBuf, time::Duration};

use directories::ProjectDirs;
use url::Url;

use crate::error::ConfigError;

pub const API_ORIGIN_VAR: &str = "TUNEWIRE_API_ORIGIN";
pub const DATA_DIR_VAR: &str = "TUNEWIRE_DATA_DIR";
pub const AUTOSAVE_VAR: &str = "TUNEWIRE_AUTOSAVE_SECS";
pub const START_ROUTE_VAR: &str = "TUNEWIRE_START_ROUTE";
pub const LOG_VAR: &str = "TUNEWIRE_LOG";

const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_AUTOSAVE_SECS: u64 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_origin: Url,
    pub data_dir: PathBuf,
    pub autosave: Duration,
    pub start_route: String,
    pub log_filter: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let origin = var(API_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        let api_origin = Url::parse(origin.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(ConfigError::InvalidValue {
                key: API_ORIGIN_VAR,
                value: origin.clone(),
            })?;

        let data_dir = match var(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir.trim()),
            None => ProjectDirs::from("", "tunewire", "tunewire")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .to_path_buf(),
        };

        let autosave = match var(AUTOSAVE_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    key: AUTOSAVE_VAR,
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_AUTOSAVE_SECS),
        };

        Ok(Self {
            api_origin,
            data_dir,
            autosave,
            start_route: var(START_ROUTE_VAR).unwrap_or_default(),
            log_filter: var(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
