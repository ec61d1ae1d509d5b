use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use search_engine::{Endpoint, ServiceSettings};
use search_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "SEARCH_BAR_CONFIG";
const CONFIG_FILENAME: &str = "search_bar.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBarConfig {
    pub prediction: EndpointConfig,
    pub search: EndpointConfig,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub redirect_limit: usize,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        let defaults = ServiceSettings::default();
        Self {
            prediction: EndpointConfig {
                base_url: defaults.prediction.base_url,
                headers: defaults.prediction.headers,
            },
            search: EndpointConfig {
                base_url: defaults.search.base_url,
                headers: defaults.search.headers,
            },
            connect_timeout_ms: defaults.connect_timeout.map(duration_ms),
            request_timeout_ms: defaults.request_timeout.map(duration_ms),
            redirect_limit: defaults.redirect_limit,
            max_response_bytes: defaults.max_bytes,
            log_destination: LogDestination::default(),
        }
    }
}

impl SearchBarConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            prediction: Endpoint {
                base_url: self.prediction.base_url.clone(),
                headers: self.prediction.headers.clone(),
            },
            search: Endpoint {
                base_url: self.search.base_url.clone(),
                headers: self.search.headers.clone(),
            },
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_response_bytes,
            ..ServiceSettings::default()
        }
    }
}

/// `$SEARCH_BAR_CONFIG`, or `./search_bar.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_FILENAME))
}

/// Reads the config file. A missing file is `Ok(None)`.
pub fn read_config(path: &Path) -> Result<Option<SearchBarConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
