//! Runtime configuration: defaults, then an optional TOML file, then the
//! environment.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use lingo_core::model::LessonId;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// How the practice API is reached. Chosen once at composition time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Every call goes to the backend.
    Direct,
    /// Backend calls behind a query cache.
    #[default]
    Cached,
    /// In-process backend seeded with demo content.
    Offline,
}

impl DataSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Cached => "cached",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "cached" => Ok(Self::Cached),
            "offline" => Ok(Self::Offline),
            _ => Err(ConfigError::InvalidValue {
                key: "data_source",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PracticeConfig {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub data_source: DataSource,
    pub request_timeout: Duration,
    /// Lesson started from the learning hub.
    pub start_lesson: Option<LessonId>,
}

impl fmt::Debug for PracticeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("data_source", &self.data_source)
            .field("request_timeout", &self.request_timeout)
            .field("start_lesson", &self.start_lesson)
            .finish()
    }
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            api_token: None,
            data_source: DataSource::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            start_lesson: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default base url should be valid")
}

/// Shape of the optional TOML file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    data_source: Option<DataSource>,
    request_timeout_secs: Option<u64>,
    start_lesson: Option<u64>,
}

impl PracticeConfig {
    /// Loads the process configuration.
    ///
    /// Reads the TOML file named by `LINGO_CONFIG_PATH` when set, then applies
    /// `LINGO_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `load`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match non_empty(lookup("LINGO_CONFIG_PATH")) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(&lookup)?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` on malformed TOML or invalid values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw)?;
        let mut config = Self::default();
        if let Some(url) = file.api_base_url {
            config.api_base_url = parse_url(&url)?;
        }
        if file.api_token.is_some() {
            config.api_token = non_empty(file.api_token);
        }
        if let Some(source) = file.data_source {
            config.data_source = source;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = timeout_from_secs(secs)?;
        }
        config.start_lesson = file.start_lesson.map(LessonId::new);
        Ok(config)
    }

    fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = non_empty(lookup("LINGO_API_BASE_URL")) {
            self.api_base_url = parse_url(&url)?;
        }
        if let Some(token) = non_empty(lookup("LINGO_API_TOKEN")) {
            self.api_token = Some(token);
        }
        if let Some(source) = non_empty(lookup("LINGO_DATA_SOURCE")) {
            self.data_source = source.parse()?;
        }
        if let Some(raw) = non_empty(lookup("LINGO_REQUEST_TIMEOUT_SECS")) {
            let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "LINGO_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            self.request_timeout = timeout_from_secs(secs)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "api_base_url",
            value: raw.to_string(),
        })
}

fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "request_timeout_secs",
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
